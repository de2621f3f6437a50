/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::fx::http::Client;
use crate::fx::rate_table::RateTable;
use anyhow::{bail, Error};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

pub const EXCHANGERATE_HOST_URL: &str = "https://api.exchangerate.host/latest";
pub const FRANKFURTER_URL: &str = "https://api.frankfurter.app/latest";

/// Rates as returned by one source, already sanitized.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceRates {
	pub table: RateTable,
	pub as_of: Option<String>,
}

/// One step of the acquisition chain.
#[async_trait]
pub trait RateSource: Send + Sync {
	fn name(&self) -> &str;

	/// Fetches rates quoted against `base`. A response without a single
	/// usable rate is an error.
	async fn fetch(&self, base: &str) -> Result<SourceRates, Error>;
}

/// The JSON shape shared by both public endpoints.
#[derive(Debug, Deserialize)]
pub struct RatesResponse {
	#[serde(default)]
	pub rates: Option<HashMap<String, Value>>,
	#[serde(default)]
	pub date: Option<String>,
}

impl RatesResponse {
	pub fn into_rates(self, base: &str) -> Result<SourceRates, Error> {
		let Some(quotes) = self.rates else {
			bail!("response has no rates");
		};

		let table = RateTable::from_quotes(base, &quotes);
		if table.quote_count() == 0 {
			bail!("response has no usable rates");
		}

		Ok(SourceRates {
			table,
			as_of: self.date,
		})
	}
}

/// A JSON endpoint taking the base code as a query parameter, e.g.
/// `latest?base=INR` or `latest?from=INR`.
pub struct HttpRateSource {
	name: String,
	http: Client,
	base_param: String,

	/// Query parameter name and value carrying an API key
	api_key: Option<(String, String)>,
}

impl HttpRateSource {
	pub fn new(
		name: &str,
		url: &str,
		base_param: &str,
		timeout: Duration,
	) -> Result<Self, Error> {
		Ok(Self {
			name: name.to_string(),
			http: Client::new(url, timeout)?,
			base_param: base_param.to_string(),
			api_key: None,
		})
	}

	pub fn with_api_key(mut self, param: &str, key: String) -> Self {
		self.api_key = Some((param.to_string(), key));
		self
	}

	fn query(&self, base: &str) -> Vec<(String, String)> {
		let mut query = vec![(self.base_param.clone(), base.to_string())];
		if let Some((param, key)) = &self.api_key {
			query.push((param.clone(), key.clone()));
		}
		query
	}
}

#[async_trait]
impl RateSource for HttpRateSource {
	fn name(&self) -> &str {
		&self.name
	}

	async fn fetch(&self, base: &str) -> Result<SourceRates, Error> {
		let response: RatesResponse =
			self.http.get(Some(self.query(base))).await?;
		response.into_rates(base)
	}
}

/// The two public endpoints queried when no sources are configured, in
/// priority order.
pub fn default_sources(
	timeout: Duration,
) -> Result<Vec<Box<dyn RateSource>>, Error> {
	Ok(vec![
		Box::new(HttpRateSource::new(
			"exchangerate.host",
			EXCHANGERATE_HOST_URL,
			"base",
			timeout,
		)?),
		Box::new(HttpRateSource::new(
			"frankfurter",
			FRANKFURTER_URL,
			"from",
			timeout,
		)?),
	])
}
