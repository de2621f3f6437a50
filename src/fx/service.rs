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
use crate::config::config_file::Config;
use crate::fx::acquire::RateAcquirer;
use crate::fx::cache::{RateCache, RateSnapshot, RefreshPolicy};
use crate::fx::cancel::CancelToken;
use crate::fx::clock::{Clock, SystemClock};
use crate::fx::currency::{coerce_code, BASE_CODE};
use crate::fx::money::{self, Locale};
use crate::fx::selection::{FileStore, Selection, SelectionStore};
use crate::fx::source::{default_sources, HttpRateSource, RateSource};
use anyhow::{anyhow, Error};
use chrono::TimeDelta;
use dirs::data_local_dir;
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BASE_PARAM: &str = "base";
const DEFAULT_API_KEY_PARAM: &str = "access_key";

/// What the rest of the application talks to for prices: the selected
/// display currency plus conversion and formatting from the base currency.
pub struct CurrencyService {
	cache: Arc<RateCache>,
	selection: Selection,
	locale: Locale,
	cancel: CancelToken,
}

impl CurrencyService {
	pub fn new(
		acquirer: RateAcquirer,
		clock: Arc<dyn Clock>,
		policy: RefreshPolicy,
		store: Box<dyn SelectionStore>,
		locale: Locale,
	) -> Self {
		Self {
			cache: Arc::new(RateCache::new(BASE_CODE, acquirer, clock, policy)),
			selection: Selection::new(store),
			locale,
			cancel: CancelToken::new(),
		}
	}

	/// Builds the service from the user's config. With `offline` set no
	/// source is queried and every conversion is the identity.
	pub fn from_config(config: &Config, offline: bool) -> Result<Self, Error> {
		let locale = match &config.locale {
			Some(l) => Locale::from_str(l)?,
			None => Locale::default(),
		};

		let acquirer = if offline {
			RateAcquirer::offline()
		} else {
			RateAcquirer::new(build_sources(config)?)
		};
		debug!("rate sources: {:?}", acquirer.source_names());

		Ok(Self::new(
			acquirer,
			Arc::new(SystemClock),
			refresh_policy(config),
			Box::new(FileStore::new(state_dir(config)?)),
			locale,
		))
	}

	pub fn currency(&self) -> &'static str {
		self.selection.get()
	}

	/// Unknown codes select the base currency.
	pub fn set_currency(&self, code: &str) -> &'static str {
		self.selection.set(code)
	}

	pub async fn rates(&self) -> Arc<RateSnapshot> {
		self.cache.read(&self.cancel).await
	}

	pub fn is_loading(&self) -> bool {
		self.cache.is_loading()
	}

	pub fn last_updated(&self) -> Option<String> {
		self.cache.current().and_then(|s| s.as_of.clone())
	}

	pub async fn convert_from_base(&self, amount: f64) -> f64 {
		self.convert_to(amount, self.currency()).await
	}

	pub async fn format_from_base(
		&self,
		amount: f64,
		max_fraction_digits: Option<u32>,
	) -> String {
		let value = self.convert_from_base(amount).await;
		money::format(
			value,
			self.currency(),
			max_fraction_digits.unwrap_or(0),
			self.locale,
		)
	}

	/// Converts into an explicit currency rather than the selection.
	pub async fn convert_to(&self, amount: f64, code: &str) -> f64 {
		let snapshot = self.rates().await;
		money::convert(amount, coerce_code(code), &snapshot.table)
	}

	pub async fn format_to(
		&self,
		amount: f64,
		code: &str,
		max_fraction_digits: Option<u32>,
	) -> String {
		let code = coerce_code(code);
		let value = self.convert_to(amount, code).await;
		money::format(value, code, max_fraction_digits.unwrap_or(0), self.locale)
	}

	/// Aborts any in-flight fetch; reads after this get cached or identity
	/// rates.
	pub fn shutdown(&self) {
		self.cancel.cancel();
	}
}

fn refresh_policy(config: &Config) -> RefreshPolicy {
	let mut policy = RefreshPolicy::default();
	if let Some(rates) = &config.rates {
		if let Some(ttl) = rates.ttl_minutes {
			policy.ttl = TimeDelta::minutes(ttl);
		}
		if let Some(retry) = rates.retry_minutes {
			policy.retry = TimeDelta::minutes(retry);
		}
	}
	policy
}

fn build_sources(config: &Config) -> Result<Vec<Box<dyn RateSource>>, Error> {
	let rates = config.rates.as_ref();
	let timeout = Duration::from_secs(
		rates
			.and_then(|r| r.timeout_secs)
			.unwrap_or(DEFAULT_TIMEOUT_SECS),
	);

	let Some(configured) = rates.and_then(|r| r.sources.as_ref()) else {
		return default_sources(timeout);
	};

	let mut sources: Vec<Box<dyn RateSource>> = Vec::new();
	for s in configured {
		let mut source = HttpRateSource::new(
			s.name.as_deref().unwrap_or(&s.url),
			&s.url,
			s.base_param.as_deref().unwrap_or(DEFAULT_BASE_PARAM),
			timeout,
		)?;
		if let Some(key) = &s.api_key {
			source = source.with_api_key(
				s.api_key_param.as_deref().unwrap_or(DEFAULT_API_KEY_PARAM),
				key.clone(),
			);
		}
		sources.push(Box::new(source));
	}
	Ok(sources)
}

fn state_dir(config: &Config) -> Result<PathBuf, Error> {
	match &config.state_dir {
		Some(dir) => Ok(PathBuf::from(dir)),
		None => data_local_dir()
			.map(|d| d.join("tripfx"))
			.ok_or_else(|| anyhow!("Unable to determine data directory")),
	}
}
