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
use anyhow::bail;
use log::debug;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub struct Client {
	client: reqwest::Client,
	url: String,
}

impl Client {
	pub fn new(url: &str, timeout: Duration) -> Result<Self, anyhow::Error> {
		Ok(Client {
			client: reqwest::Client::builder().timeout(timeout).build()?,
			url: url.to_string(),
		})
	}

	/// Sends a GET and handle the response. Errors on non-2xx response codes.
	pub async fn get<Q, R>(
		&self,
		query_params: Option<Q>,
	) -> Result<R, anyhow::Error>
	where
		Q: Serialize,
		R: DeserializeOwned,
	{
		let mut request = self.client.request(Method::GET, &self.url);

		if let Some(query_params) = query_params {
			request = request.query(&query_params);
		}

		debug!("Sending GET to {}", self.url);
		let response = request.send().await?;

		// Handle non-2xx response codes
		if !response.status().is_success() {
			bail!("Request failed with status: {}", response.status());
		}

		let response_data: R = response.json().await?;
		Ok(response_data)
	}
}
