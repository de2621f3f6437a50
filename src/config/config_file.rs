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
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	/// Grouping convention for rendered amounts: "en-US" or "en-IN"
	pub locale: Option<String>,

	/// Where the selected currency is persisted
	pub state_dir: Option<String>,

	pub rates: Option<Rates>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Rates {
	pub ttl_minutes: Option<i64>,
	pub retry_minutes: Option<i64>,
	pub timeout_secs: Option<u64>,

	/// Queried in order; replaces the built-in sources when present.
	pub sources: Option<Vec<Source>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Source {
	pub name: Option<String>,
	pub url: String,

	/// Query parameter carrying the base code (default "base")
	pub base_param: Option<String>,

	pub api_key: Option<String>,
	pub api_key_cmd: Option<String>,
	/// Query parameter carrying the key (default "access_key")
	pub api_key_param: Option<String>,
}
