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
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Multipliers from the base currency to every quoted currency. The base
/// always maps to exactly 1.0 and every other entry is finite and positive.
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
	base: String,
	rates: BTreeMap<String, f64>,
}

impl RateTable {
	/// A table that converts nothing.
	pub fn identity(base: &str) -> Self {
		let mut rates = BTreeMap::new();
		rates.insert(base.to_string(), 1.0);

		Self {
			base: base.to_string(),
			rates,
		}
	}

	/// Builds a table from raw payload values. Entries that are not finite
	/// positive numbers are dropped, as is any quote for the base itself.
	pub fn from_quotes(base: &str, quotes: &HashMap<String, Value>) -> Self {
		let mut table = Self::identity(base);
		for (code, value) in quotes {
			if let Some(rate) = value.as_f64() {
				table.insert(code, rate);
			}
		}
		table
	}

	/// Adds a rate, returning whether it was accepted.
	pub fn insert(&mut self, code: &str, rate: f64) -> bool {
		if code == self.base || !rate.is_finite() || rate <= 0.0 {
			return false;
		}
		self.rates.insert(code.to_string(), rate);
		true
	}

	pub fn base(&self) -> &str {
		&self.base
	}

	pub fn get(&self, code: &str) -> Option<f64> {
		self.rates.get(code).copied()
	}

	/// Number of quotes besides the base.
	pub fn quote_count(&self) -> usize {
		self.rates.len() - 1
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn quotes(value: Value) -> HashMap<String, Value> {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn test_identity() {
		let table = RateTable::identity("INR");
		assert_eq!(table.get("INR"), Some(1.0));
		assert_eq!(table.quote_count(), 0);
		assert_eq!(table.get("USD"), None);
	}

	#[test]
	fn test_invalid_entries_are_dropped() {
		let table = RateTable::from_quotes(
			"INR",
			&quotes(json!({
				"USD": 0.012,
				"EUR": 0,
				"GBP": -0.5,
				"JPY": "1.8",
				"AED": null,
				"SGD": 0.016,
			})),
		);

		assert_eq!(table.quote_count(), 2);
		assert_eq!(table.get("USD"), Some(0.012));
		assert_eq!(table.get("SGD"), Some(0.016));
		assert_eq!(table.get("EUR"), None);
		assert_eq!(table.get("JPY"), None);
	}

	#[test]
	fn test_base_stays_at_one() {
		let table =
			RateTable::from_quotes("INR", &quotes(json!({ "INR": 2.5 })));
		assert_eq!(table.get("INR"), Some(1.0));
		assert_eq!(table.quote_count(), 0);
	}

	#[test]
	fn test_non_finite_insert_rejected() {
		let mut table = RateTable::identity("INR");
		assert!(!table.insert("USD", f64::NAN));
		assert!(!table.insert("USD", f64::INFINITY));
		assert!(table.insert("USD", 0.012));
		assert_eq!(table.quote_count(), 1);
	}
}
