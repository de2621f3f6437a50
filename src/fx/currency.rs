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
/// The currency every underlying price is stored in.
pub const BASE_CODE: &str = "INR";

/// A display currency known to the catalog.
#[derive(Debug, PartialEq, Eq)]
pub struct Currency {
	pub code: &'static str,
	pub name: &'static str,
	pub symbol: &'static str,

	/// Decimal digits used when rendering in currency style
	pub minor_units: u32,

	/// Country code used by pickers to show a flag
	flag: &'static str,
}

impl Currency {
	const fn new(
		code: &'static str,
		name: &'static str,
		symbol: &'static str,
		minor_units: u32,
		flag: &'static str,
	) -> Self {
		Self {
			code,
			name,
			symbol,
			minor_units,
			flag,
		}
	}

	pub fn flag_code(&self) -> String {
		flag_code_for(self.code)
	}

	pub fn is_common(&self) -> bool {
		COMMON_CODES.contains(&self.code)
	}

	/// Case-insensitive substring match on code or name.
	pub fn matches(&self, query: &str) -> bool {
		let q = query.trim().to_lowercase();
		q.is_empty()
			|| self.code.to_lowercase().contains(&q)
			|| self.name.to_lowercase().contains(&q)
	}
}

#[rustfmt::skip]
pub static CURRENCIES: [Currency; 25] = [
	Currency::new("INR", "Indian Rupee", "₹", 2, "in"),
	Currency::new("USD", "United States Dollar", "$", 2, "us"),
	Currency::new("EUR", "Euro", "€", 2, "eu"),
	Currency::new("GBP", "British Pound", "£", 2, "gb"),
	Currency::new("AED", "United Arab Emirates Dirham", "د.إ", 2, "ae"),
	Currency::new("SGD", "Singapore Dollar", "$", 2, "sg"),
	Currency::new("AUD", "Australian Dollar", "$", 2, "au"),
	Currency::new("CAD", "Canadian Dollar", "$", 2, "ca"),
	Currency::new("JPY", "Japanese Yen", "¥", 0, "jp"),
	Currency::new("CNY", "Chinese Yuan", "¥", 2, "cn"),
	Currency::new("CHF", "Swiss Franc", "Fr", 2, "ch"),
	Currency::new("HKD", "Hong Kong Dollar", "$", 2, "hk"),
	Currency::new("NZD", "New Zealand Dollar", "$", 2, "nz"),
	Currency::new("SEK", "Swedish Krona", "kr", 2, "se"),
	Currency::new("NOK", "Norwegian Krone", "kr", 2, "no"),
	Currency::new("DKK", "Danish Krone", "kr", 2, "dk"),
	Currency::new("ZAR", "South African Rand", "R", 2, "za"),
	Currency::new("THB", "Thai Baht", "฿", 2, "th"),
	Currency::new("MYR", "Malaysian Ringgit", "RM", 2, "my"),
	Currency::new("IDR", "Indonesian Rupiah", "Rp", 2, "id"),
	Currency::new("LKR", "Sri Lankan Rupee", "Rs", 2, "lk"),
	Currency::new("BHD", "Bahraini Dinar", ".د.ب", 3, "bh"),
	Currency::new("QAR", "Qatari Riyal", "ر.ق", 2, "qa"),
	Currency::new("OMR", "Omani Rial", "ر.ع.", 3, "om"),
	Currency::new("KWD", "Kuwaiti Dinar", ".د.ك", 3, "kw"),
];

/// Codes listed first by currency pickers.
pub const COMMON_CODES: [&str; 7] =
	["INR", "USD", "EUR", "SGD", "AUD", "GBP", "AED"];

pub fn find_currency(code: &str) -> Option<&'static Currency> {
	CURRENCIES.iter().find(|c| c.code == code)
}

pub fn is_known(code: &str) -> bool {
	find_currency(code).is_some()
}

/// Looks up a currency, falling back to the base currency record for absent
/// or unknown codes.
pub fn get_currency_by_code(code: Option<&str>) -> &'static Currency {
	code.and_then(find_currency).unwrap_or(&CURRENCIES[0])
}

/// Unknown codes are coerced to the base code.
pub fn coerce_code(code: &str) -> &'static str {
	get_currency_by_code(Some(code)).code
}

pub fn flag_code_for(code: &str) -> String {
	match find_currency(code) {
		Some(c) => c.flag.to_string(),
		None => code.chars().take(2).collect::<String>().to_lowercase(),
	}
}

/// Filters the catalog by query and splits it into common and other
/// currencies, preserving catalog order within each group.
pub fn search(
	query: &str,
) -> (Vec<&'static Currency>, Vec<&'static Currency>) {
	CURRENCIES
		.iter()
		.filter(|c| c.matches(query))
		.partition(|c| c.is_common())
}
