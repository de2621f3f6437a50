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
use crate::fx::currency::{find_currency, BASE_CODE};
use crate::fx::rate_table::RateTable;
use anyhow::{bail, Error};

/// More fraction digits than an `f64` can carry; requests beyond it are
/// clamped.
pub const MAX_FRACTION_DIGITS: u32 = 15;

const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Digit grouping convention for rendered amounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
	/// 1,234,567
	#[default]
	EnUs,
	/// 12,34,567
	EnIn,
}

impl Locale {
	pub fn from_str(s: &str) -> Result<Self, Error> {
		match s.to_lowercase().replace('_', "-").as_str() {
			"en-us" => Ok(Locale::EnUs),
			"en-in" => Ok(Locale::EnIn),
			_ => bail!("unsupported locale: {}", s),
		}
	}
}

/// Converts an amount held in the base currency. Non-finite amounts convert
/// to zero and a missing rate is treated as 1.0.
pub fn convert(amount_in_base: f64, target: &str, rates: &RateTable) -> f64 {
	if !amount_in_base.is_finite() {
		return 0.0;
	}
	amount_in_base * rates.get(target).unwrap_or(1.0)
}

/// Renders an amount for display. The base currency gets currency-style
/// formatting with its symbol; every other currency is written as its ISO
/// code followed by the grouped number, e.g. `USD 1,234`.
pub fn format(
	amount: f64,
	code: &str,
	max_fraction_digits: u32,
	locale: Locale,
) -> String {
	if code == BASE_CODE {
		return format_native(amount, code, max_fraction_digits, locale);
	}

	let (negative, number) =
		render_number(amount, 0, max_fraction_digits, locale);
	format!("{} {}{}", code, sign(negative), number)
}

/// Currency-style rendering: symbol first, padded to the currency's minor
/// units where the maximum allows. Codes without a known symbol get the
/// plain grouped number instead.
pub fn format_native(
	amount: f64,
	code: &str,
	max_fraction_digits: u32,
	locale: Locale,
) -> String {
	match find_currency(code).filter(|c| !c.symbol.is_empty()) {
		Some(currency) => {
			let min = currency.minor_units.min(max_fraction_digits);
			let (negative, number) =
				render_number(amount, min, max_fraction_digits, locale);
			format!("{}{}{}", sign(negative), currency.symbol, number)
		},
		None => {
			let (negative, number) =
				render_number(amount, 0, max_fraction_digits, locale);
			format!("{}{}", sign(negative), number)
		},
	}
}

fn sign(negative: bool) -> &'static str {
	if negative {
		"-"
	} else {
		""
	}
}

/// Rounds half away from zero to `max` fraction digits, trims trailing zeros
/// down to `min` digits, and groups the integer part. Returns whether the
/// rounded value is negative alongside the unsigned text.
fn render_number(
	value: f64,
	min: u32,
	max: u32,
	locale: Locale,
) -> (bool, String) {
	let max = max.min(MAX_FRACTION_DIGITS);
	let min = min.min(max) as usize;

	let value = if value.is_finite() { value } else { 0.0 };
	let factor = 10f64.powi(max as i32);
	let scaled = value.abs() * factor;

	// past 2^53 every double is an integer, so the value already carries no
	// digits below 10^-max
	let rounded = if scaled < EXACT_INTEGER_LIMIT {
		scaled.round() / factor
	} else {
		value.abs()
	};

	// shortest text that reads back as the same double
	let text = rounded.to_string();
	let (int_part, fraction) = match text.split_once('.') {
		Some((i, f)) => (i.to_string(), f.to_string()),
		None => (text, String::new()),
	};

	let mut fraction: String = fraction.chars().take(max as usize).collect();
	while fraction.len() < min {
		fraction.push('0');
	}
	while fraction.len() > min && fraction.ends_with('0') {
		fraction.pop();
	}

	let grouped = group_digits(&int_part, locale);
	let number = if fraction.is_empty() {
		grouped
	} else {
		format!("{}.{}", grouped, fraction)
	};

	(value < 0.0 && rounded != 0.0, number)
}

fn group_digits(digits: &str, locale: Locale) -> String {
	let mut out = digits.to_string();
	let mut i = out.len() as isize - 3;
	let step = match locale {
		Locale::EnUs => 3,
		Locale::EnIn => 2,
	};
	while i > 0 {
		out.insert(i as usize, ',');
		i -= step;
	}
	out
}

/// Extracts a number from catalog price text such as `₹38,500`. Returns
/// `None` when no digits remain or the remainder is not a number, which
/// callers present as "price on request".
pub fn parse_amount_string(text: &str) -> Option<f64> {
	let numeric: String = text
		.chars()
		.filter(|c| c.is_ascii_digit() || *c == '.')
		.collect();

	if numeric.is_empty() {
		return None;
	}
	numeric.parse::<f64>().ok()
}

/// Difference between an old and a current price, in the base currency,
/// when the old price is strictly higher. Zero prices count as absent.
pub fn savings(price: &str, old_price: Option<&str>) -> Option<f64> {
	let current = parse_amount_string(price).filter(|v| *v != 0.0)?;
	let old = old_price
		.and_then(parse_amount_string)
		.filter(|v| *v != 0.0)?;

	if old <= current {
		return None;
	}
	Some(old - current)
}
