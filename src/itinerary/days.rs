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
use regex::Regex;

/// Derives a trip length in days from free-text durations such as
/// "6 days · 5 nights", "5N/6D", "8-day guided trail" or "5-night camp".
pub struct DurationParser {
	nights_then_days: Regex,
	days: Regex,
	nights: Regex,
}

impl DurationParser {
	pub fn new() -> Self {
		Self {
			nights_then_days: Regex::new(
				r"(?i)(\d+)[\s-]*n(?:ights?)?[\s/·,|-]*(\d+)[\s-]*d(?:ays?)?\b",
			)
			.unwrap(),
			days: Regex::new(r"(?i)(\d+)[\s-]*d(?:ays?)?\b").unwrap(),
			nights: Regex::new(r"(?i)(\d+)[\s-]*n(?:ights?)?\b").unwrap(),
		}
	}

	/// Explicit day counts win over night counts; a lone night count means
	/// one more day than nights. Without either, the trip is assumed to be
	/// two days longer than its list of highlights, and never under four.
	pub fn day_count(&self, duration: &str, highlight_count: usize) -> u32 {
		if let Some(days) = self.capture(&self.nights_then_days, duration, 2)
		{
			return days;
		}

		if let Some(days) = self.capture(&self.days, duration, 1) {
			return days;
		}

		if let Some(nights) = self.capture(&self.nights, duration, 1) {
			return nights.saturating_add(1);
		}

		(highlight_count as u32).saturating_add(2).max(4)
	}

	/// First positive number found in the given group.
	fn capture(&self, re: &Regex, text: &str, group: usize) -> Option<u32> {
		re.captures(text)
			.and_then(|c| c.get(group))
			.and_then(|m| m.as_str().parse::<u32>().ok())
			.filter(|n| *n > 0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_days_and_nights() {
		let parser = DurationParser::new();
		assert_eq!(parser.day_count("6 days · 5 nights", 0), 6);
		assert_eq!(parser.day_count("9 days · 8 nights", 0), 9);
	}

	#[test]
	fn test_nights_then_days() {
		let parser = DurationParser::new();
		assert_eq!(parser.day_count("5N/6D", 0), 6);
		assert_eq!(parser.day_count("5n 6d", 0), 6);
		assert_eq!(parser.day_count("4 Nights / 5 Days", 0), 5);
	}

	#[test]
	fn test_days_only() {
		let parser = DurationParser::new();
		assert_eq!(parser.day_count("8-day guided trail", 0), 8);
		assert_eq!(parser.day_count("10 DAYS", 0), 10);
		assert_eq!(parser.day_count("1 day", 0), 1);
	}

	#[test]
	fn test_nights_only() {
		let parser = DurationParser::new();
		assert_eq!(parser.day_count("5-night desert camp", 0), 6);
		assert_eq!(parser.day_count("3 nights", 0), 4);
	}

	#[test]
	fn test_words_starting_with_d_or_n_are_not_units() {
		let parser = DurationParser::new();
		assert_eq!(parser.day_count("3 destinations", 1), 4);
		assert_eq!(parser.day_count("2 northern passes", 5), 7);
	}

	#[test]
	fn test_fallback_on_highlights() {
		let parser = DurationParser::new();
		assert_eq!(parser.day_count("Flexible", 4), 6);
		assert_eq!(parser.day_count("", 0), 4);
		assert_eq!(parser.day_count("0 days", 1), 4);
	}
}
