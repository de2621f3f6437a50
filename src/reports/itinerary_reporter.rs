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
use crate::itinerary::plan::{Itinerary, PackageFile};
use std::fmt::Write;

/// Prices as already converted and formatted for the display currency.
pub struct PriceLines {
	pub price: Option<String>,
	pub was: Option<String>,
	pub savings: Option<String>,
}

pub struct ItineraryReporter<'a> {
	file: &'a PackageFile,
	plan: &'a Itinerary,
	prices: PriceLines,
}

impl<'a> ItineraryReporter<'a> {
	pub fn new(
		file: &'a PackageFile,
		plan: &'a Itinerary,
		prices: PriceLines,
	) -> Self {
		Self { file, plan, prices }
	}

	pub fn print(&self) {
		print!("{}", self.render());
	}

	pub fn render(&self) -> String {
		let mut out = String::new();
		let package = &self.file.package;

		let _ = writeln!(
			out,
			"{} ({})",
			package.name, self.file.destination.name
		);
		let _ = writeln!(
			out,
			"Duration: {} ({} days)",
			package.duration, self.plan.day_count
		);

		match &self.prices.price {
			Some(price) => {
				let _ = writeln!(out, "Price: {}", price);
			},
			None => {
				let _ = writeln!(out, "Price on request");
			},
		}
		if let (Some(was), Some(savings)) =
			(&self.prices.was, &self.prices.savings)
		{
			let _ = writeln!(out, "Was: {} (save {})", was, savings);
		}

		for day in &self.plan.days {
			let _ = writeln!(out, "\nDay {}: {}", day.day, day.title);
			let _ = writeln!(out, "  {}", day.description);
			for activity in &day.activities {
				let _ = writeln!(out, "  - {}", activity);
			}
			let _ = writeln!(out, "  Stay: {}", day.stay);
			let _ = writeln!(out, "  Meals: {}", day.meals.join(", "));
		}

		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::itinerary::days::DurationParser;

	fn package_file(old_price: Option<&str>) -> PackageFile {
		let old = match old_price {
			Some(p) => format!("old_price = \"{}\"", p),
			None => String::new(),
		};
		toml::from_str(&format!(
			r#"
			[destination]
			name = "Spiti"
			start_point = "Manali"
			tagline = "High desert monasteries"

			[package]
			name = "Spiti Circuit"
			duration = "3 days"
			price = "₹21,000"
			highlights = ["Key Monastery"]
			{}
			"#,
			old
		))
		.unwrap()
	}

	#[test]
	fn test_header_with_savings() {
		let file = package_file(Some("₹24,000"));
		let plan =
			Itinerary::create(&DurationParser::new(), &file.destination, &file.package);
		let report = ItineraryReporter::new(
			&file,
			&plan,
			PriceLines {
				price: Some("₹21,000".to_string()),
				was: Some("₹24,000".to_string()),
				savings: Some("₹3,000".to_string()),
			},
		)
		.render();

		assert!(report.starts_with(
			"Spiti Circuit (Spiti)\n\
			 Duration: 3 days (3 days)\n\
			 Price: ₹21,000\n\
			 Was: ₹24,000 (save ₹3,000)\n\
			 \n\
			 Day 1: Arrival in Spiti\n"
		));
		assert!(report.contains("\nDay 2: Key Monastery\n"));
		assert!(report.contains("  - Guided experience: Key Monastery\n"));
		assert!(report.ends_with("  Meals: Breakfast\n"));
	}

	#[test]
	fn test_price_on_request() {
		let file = package_file(None);
		let plan =
			Itinerary::create(&DurationParser::new(), &file.destination, &file.package);
		let report = ItineraryReporter::new(
			&file,
			&plan,
			PriceLines {
				price: None,
				was: None,
				savings: None,
			},
		)
		.render();

		assert!(report.contains("\nPrice on request\n"));
		assert!(!report.contains("Was:"));
	}
}
