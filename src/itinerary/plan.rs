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
use crate::itinerary::days::DurationParser;
use log::warn;
use serde::Deserialize;

/// Longest plan that will be laid out; longer durations are clamped.
pub const MAX_DAYS: u32 = 90;

#[derive(Debug, Deserialize)]
pub struct Destination {
	pub name: String,
	pub start_point: String,
	pub tagline: String,
}

#[derive(Debug, Deserialize)]
pub struct TripPackage {
	pub name: String,
	pub duration: String,
	#[serde(default)]
	pub highlights: Vec<String>,

	/// Price text in the base currency, e.g. "₹38,500"
	pub price: Option<String>,
	pub old_price: Option<String>,
}

/// The contents of a package file.
#[derive(Debug, Deserialize)]
pub struct PackageFile {
	pub destination: Destination,
	pub package: TripPackage,
}

#[derive(Debug, PartialEq)]
pub struct ItineraryDay {
	pub day: u32,
	pub title: String,
	pub description: String,
	pub activities: Vec<String>,
	pub stay: String,
	pub meals: Vec<String>,
}

pub struct Itinerary {
	pub day_count: u32,
	pub days: Vec<ItineraryDay>,
}

impl Itinerary {
	/// Lays out an arrival day, one day per highlight (cycling when the trip
	/// is longer than the list) and a departure day.
	pub fn create(
		parser: &DurationParser,
		destination: &Destination,
		package: &TripPackage,
	) -> Self {
		let parsed = parser.day_count(&package.duration, package.highlights.len());
		if parsed > MAX_DAYS {
			warn!(
				"duration \"{}\" is over {} days; plan is cut short",
				package.duration, MAX_DAYS
			);
		}
		let day_count = parsed.clamp(2, MAX_DAYS);

		let highlights = if package.highlights.is_empty() {
			vec![destination.tagline.clone()]
		} else {
			package.highlights.clone()
		};

		let mut days = vec![arrival(destination)];
		for day in 2..day_count {
			let highlight = &highlights[(day as usize - 2) % highlights.len()];
			days.push(experience(destination, day, highlight));
		}
		days.push(departure(destination, day_count));

		Self { day_count, days }
	}

	/// Every distinct activity across the plan, in first-seen order.
	pub fn activities(&self) -> Vec<&str> {
		let mut seen: Vec<&str> = Vec::new();
		for activity in self.days.iter().flat_map(|d| &d.activities) {
			if !seen.contains(&activity.as_str()) {
				seen.push(activity);
			}
		}
		seen
	}
}

fn arrival(d: &Destination) -> ItineraryDay {
	ItineraryDay {
		day: 1,
		title: format!("Arrival in {}", d.name),
		description: format!(
			"Touch down at {} where our local crew welcomes you with a slow-paced orientation. Ease into the altitude with gentle walks, warm brews, and a sunset briefing that sets the tone for the journey ahead.",
			d.start_point
		),
		activities: vec![
			format!("Private airport transfer from {}", d.start_point),
			"Welcome briefing with expedition leader".to_string(),
			"Sunset acclimatisation walk with local stories".to_string(),
		],
		stay: format!(
			"Handpicked stay in {} with acclimatisation support",
			d.name
		),
		meals: vec!["Dinner".to_string()],
	}
}

fn experience(d: &Destination, day: u32, highlight: &str) -> ItineraryDay {
	ItineraryDay {
		day,
		title: highlight.to_string(),
		description: format!(
			"Spend day {} diving deep into {}. Expert guides pace the experience to balance adventure with essential rest stops, ensuring you connect meaningfully with {}'s landscapes and communities.",
			day,
			highlight.to_lowercase(),
			d.name
		),
		activities: vec![
			format!("Guided experience: {}", highlight),
			"Curated local interactions and storytelling sessions".to_string(),
			"Flex hours for personal exploration and mindful rest".to_string(),
		],
		stay: "Curated boutique stay close to the day's experiences".to_string(),
		meals: vec!["Breakfast".to_string(), "Dinner".to_string()],
	}
}

fn departure(d: &Destination, day: u32) -> ItineraryDay {
	ItineraryDay {
		day,
		title: format!("Departure from {}", d.name),
		description: format!(
			"Wake up to one last sunrise before an unhurried checkout. After breakfast, our team drops you back to {} with ample buffer time, wrapping up the expedition on a relaxed note.",
			d.start_point
		),
		activities: vec![
			"Breakfast with farewell views".to_string(),
			format!("Private transfer to {}", d.start_point),
			"Journey concludes with on-trip media shared post departure"
				.to_string(),
		],
		stay: "Departure day, no stay arranged".to_string(),
		meals: vec!["Breakfast".to_string()],
	}
}
