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
use crate::fx::acquire::RateOrigin;
use crate::fx::cache::RateSnapshot;
use crate::fx::currency::CURRENCIES;
use crate::reports::table::Table;

pub struct RateReporter<'a> {
	snapshot: &'a RateSnapshot,
}

impl<'a> RateReporter<'a> {
	pub fn new(snapshot: &'a RateSnapshot) -> RateReporter<'a> {
		Self { snapshot }
	}

	pub fn print_all_rates(&self) {
		print!("{}", self.render());
	}

	pub fn render(&self) -> String {
		let mut table = Table::new(3);
		table.add_header(vec!["Code", "Name", "Rate"]);
		table.add_separator();
		table.right_align(vec![2]);

		for currency in CURRENCIES.iter() {
			let rate = match self.snapshot.table.get(currency.code) {
				Some(rate) => rate.to_string(),
				None => "n/a".to_string(),
			};
			table.add_row(vec![currency.code, currency.name, &rate]);
		}

		format!("{}\n{}", self.title(), table.render())
	}

	fn title(&self) -> String {
		let base = self.snapshot.table.base();
		match &self.snapshot.origin {
			RateOrigin::Fallback => format!(
				"Rates per 1 {} (no source reachable, amounts stay in {})",
				base, base
			),
			RateOrigin::Source(name) => match &self.snapshot.as_of {
				Some(date) => {
					format!("Rates per 1 {} (as of {}, from {})", base, date, name)
				},
				None => format!("Rates per 1 {} (from {})", base, name),
			},
		}
	}
}
