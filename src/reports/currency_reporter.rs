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
use crate::fx::currency::Currency;
use crate::reports::table::Table;

/// Prints the currency picker listing: common currencies first, then the
/// rest, with the active selection marked.
pub struct CurrencyReporter {
	common: Vec<&'static Currency>,
	others: Vec<&'static Currency>,
	selected: &'static str,
}

impl CurrencyReporter {
	pub fn new(
		(common, others): (Vec<&'static Currency>, Vec<&'static Currency>),
		selected: &'static str,
	) -> Self {
		Self {
			common,
			others,
			selected,
		}
	}

	pub fn print(&self) {
		print!("{}", self.render());
	}

	pub fn render(&self) -> String {
		if self.common.is_empty() && self.others.is_empty() {
			return "No matching currencies\n".to_string();
		}

		let mut sections = Vec::new();
		if !self.common.is_empty() {
			sections.push(self.section("Commonly Used Currencies", &self.common));
		}
		if !self.others.is_empty() {
			sections.push(self.section("All Other Currencies", &self.others));
		}
		sections.join("\n")
	}

	fn section(&self, title: &str, currencies: &[&Currency]) -> String {
		let mut table = Table::new(5);
		table.add_header(vec!["", "Code", "Symbol", "Name", "Flag"]);
		table.add_separator();

		for c in currencies {
			let flag = c.flag_code();
			table.add_row(vec![
				if c.code == self.selected { "*" } else { "" },
				c.code,
				c.symbol,
				c.name,
				&flag,
			]);
		}

		format!("{}\n{}", title, table.render())
	}
}
