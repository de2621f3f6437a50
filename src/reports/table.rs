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
use std::fmt::Write;

/// Plain column table for single-line records such as currencies and rates.
/// Widths are measured in characters, so symbols like `₹` or `د.إ` line up.
pub struct Table {
	column_count: usize,
	rows: Vec<Row>,
	right_align: Vec<bool>, // indicates columns by index
}

enum Row {
	Header(Vec<String>),
	Data(Vec<String>),
	Separator,
}

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
			right_align: vec![false; column_count],
		}
	}

	pub fn add_header(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Header(
			row.into_iter().map(|s| s.to_string()).collect(),
		));
	}

	pub fn add_row(&mut self, row: Vec<&str>) {
		self.rows
			.push(Row::Data(row.into_iter().map(|s| s.to_string()).collect()));
	}

	pub fn add_separator(&mut self) {
		self.rows.push(Row::Separator);
	}

	/// Specifies columns that should be right-aligned by index.
	pub fn right_align(&mut self, cols: Vec<usize>) {
		for col in cols {
			self.right_align[col] = true;
		}
	}

	pub fn render(&self) -> String {
		let mut widths = vec![0; self.column_count];
		for row in &self.rows {
			if let Row::Data(cells) | Row::Header(cells) = row {
				for (i, value) in cells.iter().enumerate() {
					widths[i] = widths[i].max(value.chars().count());
				}
			}
		}

		let mut out = String::new();
		for row in &self.rows {
			let line = match row {
				Row::Header(cells) => self.render_cells(&widths, cells, true),
				Row::Data(cells) => self.render_cells(&widths, cells, false),
				Row::Separator => {
					let total = widths.iter().sum::<usize>()
						+ 3 * self.column_count.saturating_sub(1);
					"-".repeat(total)
				},
			};
			let _ = writeln!(out, "{}", line.trim_end());
		}
		out
	}

	fn render_cells(
		&self,
		widths: &[usize],
		cells: &[String],
		header: bool,
	) -> String {
		let padded: Vec<String> = cells
			.iter()
			.enumerate()
			.map(|(i, value)| {
				let pad = widths[i].saturating_sub(value.chars().count());
				if header {
					let left = pad / 2;
					format!("{}{}{}", " ".repeat(left), value, " ".repeat(pad - left))
				} else if self.right_align[i] {
					format!("{}{}", " ".repeat(pad), value)
				} else {
					format!("{}{}", value, " ".repeat(pad))
				}
			})
			.collect();

		padded.join(if header { " | " } else { "   " })
	}
}
