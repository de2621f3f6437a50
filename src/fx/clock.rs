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
use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
	fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

#[cfg(test)]
pub use fake::FakeClock;

#[cfg(test)]
mod fake {
	use super::Clock;
	use chrono::{DateTime, TimeDelta, TimeZone, Utc};
	use std::sync::Mutex;

	/// Clock that only moves when told to.
	pub struct FakeClock {
		now: Mutex<DateTime<Utc>>,
	}

	impl FakeClock {
		pub fn new() -> Self {
			Self {
				now: Mutex::new(Utc.with_ymd_and_hms(2024, 11, 1, 9, 0, 0).unwrap()),
			}
		}

		pub fn advance(&self, by: TimeDelta) {
			let mut now = self.now.lock().unwrap();
			*now += by;
		}
	}

	impl Clock for FakeClock {
		fn now(&self) -> DateTime<Utc> {
			*self.now.lock().unwrap()
		}
	}
}
