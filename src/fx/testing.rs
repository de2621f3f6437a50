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
//! Fake rate sources for exercising the acquisition chain and the cache.

use crate::fx::rate_table::RateTable;
use crate::fx::source::{RateSource, SourceRates};
use anyhow::{anyhow, Error};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
	pub fn load(&self) -> usize {
		self.0.load(Ordering::SeqCst)
	}

	fn bump(&self) {
		self.0.fetch_add(1, Ordering::SeqCst);
	}
}

pub fn table(rates: &[(&str, f64)]) -> RateTable {
	let mut table = RateTable::identity("INR");
	for (code, rate) in rates {
		table.insert(code, *rate);
	}
	table
}

/// Replays queued responses in order, repeating the last one forever.
pub struct ScriptedSource {
	name: String,
	script: Mutex<VecDeque<Result<RateTable, String>>>,
	calls: CallCounter,
}

impl ScriptedSource {
	pub fn new(name: &str, script: Vec<Result<RateTable, String>>) -> Self {
		Self {
			name: name.to_string(),
			script: Mutex::new(script.into()),
			calls: CallCounter::default(),
		}
	}

	pub fn ok(name: &str, rates: &[(&str, f64)]) -> Self {
		Self::new(name, vec![Ok(table(rates))])
	}

	pub fn failing(name: &str) -> Self {
		Self::new(name, vec![Err("connection refused".to_string())])
	}

	pub fn calls(&self) -> CallCounter {
		self.calls.clone()
	}

	/// The table the next call will return.
	pub fn table(&self) -> RateTable {
		match self.script.lock().unwrap().front() {
			Some(Ok(t)) => t.clone(),
			_ => panic!("no table scripted"),
		}
	}
}

#[async_trait]
impl RateSource for ScriptedSource {
	fn name(&self) -> &str {
		&self.name
	}

	async fn fetch(&self, _base: &str) -> Result<SourceRates, Error> {
		self.calls.bump();
		// suspend once so concurrent callers interleave like a real request
		tokio::task::yield_now().await;

		let next = {
			let mut script = self.script.lock().unwrap();
			if script.len() > 1 {
				script.pop_front()
			} else {
				script.front().cloned()
			}
		};

		match next {
			Some(Ok(table)) => Ok(SourceRates {
				table,
				as_of: Some("2024-11-01".to_string()),
			}),
			Some(Err(e)) => Err(anyhow!(e)),
			None => Err(anyhow!("nothing scripted")),
		}
	}
}

/// Never answers; signals `started` when a request begins.
pub struct StallingSource {
	name: String,
	pub started: Arc<Notify>,
}

impl StallingSource {
	pub fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			started: Arc::new(Notify::new()),
		}
	}
}

#[async_trait]
impl RateSource for StallingSource {
	fn name(&self) -> &str {
		&self.name
	}

	async fn fetch(&self, _base: &str) -> Result<SourceRates, Error> {
		self.started.notify_one();
		std::future::pending().await
	}
}
