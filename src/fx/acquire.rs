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
use crate::fx::cancel::CancelToken;
use crate::fx::rate_table::RateTable;
use crate::fx::source::{RateSource, SourceRates};
use anyhow::{bail, Error};
use log::{debug, info, warn};
use std::fmt;

/// Where a rate table came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateOrigin {
	Source(String),
	/// Every source failed; the table only holds the base
	Fallback,
}

impl RateOrigin {
	pub fn is_live(&self) -> bool {
		matches!(self, RateOrigin::Source(_))
	}
}

impl fmt::Display for RateOrigin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RateOrigin::Source(name) => write!(f, "{}", name),
			RateOrigin::Fallback => write!(f, "fallback"),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Acquisition {
	pub table: RateTable,
	pub as_of: Option<String>,
	pub origin: RateOrigin,

	/// Set when the caller cancelled before a source succeeded
	pub cancelled: bool,
}

/// Ordered chain of rate sources; the first one to return usable rates wins
/// and an identity table is the last resort.
pub struct RateAcquirer {
	sources: Vec<Box<dyn RateSource>>,
}

impl RateAcquirer {
	pub fn new(sources: Vec<Box<dyn RateSource>>) -> Self {
		Self { sources }
	}

	/// An acquirer that never touches the network.
	pub fn offline() -> Self {
		Self::new(Vec::new())
	}

	pub fn source_names(&self) -> Vec<&str> {
		self.sources.iter().map(|s| s.name()).collect()
	}

	/// Never fails: cancellation and source errors fall through to the next
	/// source and finally to `{ base: 1.0 }`.
	pub async fn acquire(&self, base: &str, cancel: &CancelToken) -> Acquisition {
		for source in &self.sources {
			match Self::try_source(source.as_ref(), base, cancel).await {
				Ok(rates) => {
					info!(
						"{} rates for {} from {} (as of {})",
						rates.table.quote_count(),
						base,
						source.name(),
						rates.as_of.as_deref().unwrap_or("unknown")
					);
					return Acquisition {
						table: rates.table,
						as_of: rates.as_of,
						origin: RateOrigin::Source(source.name().to_string()),
						cancelled: false,
					};
				},
				Err(e) if cancel.is_cancelled() => {
					debug!("rate source {}: {}", source.name(), e)
				},
				Err(e) => warn!("rate source {} failed: {}", source.name(), e),
			}
		}

		if !self.sources.is_empty() && !cancel.is_cancelled() {
			warn!("no rate source available; prices stay in {}", base);
		}

		Acquisition {
			table: RateTable::identity(base),
			as_of: None,
			origin: RateOrigin::Fallback,
			cancelled: cancel.is_cancelled(),
		}
	}

	async fn try_source(
		source: &dyn RateSource,
		base: &str,
		cancel: &CancelToken,
	) -> Result<SourceRates, Error> {
		if cancel.is_cancelled() {
			bail!("cancelled before request");
		}

		tokio::select! {
			biased;
			_ = cancel.cancelled() => bail!("cancelled during request"),
			rates = source.fetch(base) => rates,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fx::testing::{ScriptedSource, StallingSource};
	use std::sync::Arc;

	#[tokio::test]
	async fn test_primary_wins() {
		let primary = ScriptedSource::ok("primary", &[("USD", 0.012)]);
		let secondary = ScriptedSource::ok("secondary", &[("USD", 0.5)]);
		let (p, s) = (primary.calls(), secondary.calls());
		let acquirer =
			RateAcquirer::new(vec![Box::new(primary), Box::new(secondary)]);

		let result = acquirer.acquire("INR", &CancelToken::new()).await;

		assert_eq!(result.table.get("USD"), Some(0.012));
		assert_eq!(result.origin, RateOrigin::Source("primary".to_string()));
		assert_eq!(result.as_of.as_deref(), Some("2024-11-01"));
		assert_eq!(p.load(), 1);
		assert_eq!(s.load(), 0);
	}

	#[tokio::test]
	async fn test_secondary_used_when_primary_fails() {
		let secondary = ScriptedSource::ok("secondary", &[("EUR", 0.011)]);
		let expected = secondary.table();
		let acquirer = RateAcquirer::new(vec![
			Box::new(ScriptedSource::failing("primary")),
			Box::new(secondary),
		]);

		let result = acquirer.acquire("INR", &CancelToken::new()).await;

		assert_eq!(result.table, expected);
		assert_eq!(result.origin, RateOrigin::Source("secondary".to_string()));
		assert!(!result.cancelled);
	}

	#[tokio::test]
	async fn test_all_sources_fail() {
		let acquirer = RateAcquirer::new(vec![
			Box::new(ScriptedSource::failing("primary")),
			Box::new(ScriptedSource::failing("secondary")),
		]);

		let result = acquirer.acquire("INR", &CancelToken::new()).await;

		assert_eq!(result.table, RateTable::identity("INR"));
		assert_eq!(result.table.quote_count(), 0);
		assert_eq!(result.origin, RateOrigin::Fallback);
		assert_eq!(result.as_of, None);
	}

	#[tokio::test]
	async fn test_offline_is_identity() {
		let acquirer = RateAcquirer::offline();
		assert!(acquirer.source_names().is_empty());
		let result = acquirer.acquire("INR", &CancelToken::new()).await;
		assert_eq!(result.table, RateTable::identity("INR"));
	}

	#[tokio::test]
	async fn test_cancelled_before_start_skips_sources() {
		let primary = ScriptedSource::ok("primary", &[("USD", 0.012)]);
		let calls = primary.calls();
		let acquirer = RateAcquirer::new(vec![Box::new(primary)]);
		let cancel = CancelToken::new();
		cancel.cancel();

		let result = acquirer.acquire("INR", &cancel).await;

		assert_eq!(calls.load(), 0);
		assert_eq!(result.table, RateTable::identity("INR"));
		assert!(result.cancelled);
	}

	#[tokio::test]
	async fn test_cancel_mid_flight_falls_through() {
		let stalling = StallingSource::new("primary");
		let started = Arc::clone(&stalling.started);
		let secondary = ScriptedSource::ok("secondary", &[("USD", 0.5)]);
		let secondary_calls = secondary.calls();
		let acquirer =
			RateAcquirer::new(vec![Box::new(stalling), Box::new(secondary)]);

		let cancel = CancelToken::new();
		let trigger = cancel.clone();
		let canceller = async move {
			started.notified().await;
			trigger.cancel();
		};

		let (result, _) =
			tokio::join!(acquirer.acquire("INR", &cancel), canceller);

		assert!(result.cancelled);
		assert_eq!(result.origin, RateOrigin::Fallback);
		assert_eq!(result.table, RateTable::identity("INR"));
		assert_eq!(secondary_calls.load(), 0);
	}
}
