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
use crate::fx::acquire::{Acquisition, RateAcquirer, RateOrigin};
use crate::fx::cancel::CancelToken;
use crate::fx::clock::Clock;
use crate::fx::rate_table::RateTable;
use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshPolicy {
	/// How long live rates are served without a refresh
	pub ttl: TimeDelta,
	/// How long fallback rates are served before the sources are retried
	pub retry: TimeDelta,
}

impl Default for RefreshPolicy {
	fn default() -> Self {
		Self {
			ttl: TimeDelta::hours(1),
			retry: TimeDelta::minutes(5),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct RateSnapshot {
	pub table: RateTable,
	pub as_of: Option<String>,
	pub origin: RateOrigin,
	pub stored_at: DateTime<Utc>,
}

impl RateSnapshot {
	fn new(acquisition: Acquisition, stored_at: DateTime<Utc>) -> Self {
		Self {
			table: acquisition.table,
			as_of: acquisition.as_of,
			origin: acquisition.origin,
			stored_at,
		}
	}

	pub fn is_fresh(&self, now: DateTime<Utc>, policy: &RefreshPolicy) -> bool {
		let window = if self.origin.is_live() {
			policy.ttl
		} else {
			policy.retry
		};
		now - self.stored_at < window
	}
}

/// Holds the one rate snapshot for a base currency.
///
/// Reads never wait on a refresh once a snapshot exists: stale snapshots are
/// served while a background task fetches the replacement. Every acquisition
/// goes through `gate`, so concurrent triggers share one network round trip.
pub struct RateCache {
	base: String,
	acquirer: RateAcquirer,
	clock: Arc<dyn Clock>,
	policy: RefreshPolicy,

	snapshot: Mutex<Option<Arc<RateSnapshot>>>,
	gate: Arc<AsyncMutex<()>>,
	loading: AtomicBool,
}

impl RateCache {
	pub fn new(
		base: &str,
		acquirer: RateAcquirer,
		clock: Arc<dyn Clock>,
		policy: RefreshPolicy,
	) -> Self {
		Self {
			base: base.to_string(),
			acquirer,
			clock,
			policy,
			snapshot: Mutex::new(None),
			gate: Arc::new(AsyncMutex::new(())),
			loading: AtomicBool::new(false),
		}
	}

	/// The snapshot currently held, without triggering anything.
	pub fn current(&self) -> Option<Arc<RateSnapshot>> {
		self.snapshot
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// True while the very first acquisition is in flight.
	pub fn is_loading(&self) -> bool {
		self.loading.load(Ordering::SeqCst)
	}

	/// Returns the held snapshot, acquiring one first if there is none. A
	/// stale snapshot is returned as-is and a background refresh is started.
	pub async fn read(self: &Arc<Self>, cancel: &CancelToken) -> Arc<RateSnapshot> {
		if let Some(snapshot) = self.current() {
			if !snapshot.is_fresh(self.clock.now(), &self.policy) {
				self.spawn_refresh(cancel.clone());
			}
			return snapshot;
		}

		let _gate = self.gate.lock().await;

		// someone else filled it while we waited
		if let Some(snapshot) = self.current() {
			return snapshot;
		}

		let acquisition = {
			let _loading = LoadingFlag::raise(&self.loading);
			self.acquirer.acquire(&self.base, cancel).await
		};

		let cancelled = acquisition.cancelled;
		let snapshot = Arc::new(RateSnapshot::new(acquisition, self.clock.now()));
		if cancelled {
			debug!("initial rate fetch cancelled; not caching");
		} else {
			self.store(Arc::clone(&snapshot));
		}
		snapshot
	}

	/// Starts a refresh unless one is already running.
	pub fn spawn_refresh(self: &Arc<Self>, cancel: CancelToken) {
		let Ok(guard) = Arc::clone(&self.gate).try_lock_owned() else {
			debug!("rate refresh already in flight");
			return;
		};

		let cache = Arc::clone(self);
		tokio::spawn(async move {
			let _guard = guard;
			cache.refresh(&cancel).await;
		});
	}

	/// Waits for any in-flight acquisition to finish.
	#[cfg(test)]
	pub async fn settle(&self) {
		let _ = self.gate.lock().await;
	}

	async fn refresh(&self, cancel: &CancelToken) {
		debug!("refreshing {} rates", self.base);
		let acquisition = self.acquirer.acquire(&self.base, cancel).await;
		if acquisition.cancelled {
			debug!("rate refresh cancelled; keeping current rates");
			return;
		}

		let held_is_live = self
			.current()
			.map(|s| s.origin.is_live())
			.unwrap_or(false);

		if acquisition.origin.is_live() || !held_is_live {
			info!("{} rates refreshed from {}", self.base, acquisition.origin);
			let snapshot = RateSnapshot::new(acquisition, self.clock.now());
			self.store(Arc::new(snapshot));
		} else {
			info!("rate refresh failed; keeping stale {} rates", self.base);
		}
	}

	fn store(&self, snapshot: Arc<RateSnapshot>) {
		*self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) =
			Some(snapshot);
	}
}

/// Holds `loading` up for its own lifetime, so a read dropped mid-fetch
/// still lowers it.
struct LoadingFlag<'a>(&'a AtomicBool);

impl<'a> LoadingFlag<'a> {
	fn raise(flag: &'a AtomicBool) -> Self {
		flag.store(true, Ordering::SeqCst);
		Self(flag)
	}
}

impl Drop for LoadingFlag<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::SeqCst);
	}
}
