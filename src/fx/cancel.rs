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
use std::sync::Arc;
use tokio::sync::watch;

/// Shared cancellation flag. Clones observe the same state; once cancelled
/// a token stays cancelled.
#[derive(Clone, Debug)]
pub struct CancelToken {
	tx: Arc<watch::Sender<bool>>,
	rx: watch::Receiver<bool>,
}

impl CancelToken {
	pub fn new() -> Self {
		let (tx, rx) = watch::channel(false);
		Self {
			tx: Arc::new(tx),
			rx,
		}
	}

	pub fn cancel(&self) {
		self.tx.send_replace(true);
	}

	pub fn is_cancelled(&self) -> bool {
		*self.rx.borrow()
	}

	/// Resolves once the token is cancelled.
	pub async fn cancelled(&self) {
		let mut rx = self.rx.clone();
		// the sender lives as long as any clone of this token, so the
		// channel cannot close while we wait
		let _ = rx.wait_for(|cancelled| *cancelled).await;
	}
}

impl Default for CancelToken {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[test]
	fn test_clones_share_state() {
		let token = CancelToken::new();
		let other = token.clone();
		assert!(!other.is_cancelled());
		token.cancel();
		assert!(other.is_cancelled());
		token.cancel();
		assert!(token.is_cancelled());
	}

	#[tokio::test]
	async fn test_cancelled_resolves() {
		let token = CancelToken::new();
		let waiter = token.clone();
		let handle = tokio::spawn(async move { waiter.cancelled().await });
		token.cancel();
		tokio::time::timeout(Duration::from_secs(1), handle)
			.await
			.unwrap()
			.unwrap();
	}

	#[tokio::test]
	async fn test_already_cancelled_resolves_immediately() {
		let token = CancelToken::new();
		token.cancel();
		tokio::time::timeout(Duration::from_millis(50), token.cancelled())
			.await
			.unwrap();
	}
}
