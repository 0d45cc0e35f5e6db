// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use tracing::debug;

use paperfloor_types::Transaction;

/// Callback invoked with the transactions produced by one submission
///
/// Listeners run synchronously on the submitting thread, so a slow listener
/// delays the caller. Hosts with latency requirements should hand the batch
/// off to a channel inside their listener.
pub trait TransactionListener: Send + Sync {
	fn on_transactions(&self, batch: &[Transaction]);
}

/// Set of subscribed listeners, identified by reference
///
/// Subscriptions are compared by `Arc` pointer identity: subscribing the
/// same `Arc` twice is a no-op, and unsubscribing requires the same `Arc`
/// that was subscribed.
#[derive(Default)]
pub struct ListenerSet {
	listeners: Vec<Arc<dyn TransactionListener>>,
}

impl ListenerSet {
	pub fn new() -> Self {
		Self {
			listeners: Vec::new(),
		}
	}

	/// Add a listener; duplicates (same allocation) are ignored
	pub fn subscribe(&mut self, listener: Arc<dyn TransactionListener>) {
		if !self.listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
			self.listeners.push(listener);
		}
	}

	/// Remove a previously subscribed listener
	///
	/// Returns whether the listener was found.
	pub fn unsubscribe(&mut self, listener: &Arc<dyn TransactionListener>) -> bool {
		let before = self.listeners.len();
		self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
		self.listeners.len() != before
	}

	/// Invoke every listener once with the batch
	///
	/// Empty batches are never delivered.
	pub fn broadcast(&self, batch: &[Transaction]) {
		if batch.is_empty() {
			return;
		}
		debug!(
			batch_size = batch.len(),
			listeners = self.listeners.len(),
			"Broadcasting transaction batch"
		);
		for listener in &self.listeners {
			listener.on_transactions(batch);
		}
	}

	/// Number of current subscriptions
	pub fn len(&self) -> usize {
		self.listeners.len()
	}

	pub fn is_empty(&self) -> bool {
		self.listeners.is_empty()
	}
}
