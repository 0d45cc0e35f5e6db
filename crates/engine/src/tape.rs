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

use paperfloor_types::Transaction;

/// Append-only transaction log
///
/// Entries are kept in insertion order, which is the authoritative creation
/// sequence. Sequence numbers are handed out monotonically ahead of each
/// append so a transaction carries its tape position even when wall-clock
/// timestamps collide.
#[derive(Debug, Clone, Default)]
pub struct TransactionTape {
	entries: Vec<Transaction>,
	next_seq: u64,
}

impl TransactionTape {
	pub fn new() -> Self {
		Self {
			entries: Vec::new(),
			next_seq: 0,
		}
	}

	/// Hand out the next insertion sequence number
	pub fn next_sequence(&mut self) -> u64 {
		self.next_seq += 1;
		self.next_seq
	}

	/// Append a transaction to the tape
	pub fn append(&mut self, txn: Transaction) {
		self.entries.push(txn);
	}

	/// The `n` most recent transactions, most recent first
	///
	/// Ordered by `occurred_at` descending; entries sharing a timestamp are
	/// broken by insertion order, later appends first. The reverse before
	/// the stable sort is what gives equal timestamps that orientation.
	pub fn recent(&self, n: usize) -> Vec<Transaction> {
		let mut view: Vec<&Transaction> = self.entries.iter().collect();
		view.reverse();
		view.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
		view.into_iter().take(n).cloned().collect()
	}

	/// All transactions in insertion order
	pub fn all(&self) -> &[Transaction] {
		&self.entries
	}

	/// Total count of recorded transactions
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
