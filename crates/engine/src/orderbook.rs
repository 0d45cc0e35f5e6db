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

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use paperfloor_types::{Order, Side};

/// Matching priority for the bid side: highest price first, then earliest
/// submission. Entries equal on both keys keep insertion order because the
/// sort is stable.
fn bid_priority(a: &Order, b: &Order) -> Ordering {
	b.price
		.cmp(&a.price)
		.then(a.created_at.cmp(&b.created_at))
}

/// Matching priority for the ask side: lowest price first, then earliest
/// submission.
fn ask_priority(a: &Order, b: &Order) -> Ordering {
	a.price
		.cmp(&b.price)
		.then(a.created_at.cmp(&b.created_at))
}

/// Order book for a single symbol (single-threaded)
///
/// Each side is a sequence kept fully sorted by matching priority: an
/// insert appends and re-establishes the sort, so the sequence is in
/// priority order after every mutation. Price and timestamp never change
/// after insertion, which is why `update` can replace in place without a
/// resort.
///
/// Orders are not evicted on fill. A filled order stays in its side,
/// distinguishable by status, so the book doubles as the audit view of
/// everything that ever rested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolBook {
	symbol: String,
	/// Buy side, sorted by (price desc, created_at asc)
	bids: Vec<Order>,
	/// Sell side, sorted by (price asc, created_at asc)
	asks: Vec<Order>,
}

impl SymbolBook {
	/// Create an empty book for a symbol
	pub fn new(symbol: String) -> Self {
		Self {
			symbol,
			bids: Vec::new(),
			asks: Vec::new(),
		}
	}

	/// Get the symbol this book is for
	pub fn symbol(&self) -> &str {
		&self.symbol
	}

	/// Add an order and re-establish the side's sort order
	pub fn insert(&mut self, order: Order) {
		match order.side {
			Side::Buy => {
				self.bids.push(order);
				self.bids.sort_by(bid_priority);
			}
			Side::Sell => {
				self.asks.push(order);
				self.asks.sort_by(ask_priority);
			}
		}
	}

	/// Replace the stored order with the same id
	///
	/// Used by the matcher after mutating remaining quantity or status.
	/// No resort happens; the priority keys are immutable after insertion.
	pub fn update(&mut self, order: &Order) -> bool {
		let side = self.side_mut(order.side);
		if let Some(stored) = side.iter_mut().find(|o| o.order_id == order.order_id) {
			*stored = order.clone();
			true
		} else {
			false
		}
	}

	/// Delete an order by id
	///
	/// Normal matching never removes anything (filled orders are kept for
	/// audit), but the operation backs the cancellation extension.
	pub fn remove(&mut self, side: Side, order_id: &str) -> Option<Order> {
		let entries = self.side_mut(side);
		let pos = entries.iter().position(|o| o.order_id == order_id)?;
		Some(entries.remove(pos))
	}

	/// The current ordered view of one side
	pub fn side(&self, side: Side) -> &[Order] {
		match side {
			Side::Buy => &self.bids,
			Side::Sell => &self.asks,
		}
	}

	/// Owned ordered copy of one side
	pub fn snapshot(&self, side: Side) -> Vec<Order> {
		self.side(side).to_vec()
	}

	/// Total number of orders tracked on both sides
	pub fn order_count(&self) -> usize {
		self.bids.len() + self.asks.len()
	}

	fn side_mut(&mut self, side: Side) -> &mut Vec<Order> {
		match side {
			Side::Buy => &mut self.bids,
			Side::Sell => &mut self.asks,
		}
	}
}
