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

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
	Buy,
	Sell,
}

impl Side {
	/// Get the opposite side
	pub fn opposite(&self) -> Self {
		match self {
			Side::Buy => Side::Sell,
			Side::Sell => Side::Buy,
		}
	}
}

/// Order status
///
/// Terminal states (Filled, Cancelled) are final: the order is never
/// mutated again once it reaches one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
	Open,
	PartiallyFilled,
	Filled,
	Cancelled,
}

impl OrderStatus {
	/// Check if status is terminal (no further transitions possible)
	pub fn is_terminal(&self) -> bool {
		matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
	}
}

/// A limit order tracked by the engine
///
/// Orders are created on submission and mutated in place by the matcher as
/// fills arrive. They are never deleted: a filled order remains queryable
/// in the book and through the order index, distinguishable by status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Unique order ID (`ord_<uuid>`)
	pub order_id: String,
	/// Ticker symbol
	pub symbol: String,
	/// Order side
	pub side: Side,
	/// Limit price
	pub price: Decimal,
	/// Original quantity in shares
	pub quantity: u64,
	/// Unfilled quantity in shares
	pub remaining_quantity: u64,
	/// Current status
	pub status: OrderStatus,
	/// Timestamp when the order was created (Unix millis, for time priority)
	pub created_at: u64,
}

impl Order {
	/// Create a new open order with a fresh id
	pub fn new(symbol: &str, side: Side, price: Decimal, quantity: u64, created_at: u64) -> Self {
		Self {
			order_id: format!("ord_{}", uuid::Uuid::new_v4()),
			symbol: symbol.to_string(),
			side,
			price,
			quantity,
			remaining_quantity: quantity,
			status: OrderStatus::Open,
			created_at,
		}
	}

	/// Quantity filled so far
	pub fn filled_quantity(&self) -> u64 {
		self.quantity - self.remaining_quantity
	}

	/// Check if the order is completely filled
	pub fn is_filled(&self) -> bool {
		self.remaining_quantity == 0
	}

	/// Check the quantity/status invariant
	///
	/// `remaining <= quantity`, `Filled` iff nothing remains, and
	/// `PartiallyFilled` only with a strictly positive partial remainder.
	pub fn check_invariant(&self) -> bool {
		if self.remaining_quantity > self.quantity {
			return false;
		}
		match self.status {
			OrderStatus::Filled => self.remaining_quantity == 0,
			OrderStatus::PartiallyFilled => {
				self.remaining_quantity > 0 && self.remaining_quantity < self.quantity
			}
			OrderStatus::Open => self.remaining_quantity == self.quantity,
			OrderStatus::Cancelled => true,
		}
	}

	/// Reduce the remaining quantity by a fill and adjust status
	///
	/// # Panics
	/// Panics if the fill exceeds the remaining quantity or the order is
	/// already terminal.
	pub fn apply_fill(&mut self, fill_quantity: u64) {
		assert!(
			!self.status.is_terminal(),
			"Cannot fill a terminal order"
		);
		assert!(
			fill_quantity <= self.remaining_quantity,
			"Fill would exceed remaining quantity"
		);

		self.remaining_quantity -= fill_quantity;
		self.status = if self.remaining_quantity == 0 {
			OrderStatus::Filled
		} else {
			OrderStatus::PartiallyFilled
		};

		debug_assert!(self.check_invariant());
	}
}
