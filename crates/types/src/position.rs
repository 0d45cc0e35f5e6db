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

/// Net long position in a single symbol
///
/// A position exists only while `shares > 0`; the ledger removes it the
/// moment shares reach zero. `average_cost` is a quantity-weighted running
/// average maintained by buys only: sells reduce `shares` and leave the
/// average untouched. `mark_price` tracks the latest transaction price for
/// the symbol, buy or sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPosition {
	pub symbol: String,
	pub shares: u64,
	pub average_cost: Decimal,
	pub mark_price: Decimal,
}

impl PortfolioPosition {
	/// Open a new position from a first buy
	pub fn open(symbol: &str, shares: u64, price: Decimal) -> Self {
		Self {
			symbol: symbol.to_string(),
			shares,
			average_cost: price,
			mark_price: price,
		}
	}

	/// Add bought shares, folding the buy price into the weighted average
	pub fn add_shares(&mut self, quantity: u64, price: Decimal) {
		let held = Decimal::from(self.shares);
		let bought = Decimal::from(quantity);
		let new_shares = held + bought;

		self.average_cost = (held * self.average_cost + bought * price) / new_shares;
		self.shares += quantity;
	}

	/// Remove sold shares; the average cost is not recalculated
	pub fn remove_shares(&mut self, quantity: u64) {
		self.shares = self.shares.saturating_sub(quantity);
	}

	/// Current market value (`shares × mark_price`)
	pub fn market_value(&self) -> Decimal {
		Decimal::from(self.shares) * self.mark_price
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_open_position() {
		let pos = PortfolioPosition::open("AAPL", 10, Decimal::from(50));

		assert_eq!(pos.shares, 10);
		assert_eq!(pos.average_cost, Decimal::from(50));
		assert_eq!(pos.mark_price, Decimal::from(50));
		assert_eq!(pos.market_value(), Decimal::from(500));
	}

	#[test]
	fn test_weighted_average_cost() {
		let mut pos = PortfolioPosition::open("AAPL", 10, Decimal::from(50));

		// 10 @ 50 + 10 @ 60 -> 20 @ 55
		pos.add_shares(10, Decimal::from(60));
		assert_eq!(pos.shares, 20);
		assert_eq!(pos.average_cost, Decimal::from(55));
	}

	#[test]
	fn test_fractional_average_cost() {
		let mut pos = PortfolioPosition::open("MSFT", 1, Decimal::from(50));

		// 1 @ 50 + 1 @ 51 -> 2 @ 50.5, exactly
		pos.add_shares(1, Decimal::from(51));
		assert_eq!(pos.average_cost, Decimal::new(505, 1));
	}

	#[test]
	fn test_sell_preserves_average_cost() {
		let mut pos = PortfolioPosition::open("MSFT", 10, Decimal::from(40));

		pos.remove_shares(5);
		assert_eq!(pos.shares, 5);
		assert_eq!(pos.average_cost, Decimal::from(40));
	}
}
