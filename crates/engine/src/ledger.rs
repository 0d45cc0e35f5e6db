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

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use paperfloor_types::{OrderRef, PortfolioPosition, Transaction};

/// Owned view of the ledger returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
	/// Open positions keyed by symbol (sorted)
	pub positions: BTreeMap<String, PortfolioPosition>,
	/// Sum of `shares × mark_price` over all open positions
	pub total_value: Decimal,
}

/// Portfolio ledger derived from the transaction stream
///
/// The ledger holds the caller's net position per symbol. Positions exist
/// only while shares are held: a sell that brings shares to zero removes
/// the entry entirely. `BTreeMap` keeps iteration deterministic for
/// snapshots and reports.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
	positions: BTreeMap<String, PortfolioPosition>,
}

impl Ledger {
	pub fn new() -> Self {
		Self {
			positions: BTreeMap::new(),
		}
	}

	/// Apply one transaction to the ledger
	///
	/// Which legs apply is decided by resolving the order references
	/// against the set of known orders (`is_known_order`), sentinels never
	/// resolving:
	/// - the buy leg applies when the buy reference resolves, or
	///   unconditionally when the sell side is the `Auto` sentinel;
	/// - the sell leg applies when the sell reference resolves, or
	///   unconditionally when the buy side is the `Market` sentinel.
	///
	/// An internal cross between two known orders applies both legs. The
	/// mark price is set to the transaction price afterwards, unless the
	/// position was just removed.
	pub fn apply<F>(&mut self, txn: &Transaction, is_known_order: F)
	where
		F: Fn(&str) -> bool,
	{
		let buy_leg = txn.sell_ref == OrderRef::Auto
			|| txn
				.buy_ref
				.order_id()
				.map(&is_known_order)
				.unwrap_or(false);
		let sell_leg = txn.buy_ref == OrderRef::Market
			|| txn
				.sell_ref
				.order_id()
				.map(&is_known_order)
				.unwrap_or(false);

		if buy_leg {
			self.apply_buy(&txn.symbol, txn.quantity, txn.price);
		}
		if sell_leg {
			self.apply_sell(&txn.symbol, txn.quantity);
		}

		if let Some(position) = self.positions.get_mut(&txn.symbol) {
			position.mark_price = txn.price;
		}
	}

	fn apply_buy(&mut self, symbol: &str, quantity: u64, price: Decimal) {
		match self.positions.get_mut(symbol) {
			Some(position) => position.add_shares(quantity, price),
			None => {
				self.positions.insert(
					symbol.to_string(),
					PortfolioPosition::open(symbol, quantity, price),
				);
			}
		}
	}

	fn apply_sell(&mut self, symbol: &str, quantity: u64) {
		if let Some(position) = self.positions.get_mut(symbol) {
			position.remove_shares(quantity);
			if position.shares == 0 {
				self.positions.remove(symbol);
			}
		}
	}

	/// Shares currently held for a symbol (zero when no position exists)
	pub fn shares(&self, symbol: &str) -> u64 {
		self.positions.get(symbol).map(|p| p.shares).unwrap_or(0)
	}

	/// The open position for a symbol, if any
	pub fn position(&self, symbol: &str) -> Option<&PortfolioPosition> {
		self.positions.get(symbol)
	}

	/// Number of open positions
	pub fn position_count(&self) -> usize {
		self.positions.len()
	}

	/// Sum of `shares × mark_price` over all open positions
	pub fn total_value(&self) -> Decimal {
		self.positions.values().map(|p| p.market_value()).sum()
	}

	/// Owned snapshot of all positions plus the total value
	pub fn snapshot(&self) -> PortfolioSnapshot {
		PortfolioSnapshot {
			positions: self.positions.clone(),
			total_value: self.total_value(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn crossed(seq: u64, symbol: &str, buy: &str, sell: &str, qty: u64, price: u64) -> Transaction {
		Transaction::new(
			seq,
			symbol,
			OrderRef::Order(buy.to_string()),
			OrderRef::Order(sell.to_string()),
			qty,
			Decimal::from(price),
			1000 + seq,
		)
	}

	fn synthetic_buy(seq: u64, symbol: &str, buy: &str, qty: u64, price: u64) -> Transaction {
		Transaction::new(
			seq,
			symbol,
			OrderRef::Order(buy.to_string()),
			OrderRef::Auto,
			qty,
			Decimal::from(price),
			1000 + seq,
		)
	}

	fn synthetic_sell(seq: u64, symbol: &str, sell: &str, qty: u64, price: u64) -> Transaction {
		Transaction::new(
			seq,
			symbol,
			OrderRef::Market,
			OrderRef::Order(sell.to_string()),
			qty,
			Decimal::from(price),
			1000 + seq,
		)
	}

	#[test]
	fn test_auto_fill_opens_position() {
		let mut ledger = Ledger::new();

		// Sentinel counterparty: buy leg applies even though no order resolves
		ledger.apply(&synthetic_buy(1, "AAPL", "ord_b", 10, 50), |_| false);

		let position = ledger.position("AAPL").unwrap();
		assert_eq!(position.shares, 10);
		assert_eq!(position.average_cost, Decimal::from(50));
		assert_eq!(position.mark_price, Decimal::from(50));
	}

	#[test]
	fn test_weighted_average_across_buys() {
		let mut ledger = Ledger::new();

		ledger.apply(&synthetic_buy(1, "AAPL", "ord_1", 10, 50), |_| false);
		ledger.apply(&synthetic_buy(2, "AAPL", "ord_2", 10, 60), |_| false);

		let position = ledger.position("AAPL").unwrap();
		assert_eq!(position.shares, 20);
		assert_eq!(position.average_cost, Decimal::from(55));
		assert_eq!(position.mark_price, Decimal::from(60));
	}

	#[test]
	fn test_sell_keeps_average_cost_and_removal_at_zero() {
		let mut ledger = Ledger::new();

		ledger.apply(&synthetic_buy(1, "MSFT", "ord_b", 10, 40), |_| false);

		ledger.apply(&synthetic_sell(2, "MSFT", "ord_s1", 5, 60), |_| false);
		let position = ledger.position("MSFT").unwrap();
		assert_eq!(position.shares, 5);
		assert_eq!(position.average_cost, Decimal::from(40));
		assert_eq!(position.mark_price, Decimal::from(60));

		ledger.apply(&synthetic_sell(3, "MSFT", "ord_s2", 5, 61), |_| false);
		assert!(ledger.position("MSFT").is_none());
		assert_eq!(ledger.shares("MSFT"), 0);
	}

	#[test]
	fn test_resolved_refs_decide_legs() {
		let mut ledger = Ledger::new();
		let known = ["ord_buy"];
		let resolver = |id: &str| known.contains(&id);

		// Only the buy reference resolves: treat as a buy
		ledger.apply(&crossed(1, "TSLA", "ord_buy", "ord_other", 4, 30), resolver);
		assert_eq!(ledger.shares("TSLA"), 4);

		// Neither side resolves, no sentinel: nothing applies
		ledger.apply(&crossed(2, "TSLA", "ord_x", "ord_y", 4, 31), resolver);
		assert_eq!(ledger.shares("TSLA"), 4);
	}

	#[test]
	fn test_internal_cross_applies_both_legs() {
		let mut ledger = Ledger::new();

		ledger.apply(&synthetic_buy(1, "TSLA", "ord_1", 10, 30), |_| false);

		// Both refs resolve: buy and sell legs net out, mark price moves
		ledger.apply(&crossed(2, "TSLA", "ord_2", "ord_3", 6, 35), |_| true);

		let position = ledger.position("TSLA").unwrap();
		assert_eq!(position.shares, 10);
		assert_eq!(position.mark_price, Decimal::from(35));
	}

	#[test]
	fn test_total_value() {
		let mut ledger = Ledger::new();

		ledger.apply(&synthetic_buy(1, "AAPL", "ord_1", 10, 50), |_| false);
		ledger.apply(&synthetic_buy(2, "MSFT", "ord_2", 2, 100), |_| false);

		// 10 × 50 + 2 × 100
		assert_eq!(ledger.total_value(), Decimal::from(700));

		let snapshot = ledger.snapshot();
		assert_eq!(snapshot.positions.len(), 2);
		assert_eq!(snapshot.total_value, Decimal::from(700));
	}

	#[test]
	fn test_replay_from_stream_matches_incremental() {
		let transactions = vec![
			synthetic_buy(1, "AAPL", "ord_1", 10, 50),
			synthetic_buy(2, "AAPL", "ord_2", 6, 56),
			synthetic_sell(3, "AAPL", "ord_3", 9, 60),
			synthetic_buy(4, "MSFT", "ord_4", 3, 100),
		];

		let mut live = Ledger::new();
		for txn in &transactions {
			live.apply(txn, |_| false);
		}

		let mut replayed = Ledger::new();
		for txn in &transactions {
			replayed.apply(txn, |_| false);
		}

		assert_eq!(live.snapshot(), replayed.snapshot());
		assert_eq!(live.shares("AAPL"), 7);
		assert_eq!(live.shares("MSFT"), 3);
	}
}
