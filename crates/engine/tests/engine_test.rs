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

//! Integration tests for the matching engine
//!
//! These tests exercise the public submission flow end to end:
//! - Synthetic-liquidity fills and their sentinel counterparties
//! - Portfolio ledger bookkeeping (weighted average cost, removal at zero)
//! - Tape queries and listener notification
//! - Registry capacity and ordering contracts

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rust_decimal::Decimal;

use paperfloor_engine::{Engine, EngineConfig, EngineError, Ledger, TransactionListener};
use paperfloor_types::{OrderRef, OrderStatus, Side, Transaction};

fn price(value: u64) -> Decimal {
	Decimal::from(value)
}

#[test]
fn test_buy_against_empty_book_fills_synthetically() {
	let mut engine = Engine::new();

	let order = engine.submit(Side::Buy, "AAPL", 10, price(50)).unwrap();

	assert_eq!(order.status, OrderStatus::Filled);
	assert_eq!(order.remaining_quantity, 0);

	let txns = engine.recent_transactions(10);
	assert_eq!(txns.len(), 1);
	assert_eq!(txns[0].buy_ref, OrderRef::Order(order.order_id.clone()));
	assert_eq!(txns[0].sell_ref, OrderRef::Auto);
	assert_eq!(txns[0].quantity, 10);
	assert_eq!(txns[0].price, price(50));

	let portfolio = engine.portfolio();
	let position = &portfolio.positions["AAPL"];
	assert_eq!(position.shares, 10);
	assert_eq!(position.average_cost, price(50));

	// The synthetically filled order never rested
	let book = engine.book("AAPL");
	assert!(book.bids.is_empty());
	assert!(book.asks.is_empty());
}

#[test]
fn test_sell_uses_market_sentinel_and_preserves_average_cost() {
	let mut engine = Engine::new();

	engine.submit(Side::Buy, "MSFT", 10, price(40)).unwrap();

	let sell = engine.submit(Side::Sell, "MSFT", 5, price(60)).unwrap();
	assert_eq!(sell.status, OrderStatus::Filled);

	let txns = engine.recent_transactions(1);
	assert_eq!(txns[0].buy_ref, OrderRef::Market);
	assert_eq!(txns[0].sell_ref, OrderRef::Order(sell.order_id.clone()));

	let portfolio = engine.portfolio();
	let position = &portfolio.positions["MSFT"];
	assert_eq!(position.shares, 5);
	assert_eq!(position.average_cost, price(40));
	assert_eq!(position.mark_price, price(60));

	// Selling the remainder removes the position entirely
	engine.submit(Side::Sell, "MSFT", 5, price(61)).unwrap();
	assert!(engine.portfolio().positions.is_empty());
}

#[test]
fn test_oversized_sell_is_rejected_without_effects() {
	let mut engine = Engine::new();

	engine.submit(Side::Buy, "NVDA", 3, price(100)).unwrap();
	let before = engine.recent_transactions(10).len();

	let result = engine.submit(Side::Sell, "NVDA", 4, price(100));
	assert!(matches!(
		result,
		Err(EngineError::InsufficientShares {
			held: 3,
			requested: 4,
			..
		})
	));

	assert_eq!(engine.recent_transactions(10).len(), before);
	assert_eq!(engine.portfolio().positions["NVDA"].shares, 3);
}

#[test]
fn test_total_value_sums_positions_at_mark() {
	let mut engine = Engine::new();

	engine.submit(Side::Buy, "AAPL", 10, price(50)).unwrap();
	engine.submit(Side::Buy, "MSFT", 2, price(100)).unwrap();

	// 10 × 50 + 2 × 100
	assert_eq!(engine.portfolio().total_value, price(700));
}

#[test]
fn test_average_cost_is_quantity_weighted() {
	let mut engine = Engine::new();

	engine.submit(Side::Buy, "AMZN", 10, price(50)).unwrap();
	engine.submit(Side::Buy, "AMZN", 30, price(70)).unwrap();

	let portfolio = engine.portfolio();
	let position = &portfolio.positions["AMZN"];
	assert_eq!(position.shares, 40);
	// (10×50 + 30×70) / 40 = 65
	assert_eq!(position.average_cost, price(65));
}

#[test]
fn test_recent_transactions_bounded_and_newest_first() {
	let mut engine = Engine::new();

	for quantity in 1..=5 {
		engine.submit(Side::Buy, "AAPL", quantity, price(50)).unwrap();
	}

	let recent = engine.recent_transactions(3);
	assert_eq!(recent.len(), 3);
	// Newest first: sequence numbers strictly descending even when
	// wall-clock timestamps collide
	assert!(recent.windows(2).all(|w| w[0].seq > w[1].seq));

	assert_eq!(engine.recent_transactions(100).len(), 5);
	assert!(engine.recent_transactions(0).is_empty());
}

#[test]
fn test_symbols_in_first_seen_order() {
	let mut engine = Engine::new();

	for symbol in ["TSLA", "AAPL", "MSFT", "AAPL", "TSLA"] {
		engine.submit(Side::Buy, symbol, 1, price(10)).unwrap();
	}

	assert_eq!(engine.symbols(), vec!["TSLA", "AAPL", "MSFT"]);
}

#[test]
fn test_find_order_reflects_final_state() {
	let mut engine = Engine::new();

	let order = engine.submit(Side::Buy, "AAPL", 10, price(50)).unwrap();

	let found = engine.find_order(&order.order_id).unwrap();
	assert_eq!(found.status, OrderStatus::Filled);
	assert_eq!(found.quantity, 10);
	assert_eq!(found.remaining_quantity, 0);

	assert!(engine.find_order("ord_unknown").is_none());
}

#[test]
fn test_book_for_unknown_symbol_is_empty() {
	let engine = Engine::new();

	let book = engine.book("NOPE");
	assert!(book.bids.is_empty());
	assert!(book.asks.is_empty());
}

#[test]
fn test_fill_arithmetic_matches_tape() {
	let mut engine = Engine::new();

	let order = engine.submit(Side::Buy, "AAPL", 25, price(42)).unwrap();

	let matched: u64 = engine
		.transactions()
		.iter()
		.filter(|t| {
			t.buy_ref == OrderRef::Order(order.order_id.clone())
				|| t.sell_ref == OrderRef::Order(order.order_id.clone())
		})
		.map(|t| t.quantity)
		.sum();

	assert_eq!(matched, order.quantity - order.remaining_quantity);
}

#[test]
fn test_ledger_matches_replay_of_the_tape() {
	let mut engine = Engine::new();

	engine.submit(Side::Buy, "AAPL", 10, price(50)).unwrap();
	engine.submit(Side::Buy, "MSFT", 8, price(30)).unwrap();
	engine.submit(Side::Sell, "AAPL", 4, price(55)).unwrap();
	engine.submit(Side::Buy, "AAPL", 6, price(45)).unwrap();
	engine.submit(Side::Sell, "MSFT", 8, price(35)).unwrap();

	let mut replayed = Ledger::new();
	for txn in engine.transactions() {
		replayed.apply(txn, |id| engine.find_order(id).is_some());
	}

	assert_eq!(replayed.snapshot(), engine.portfolio());
	assert_eq!(replayed.shares("AAPL"), 12);
	assert_eq!(replayed.shares("MSFT"), 0);
}

struct CountingListener {
	batches: AtomicUsize,
	transactions: AtomicUsize,
}

impl CountingListener {
	fn new() -> Arc<Self> {
		Arc::new(Self {
			batches: AtomicUsize::new(0),
			transactions: AtomicUsize::new(0),
		})
	}
}

impl TransactionListener for CountingListener {
	fn on_transactions(&self, batch: &[Transaction]) {
		self.batches.fetch_add(1, Ordering::Relaxed);
		self.transactions.fetch_add(batch.len(), Ordering::Relaxed);
	}
}

#[test]
fn test_listeners_get_one_batch_per_submission() {
	let mut engine = Engine::new();
	let listener = CountingListener::new();
	engine.subscribe(listener.clone());

	engine.submit(Side::Buy, "AAPL", 10, price(50)).unwrap();
	engine.submit(Side::Buy, "MSFT", 5, price(30)).unwrap();

	// A rejected submission produces no batch
	let _ = engine.submit(Side::Sell, "TSLA", 1, price(10));

	assert_eq!(listener.batches.load(Ordering::Relaxed), 2);
	assert_eq!(listener.transactions.load(Ordering::Relaxed), 2);

	let handle: Arc<dyn TransactionListener> = listener.clone();
	assert!(engine.unsubscribe(&handle));
	engine.submit(Side::Buy, "NVDA", 1, price(20)).unwrap();
	assert_eq!(listener.batches.load(Ordering::Relaxed), 2);
}

#[test]
fn test_symbol_capacity_bound() {
	let mut engine = Engine::with_config(EngineConfig {
		symbol_capacity: 1024,
		verbose_logging: false,
	});

	for i in 0..1024 {
		engine
			.submit(Side::Buy, &format!("SYM{i}"), 1, price(10))
			.unwrap();
	}

	let result = engine.submit(Side::Buy, "SYM1024", 1, price(10));
	assert!(matches!(
		result,
		Err(EngineError::CapacityExceeded { limit: 1024 })
	));

	let symbols = engine.symbols();
	assert_eq!(symbols.len(), 1024);
	assert_eq!(symbols[0], "SYM0");
	assert_eq!(symbols[1023], "SYM1023");
}
