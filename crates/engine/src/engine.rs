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

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use paperfloor_types::{Order, OrderRef, Side, Transaction};

use crate::config::EngineConfig;
use crate::ledger::{Ledger, PortfolioSnapshot};
use crate::notify::{ListenerSet, TransactionListener};
use crate::orderbook::SymbolBook;
use crate::registry::{RegistryError, SymbolRegistry, SymbolSlot};
use crate::tape::TransactionTape;

/// Error types for order submission
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Invalid order parameters: {0}")]
	InvalidOrderParameters(String),
	#[error("Insufficient shares of {symbol}: holding {held}, requested {requested}")]
	InsufficientShares {
		symbol: String,
		held: u64,
		requested: u64,
	},
	#[error("Symbol capacity of {limit} exhausted")]
	CapacityExceeded { limit: usize },
}

impl From<RegistryError> for EngineError {
	fn from(err: RegistryError) -> Self {
		match err {
			RegistryError::CapacityExceeded { limit } => EngineError::CapacityExceeded { limit },
		}
	}
}

/// Both sides of one symbol's book, in matching priority order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
	pub bids: Vec<Order>,
	pub asks: Vec<Order>,
}

/// Check if a taker at `taker_price` crosses a resting order at
/// `maker_price`: a buy crosses at or above the ask, a sell at or below
/// the bid.
fn crosses(taker_side: Side, taker_price: Decimal, maker_price: Decimal) -> bool {
	match taker_side {
		Side::Buy => taker_price >= maker_price,
		Side::Sell => taker_price <= maker_price,
	}
}

fn now_millis() -> u64 {
	SystemTime::now()
		.duration_since(SystemTime::UNIX_EPOCH)
		.expect("system clock before Unix epoch")
		.as_millis() as u64
}

/// The matching engine
///
/// One engine value exclusively owns the symbol registry, the per-symbol
/// books, the order index, the transaction tape, the portfolio ledger and
/// the listener set. A submission runs to completion synchronously —
/// matching, ledger update, tape append and listener notification all
/// happen before `submit` returns. The engine is not internally
/// synchronized; concurrent hosts must serialize calls through a single
/// owner (see `SubmitQueue`).
pub struct Engine {
	config: EngineConfig,
	registry: SymbolRegistry,
	/// One book per registered symbol, indexed by slot
	books: Vec<SymbolBook>,
	/// Every order ever accepted, by id. This is the resolution set for
	/// ledger legs and the backing store for `find_order`.
	orders: HashMap<String, Order>,
	ledger: Ledger,
	tape: TransactionTape,
	listeners: ListenerSet,
}

impl Engine {
	/// Create an engine with default configuration
	pub fn new() -> Self {
		Self::with_config(EngineConfig::default())
	}

	/// Create an engine with explicit configuration
	pub fn with_config(config: EngineConfig) -> Self {
		let registry = SymbolRegistry::with_capacity(config.symbol_capacity);
		Self {
			config,
			registry,
			books: Vec::new(),
			orders: HashMap::new(),
			ledger: Ledger::new(),
			tape: TransactionTape::new(),
			listeners: ListenerSet::new(),
		}
	}

	/// Submit an order
	///
	/// Validates, crosses against the opposite side of the book, applies
	/// the synthetic-liquidity fallback when nothing crossed, and notifies
	/// subscribers with the batch of transactions this submission produced.
	/// Returns the submitted order in its final state.
	///
	/// A rejection is atomic: nothing — book, ledger, tape, registry — is
	/// mutated when an error is returned.
	pub fn submit(
		&mut self,
		side: Side,
		symbol: &str,
		quantity: u64,
		price: Decimal,
	) -> Result<Order, EngineError> {
		self.submit_at(side, symbol, quantity, price, now_millis())
	}

	/// Submission with an explicit timestamp (drives time-priority rules)
	fn submit_at(
		&mut self,
		side: Side,
		symbol: &str,
		quantity: u64,
		price: Decimal,
		now: u64,
	) -> Result<Order, EngineError> {
		let symbol = symbol.trim();

		// Validation comes before any mutation, registry included.
		if quantity == 0 {
			return Err(EngineError::InvalidOrderParameters(
				"quantity must be positive".to_string(),
			));
		}
		if price <= Decimal::ZERO {
			return Err(EngineError::InvalidOrderParameters(
				"price must be positive".to_string(),
			));
		}
		if symbol.is_empty() {
			return Err(EngineError::InvalidOrderParameters(
				"symbol must not be blank".to_string(),
			));
		}
		if side == Side::Sell {
			let held = self.ledger.shares(symbol);
			if held < quantity {
				return Err(EngineError::InsufficientShares {
					symbol: symbol.to_string(),
					held,
					requested: quantity,
				});
			}
		}

		let slot = self.registry.resolve(symbol)?;
		if slot == self.books.len() {
			self.books.push(SymbolBook::new(symbol.to_string()));
		}

		let mut order = Order::new(symbol, side, price, quantity, now);
		if self.config.verbose_logging {
			debug!(
				order_id = %order.order_id,
				?side,
				symbol,
				quantity,
				%price,
				"Processing order"
			);
		}

		// The order joins the resolution set up front so its own ledger
		// legs resolve while matching.
		self.orders.insert(order.order_id.clone(), order.clone());

		let batch = self.cross_order(slot, &mut order, now);

		if batch.is_empty() {
			// Synthetic-liquidity fallback: nothing crossed, so the full
			// original quantity fills at the order's own price against a
			// sentinel counterparty. The order never rests.
			let (buy_ref, sell_ref) = match side {
				Side::Buy => (OrderRef::Order(order.order_id.clone()), OrderRef::Auto),
				Side::Sell => (OrderRef::Market, OrderRef::Order(order.order_id.clone())),
			};
			order.apply_fill(order.remaining_quantity);
			let txn = self.record(symbol, buy_ref, sell_ref, quantity, price, now);
			self.orders.insert(order.order_id.clone(), order.clone());
			self.listeners.broadcast(std::slice::from_ref(&txn));
			return Ok(order);
		}

		if order.remaining_quantity > 0 {
			// Partially crossed: the remainder rests on its own side.
			self.books[slot].insert(order.clone());
		}
		self.orders.insert(order.order_id.clone(), order.clone());

		self.listeners.broadcast(&batch);
		Ok(order)
	}

	/// Cross an incoming order against the opposite side of its book
	///
	/// Walks the priority-ordered opposite side, skipping terminal or
	/// exhausted entries and entries that do not cross on price, filling
	/// against the rest until the incoming order is exhausted. Each fill
	/// executes at the older order's price, ties going to the incoming
	/// side.
	fn cross_order(&mut self, slot: SymbolSlot, order: &mut Order, now: u64) -> Vec<Transaction> {
		let mut batch = Vec::new();
		let candidates = self.books[slot].snapshot(order.side.opposite());

		for mut maker in candidates {
			if order.remaining_quantity == 0 {
				break;
			}
			if maker.status.is_terminal() || maker.remaining_quantity == 0 {
				continue;
			}
			if !crosses(order.side, order.price, maker.price) {
				continue;
			}

			let fill = order.remaining_quantity.min(maker.remaining_quantity);
			let exec_price = if maker.created_at < order.created_at {
				maker.price
			} else {
				order.price
			};

			order.apply_fill(fill);
			maker.apply_fill(fill);
			self.books[slot].update(&maker);
			self.orders.insert(maker.order_id.clone(), maker.clone());

			let (buy_ref, sell_ref) = match order.side {
				Side::Buy => (
					OrderRef::Order(order.order_id.clone()),
					OrderRef::Order(maker.order_id.clone()),
				),
				Side::Sell => (
					OrderRef::Order(maker.order_id.clone()),
					OrderRef::Order(order.order_id.clone()),
				),
			};
			let txn = self.record(&order.symbol, buy_ref, sell_ref, fill, exec_price, now);
			batch.push(txn);
		}

		batch
	}

	/// Append a transaction to the tape and apply it to the ledger
	fn record(
		&mut self,
		symbol: &str,
		buy_ref: OrderRef,
		sell_ref: OrderRef,
		quantity: u64,
		price: Decimal,
		occurred_at: u64,
	) -> Transaction {
		let seq = self.tape.next_sequence();
		let txn = Transaction::new(seq, symbol, buy_ref, sell_ref, quantity, price, occurred_at);
		self.tape.append(txn.clone());

		let orders = &self.orders;
		self.ledger.apply(&txn, |id| orders.contains_key(id));

		debug!(
			txn_id = %txn.txn_id,
			seq,
			symbol,
			quantity,
			%price,
			"Transaction recorded"
		);
		txn
	}

	/// Current book for a symbol; empty sides when the symbol is unknown
	pub fn book(&self, symbol: &str) -> BookSnapshot {
		match self.registry.slot_of(symbol.trim()) {
			Some(slot) => BookSnapshot {
				bids: self.books[slot].snapshot(Side::Buy),
				asks: self.books[slot].snapshot(Side::Sell),
			},
			None => BookSnapshot {
				bids: Vec::new(),
				asks: Vec::new(),
			},
		}
	}

	/// Current portfolio positions and total value
	pub fn portfolio(&self) -> PortfolioSnapshot {
		self.ledger.snapshot()
	}

	/// The `n` most recent transactions, most recent first
	pub fn recent_transactions(&self, n: usize) -> Vec<Transaction> {
		self.tape.recent(n)
	}

	/// All transactions in creation order
	pub fn transactions(&self) -> &[Transaction] {
		self.tape.all()
	}

	/// All registered symbols in first-seen order
	pub fn symbols(&self) -> Vec<String> {
		self.registry.symbols()
	}

	/// Subscribe a listener to per-submission transaction batches
	pub fn subscribe(&mut self, listener: Arc<dyn TransactionListener>) {
		self.listeners.subscribe(listener);
	}

	/// Remove a previously subscribed listener
	pub fn unsubscribe(&mut self, listener: &Arc<dyn TransactionListener>) -> bool {
		self.listeners.unsubscribe(listener)
	}

	/// Look up any order ever accepted, by id
	pub fn find_order(&self, order_id: &str) -> Option<Order> {
		self.orders.get(order_id).cloned()
	}
}

impl Default for Engine {
	fn default() -> Self {
		Self::new()
	}
}
