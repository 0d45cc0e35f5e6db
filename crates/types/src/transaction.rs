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

/// Reference to one side of a transaction
///
/// Either a real order id, or a sentinel counterparty:
/// - `Market`: external, unmodeled counterparty
/// - `Auto`: synthetic liquidity fill manufactured by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderRef {
	Order(String),
	Market,
	Auto,
}

impl OrderRef {
	/// The referenced order id, if this is not a sentinel
	pub fn order_id(&self) -> Option<&str> {
		match self {
			OrderRef::Order(id) => Some(id),
			OrderRef::Market | OrderRef::Auto => None,
		}
	}

	/// Check if this reference is a sentinel counterparty
	pub fn is_sentinel(&self) -> bool {
		!matches!(self, OrderRef::Order(_))
	}
}

/// An executed trade between a buy side and a sell side
///
/// Transactions are immutable once created and live on an append-only tape.
/// `seq` is the tape's insertion sequence; it is the authoritative order of
/// creation even when `occurred_at` collides at clock resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
	/// Unique transaction ID (`txn_<uuid>`)
	pub txn_id: String,
	/// Insertion sequence on the tape, monotonically increasing
	pub seq: u64,
	/// Ticker symbol
	pub symbol: String,
	/// Buy side of the trade
	pub buy_ref: OrderRef,
	/// Sell side of the trade
	pub sell_ref: OrderRef,
	/// Quantity executed, in shares
	pub quantity: u64,
	/// Execution price
	pub price: Decimal,
	/// Timestamp when the trade occurred (Unix millis)
	pub occurred_at: u64,
}

impl Transaction {
	/// Create a new transaction with a fresh id
	pub fn new(
		seq: u64,
		symbol: &str,
		buy_ref: OrderRef,
		sell_ref: OrderRef,
		quantity: u64,
		price: Decimal,
		occurred_at: u64,
	) -> Self {
		Self {
			txn_id: format!("txn_{}", uuid::Uuid::new_v4()),
			seq,
			symbol: symbol.to_string(),
			buy_ref,
			sell_ref,
			quantity,
			price,
			occurred_at,
		}
	}

	/// Check if either side is a synthetic/sentinel counterparty
	pub fn is_synthetic(&self) -> bool {
		self.buy_ref.is_sentinel() || self.sell_ref.is_sentinel()
	}
}
