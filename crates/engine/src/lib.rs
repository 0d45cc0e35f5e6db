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

//! Paperfloor Matching Engine
//!
//! This crate provides a deterministic, in-process matching engine for a
//! bounded universe of ticker symbols. It maintains per-symbol limit order
//! books, applies price-time priority, feeds a portfolio ledger from the
//! transaction stream, and fans each submission's transactions out to
//! subscribed listeners.
//!
//! Architecture:
//! - Single-threaded matching core for deterministic behavior
//! - Bounded symbol registry assigning stable book slots
//! - Append-only transaction tape as the audit log
//! - Synchronous observer fan-out, one batch per submission
//! - MPSC submit queue for multi-threaded hosts (one dispatcher owns the
//!   engine)

pub mod config;
pub mod engine;
pub mod ledger;
pub mod logging;
pub mod notify;
pub mod orderbook;
pub mod queue;
pub mod registry;
pub mod tape;

pub use config::{EngineConfig, SimConfig};
pub use engine::{BookSnapshot, Engine, EngineError};
pub use ledger::{Ledger, PortfolioSnapshot};
pub use notify::{ListenerSet, TransactionListener};
pub use orderbook::SymbolBook;
pub use queue::{QueueError, SubmitQueue, SubmitReceiver, SubmitRequest, SubmitSender};
pub use registry::{DEFAULT_SYMBOL_CAPACITY, RegistryError, SymbolRegistry};
pub use tape::TransactionTape;
