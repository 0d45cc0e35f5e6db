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

//! Paperfloor shared types
//!
//! This crate holds the domain types shared between the matching engine and
//! any embedding host: orders, transactions and portfolio positions.
//!
//! The crate is designed to be lightweight and embeddable:
//! - No background threads
//! - No runtime initialization
//! - No environment or configuration loading

pub mod order;
pub mod position;
pub mod transaction;

pub use order::{Order, OrderStatus, Side};
pub use position::PortfolioPosition;
pub use transaction::{OrderRef, Transaction};
