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

use thiserror::Error;

/// Slot index assigned to a ticker symbol
pub type SymbolSlot = usize;

/// Default number of distinct symbols an engine can track
pub const DEFAULT_SYMBOL_CAPACITY: usize = 1024;

/// Error types for symbol registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
	#[error("Symbol capacity of {limit} exhausted")]
	CapacityExceeded { limit: usize },
}

/// Bounded symbol registry assigning stable slots in first-seen order
///
/// The first occurrence of a symbol takes the next free slot; every later
/// resolution returns the same slot. Slots are never reclaimed and the
/// capacity never shrinks, so a slot stays valid as a direct index for the
/// engine's lifetime.
///
/// Lookup is a linear scan over the registration vector. The capacity bound
/// keeps that cheap, and the scan preserves the two contracts a faster map
/// would have to re-prove: failure at the capacity bound and first-seen
/// registration order.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
	symbols: Vec<String>,
	capacity: usize,
}

impl SymbolRegistry {
	/// Create a registry with the default capacity
	pub fn new() -> Self {
		Self::with_capacity(DEFAULT_SYMBOL_CAPACITY)
	}

	/// Create a registry bounded to `capacity` distinct symbols
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			symbols: Vec::new(),
			capacity,
		}
	}

	/// Resolve a symbol to its slot, registering it on first use
	///
	/// Fails with `CapacityExceeded` when a new symbol is requested and the
	/// registry is full; the registry is left unchanged in that case.
	pub fn resolve(&mut self, symbol: &str) -> Result<SymbolSlot, RegistryError> {
		if let Some(slot) = self.symbols.iter().position(|s| s == symbol) {
			return Ok(slot);
		}

		if self.symbols.len() >= self.capacity {
			return Err(RegistryError::CapacityExceeded {
				limit: self.capacity,
			});
		}

		self.symbols.push(symbol.to_string());
		Ok(self.symbols.len() - 1)
	}

	/// Look up a slot without registering
	pub fn slot_of(&self, symbol: &str) -> Option<SymbolSlot> {
		self.symbols.iter().position(|s| s == symbol)
	}

	/// The symbol registered at a slot
	pub fn lookup(&self, slot: SymbolSlot) -> Option<&str> {
		self.symbols.get(slot).map(|s| s.as_str())
	}

	/// All registered symbols in first-seen order
	pub fn symbols(&self) -> Vec<String> {
		self.symbols.clone()
	}

	/// Number of registered symbols
	pub fn len(&self) -> usize {
		self.symbols.len()
	}

	/// Check if no symbols are registered yet
	pub fn is_empty(&self) -> bool {
		self.symbols.is_empty()
	}
}

impl Default for SymbolRegistry {
	fn default() -> Self {
		Self::new()
	}
}
