// Copyright 2025 chenjjiaa
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

use serde::{Deserialize, Serialize};

use crate::registry::DEFAULT_SYMBOL_CAPACITY;

/// Component name used for log files
pub const LOG_COMPONENT_NAME: &str = "paperfloor";

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default for console log output
pub const DEFAULT_LOG_TO_CONSOLE: bool = true;

/// Matching engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
	/// Maximum number of distinct symbols the registry will accept
	pub symbol_capacity: usize,
	/// Emit per-submission debug logs
	pub verbose_logging: bool,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			symbol_capacity: DEFAULT_SYMBOL_CAPACITY,
			verbose_logging: false,
		}
	}
}

impl EngineConfig {
	/// Load configuration from environment variables
	pub fn from_env() -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(
				config::Environment::with_prefix("PAPERFLOOR").try_parsing(true),
			)
			.build()?;

		cfg.try_deserialize()
	}
}

/// Demo traffic host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
	/// Number of random orders to generate before shutting down
	pub orders: usize,
	/// Symbol universe the generator draws from
	pub symbols: Vec<String>,
	/// Submit queue capacity between generator and dispatcher
	pub queue_capacity: usize,
	/// Log a portfolio report every N processed orders
	pub report_every: usize,
	/// Lowest randomized limit price, in whole currency units
	pub min_price: u64,
	/// Highest randomized limit price, in whole currency units
	pub max_price: u64,
	/// Largest randomized order quantity, in shares
	pub max_quantity: u64,
}

impl Default for SimConfig {
	fn default() -> Self {
		Self {
			orders: 256,
			symbols: ["AAPL", "MSFT", "NVDA", "AMZN", "TSLA", "GOOG"]
				.into_iter()
				.map(String::from)
				.collect(),
			queue_capacity: 128,
			report_every: 32,
			min_price: 10,
			max_price: 90,
			max_quantity: 50,
		}
	}
}

impl SimConfig {
	/// Load configuration from environment variables
	pub fn from_env() -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(
				config::Environment::with_prefix("PAPERFLOOR")
					.try_parsing(true)
					.list_separator(",")
					.with_list_parse_key("symbols"),
			)
			.build()?;

		cfg.try_deserialize()
	}

	/// Load configuration from file
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(
				config::Environment::with_prefix("PAPERFLOOR")
					.try_parsing(true)
					.list_separator(",")
					.with_list_parse_key("symbols"),
			)
			.build()?;

		cfg.try_deserialize()
	}
}
