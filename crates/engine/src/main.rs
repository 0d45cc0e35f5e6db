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

//! Demo traffic host for the paperfloor engine
//!
//! This binary wires up the pieces a concurrent embedder needs:
//! - Submit Queue (MPSC from producer threads to the dispatcher)
//! - Dispatcher thread (single owner of the engine, serializes all calls)
//! - Traffic generator thread (randomized demo orders)
//! - Tape listener logging every executed transaction
//!
//! The generator retries a Sell rejected for insufficient shares as a Buy,
//! so the portfolio keeps accumulating inventory to trade against.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use paperfloor_engine::{
	Engine, EngineConfig, EngineError, QueueError, SimConfig, SubmitQueue, SubmitReceiver,
	SubmitRequest, SubmitSender, TransactionListener, logging,
};
use paperfloor_types::{Side, Transaction};

/// Listener that logs every transaction batch to the tape target
struct TapeLogger;

impl TransactionListener for TapeLogger {
	fn on_transactions(&self, batch: &[Transaction]) {
		for txn in batch {
			info!(
				target: "tape",
				txn_id = %txn.txn_id,
				seq = txn.seq,
				symbol = %txn.symbol,
				quantity = txn.quantity,
				price = %txn.price,
				synthetic = txn.is_synthetic(),
				"Trade executed"
			);
		}
	}
}

fn main() -> Result<()> {
	// Initialize logging first
	logging::init_logging()?;

	// Load configuration
	let config = SimConfig::from_env().unwrap_or_else(|_| {
		info!(target: "sim", "Using default configuration");
		SimConfig::default()
	});
	let engine_config = EngineConfig::from_env().unwrap_or_default();

	info!(target: "sim", "Starting Paperfloor demo host");
	info!(target: "sim", "Symbols: {}", config.symbols.join(", "));
	info!(target: "sim", "Orders to generate: {}", config.orders);
	info!(target: "sim", "Submit queue size: {}", config.queue_capacity);

	// Phase 1: Engine with a tape listener
	let mut engine = Engine::with_config(engine_config);
	engine.subscribe(Arc::new(TapeLogger));

	// Phase 2: Submit Queue (MPSC)
	let queue = SubmitQueue::new(config.queue_capacity);
	let (sender, receiver) = queue.split();

	// Phase 3: Traffic generator thread
	let generator_config = config.clone();
	let generator = thread::Builder::new()
		.name("traffic-gen".to_string())
		.spawn(move || run_generator(generator_config, sender))
		.context("Failed to spawn traffic generator thread")?;

	// Phase 4: Dispatcher thread — the single owner of the engine
	let report_every = config.report_every;
	let dispatcher = thread::Builder::new()
		.name("dispatcher".to_string())
		.spawn(move || run_dispatcher(engine, receiver, report_every))
		.context("Failed to spawn dispatcher thread")?;

	if generator.join().is_err() {
		warn!(target: "sim", "Traffic generator thread panicked");
	}
	if dispatcher.join().is_err() {
		warn!(target: "sim", "Dispatcher thread panicked");
	}

	info!(target: "sim", "Shutdown complete");
	Ok(())
}

/// Generate randomized demo orders until the configured count is reached
///
/// Dropping the sender on return is the dispatcher's shutdown signal.
fn run_generator(config: SimConfig, sender: SubmitSender) {
	let mut rng = rand::thread_rng();

	for _ in 0..config.orders {
		let symbol = config.symbols[rng.gen_range(0..config.symbols.len())].clone();
		let side = if rng.gen_bool(0.5) {
			Side::Buy
		} else {
			Side::Sell
		};
		let request = SubmitRequest {
			side,
			symbol,
			quantity: rng.gen_range(1..=config.max_quantity),
			price: Decimal::from(rng.gen_range(config.min_price..=config.max_price)),
		};

		// Back off briefly when the dispatcher is behind
		loop {
			match sender.try_enqueue(request.clone()) {
				Ok(()) => break,
				Err(QueueError::Full) => thread::sleep(Duration::from_micros(50)),
				Err(_) => {
					warn!(target: "sim", "Submit queue disconnected, generator stopping");
					return;
				}
			}
		}
	}

	info!(target: "sim", "Traffic generator finished");
}

/// Drain the submit queue into the engine until every sender is gone
fn run_dispatcher(mut engine: Engine, receiver: SubmitReceiver, report_every: usize) {
	let mut processed = 0usize;
	let mut fallback_buys = 0usize;
	let mut rejected = 0usize;

	while let Ok(request) = receiver.recv() {
		match engine.submit(request.side, &request.symbol, request.quantity, request.price) {
			Ok(order) => {
				debug!(
					target: "sim",
					order_id = %order.order_id,
					status = ?order.status,
					"Order processed"
				);
			}
			Err(EngineError::InsufficientShares { held, .. }) => {
				// Demo traffic falls back to the buy side instead of
				// dropping the tick
				fallback_buys += 1;
				debug!(
					target: "sim",
					symbol = %request.symbol,
					held,
					requested = request.quantity,
					"Sell rejected, falling back to Buy"
				);
				if let Err(e) =
					engine.submit(Side::Buy, &request.symbol, request.quantity, request.price)
				{
					rejected += 1;
					warn!(target: "sim", error = %e, "Fallback buy rejected");
				}
			}
			Err(e) => {
				rejected += 1;
				warn!(target: "sim", error = %e, "Order rejected");
			}
		}

		processed += 1;
		if report_every > 0 && processed % report_every == 0 {
			report(&engine);
		}
	}

	report(&engine);
	info!(
		target: "sim",
		processed,
		fallback_buys,
		rejected,
		transactions = engine.transactions().len(),
		symbols = engine.symbols().len(),
		"Dispatcher finished"
	);
}

/// Log a portfolio report, one line per open position
fn report(engine: &Engine) {
	let portfolio = engine.portfolio();
	info!(
		target: "sim",
		positions = portfolio.positions.len(),
		total_value = %portfolio.total_value,
		"Portfolio report"
	);
	for (symbol, position) in &portfolio.positions {
		info!(
			target: "sim",
			symbol = %symbol,
			shares = position.shares,
			average_cost = %position.average_cost,
			mark_price = %position.mark_price,
			"Position"
		);
	}
	match serde_json::to_string(&portfolio) {
		Ok(json) => debug!(target: "sim", %json, "Portfolio snapshot"),
		Err(e) => warn!(target: "sim", error = %e, "Failed to serialize portfolio"),
	}
}
