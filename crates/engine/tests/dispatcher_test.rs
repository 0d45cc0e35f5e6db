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

//! Integration tests for the submit queue / dispatcher wiring
//!
//! The engine is single-owner; concurrent hosts funnel submissions through
//! the queue to one dispatcher thread. These tests verify that assembly:
//! multiple producers, a single consumer, and a clean shutdown when the
//! last sender drops.

use std::thread;

use rust_decimal::Decimal;

use paperfloor_engine::{Engine, SubmitQueue, SubmitRequest};
use paperfloor_types::Side;

#[test]
fn test_dispatcher_serializes_multiple_producers() {
	let queue = SubmitQueue::new(64);
	let (sender, receiver) = queue.split();

	let dispatcher = thread::spawn(move || {
		let mut engine = Engine::new();
		let mut processed = 0usize;
		while let Ok(request) = receiver.recv() {
			engine
				.submit(request.side, &request.symbol, request.quantity, request.price)
				.expect("demo buys always validate");
			processed += 1;
		}
		(engine, processed)
	});

	let mut producers = Vec::new();
	for p in 0..4u32 {
		let sender = sender.clone();
		producers.push(thread::spawn(move || {
			for i in 0..8u64 {
				sender
					.try_enqueue(SubmitRequest {
						side: Side::Buy,
						symbol: format!("SYM{p}"),
						quantity: i + 1,
						price: Decimal::from(50),
					})
					.unwrap();
			}
		}));
	}

	// Dropping the last sender shuts the dispatcher down
	drop(sender);
	for producer in producers {
		producer.join().unwrap();
	}
	let (engine, processed) = dispatcher.join().unwrap();

	assert_eq!(processed, 32);
	// Every demo buy hit an empty book and filled synthetically
	assert_eq!(engine.transactions().len(), 32);
	assert_eq!(engine.symbols().len(), 4);
	for symbol in engine.symbols() {
		// 1 + 2 + ... + 8 shares accumulated per symbol
		assert_eq!(engine.portfolio().positions[&symbol].shares, 36);
	}
}

#[test]
fn test_dispatcher_drains_backlog_before_shutdown() {
	let queue = SubmitQueue::new(16);
	let (sender, receiver) = queue.split();

	for i in 0..10u64 {
		sender
			.try_enqueue(SubmitRequest {
				side: Side::Buy,
				symbol: "AAPL".to_string(),
				quantity: i + 1,
				price: Decimal::from(40),
			})
			.unwrap();
	}
	drop(sender);

	let mut engine = Engine::new();
	while let Ok(request) = receiver.recv() {
		engine
			.submit(request.side, &request.symbol, request.quantity, request.price)
			.unwrap();
	}

	assert_eq!(engine.transactions().len(), 10);
	assert_eq!(engine.portfolio().positions["AAPL"].shares, 55);
}
