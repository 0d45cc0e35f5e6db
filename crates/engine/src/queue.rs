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

use crossbeam::channel::{Receiver, Sender, TryRecvError, TrySendError, bounded};
use rust_decimal::Decimal;

use paperfloor_types::Side;

/// A submission on its way to the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
	pub side: Side,
	pub symbol: String,
	pub quantity: u64,
	pub price: Decimal,
}

/// Submit Queue for serializing calls into a single engine owner
///
/// The engine itself is not internally synchronized: a submission must run
/// to completion before the next one starts. Concurrent hosts therefore
/// funnel every request through this queue to one dispatcher thread that
/// owns the engine.
///
/// Properties:
/// - Multiple Producers (any host thread)
/// - Single Consumer (the dispatcher that owns the engine)
/// - Bounded capacity for backpressure
/// - Explicit failure semantics when full
pub struct SubmitQueue {
	sender: Sender<SubmitRequest>,
	receiver: Receiver<SubmitRequest>,
}

impl SubmitQueue {
	/// Create a new submit queue with the specified capacity
	pub fn new(capacity: usize) -> Self {
		let (sender, receiver) = bounded(capacity);
		Self { sender, receiver }
	}

	/// Split the queue into sender and receiver ends
	///
	/// The sender can be cloned across producer threads. The receiver must
	/// remain unique to the dispatcher.
	pub fn split(self) -> (SubmitSender, SubmitReceiver) {
		(
			SubmitSender {
				sender: self.sender,
			},
			SubmitReceiver {
				receiver: self.receiver,
			},
		)
	}
}

/// Sender end of the submit queue (producer threads)
#[derive(Clone)]
pub struct SubmitSender {
	sender: Sender<SubmitRequest>,
}

impl SubmitSender {
	/// Try to enqueue a request (non-blocking)
	///
	/// Returns an error when the queue is full, signalling that the
	/// dispatcher is falling behind.
	pub fn try_enqueue(&self, request: SubmitRequest) -> Result<(), QueueError> {
		self.sender.try_send(request).map_err(|e| match e {
			TrySendError::Full(_) => QueueError::Full,
			TrySendError::Disconnected(_) => QueueError::Disconnected,
		})
	}

	/// Check if the queue is full
	pub fn is_full(&self) -> bool {
		self.sender.is_full()
	}
}

/// Receiver end of the submit queue (dispatcher thread)
pub struct SubmitReceiver {
	receiver: Receiver<SubmitRequest>,
}

impl SubmitReceiver {
	/// Receive the next request (blocking)
	///
	/// Errors once every sender has been dropped, which is the dispatcher's
	/// shutdown signal.
	pub fn recv(&self) -> Result<SubmitRequest, QueueError> {
		self.receiver.recv().map_err(|_| QueueError::Disconnected)
	}

	/// Try to receive a request (non-blocking)
	pub fn try_recv(&self) -> Result<SubmitRequest, QueueError> {
		self.receiver.try_recv().map_err(|e| match e {
			TryRecvError::Empty => QueueError::Empty,
			TryRecvError::Disconnected => QueueError::Disconnected,
		})
	}
}

/// Errors that can occur when interacting with the submit queue
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
	#[error("Queue is full")]
	Full,
	#[error("Queue is empty")]
	Empty,
	#[error("Queue disconnected")]
	Disconnected,
}
