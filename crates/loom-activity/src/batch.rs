// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Batch correlation for activities.
//!
//! A batch groups every activity logged between the outermost
//! [`LogBatch::start_batch`] and its matching [`LogBatch::end_batch`] under one
//! UUID. Nested start/end pairs only adjust a depth counter so that a service
//! call inside a job that is already batched does not split the batch.

use parking_lot::Mutex;
use tracing::trace;
use uuid::Uuid;

/// Snapshot of the batch state. `uuid` is set exactly when `depth > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchState {
	pub uuid: Option<Uuid>,
	pub depth: usize,
}

#[derive(Debug, Default)]
pub struct LogBatch {
	state: Mutex<BatchState>,
}

impl LogBatch {
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a batch, or joins the one already open. Returns the batch uuid.
	pub fn start_batch(&self) -> Uuid {
		let mut state = self.state.lock();
		let uuid = match state.uuid {
			Some(uuid) if state.depth > 0 => uuid,
			_ => Uuid::new_v4(),
		};
		state.uuid = Some(uuid);
		state.depth += 1;
		trace!(batch_uuid = %uuid, depth = state.depth, "batch started");
		uuid
	}

	/// Leaves the current batch level; the uuid is released when the outermost
	/// level ends. Does nothing when no batch is open.
	pub fn end_batch(&self) {
		let mut state = self.state.lock();
		if state.depth == 0 {
			return;
		}
		state.depth -= 1;
		if state.depth == 0 {
			trace!(batch_uuid = ?state.uuid, "batch closed");
			state.uuid = None;
		}
	}

	/// Forces the batch uuid, opening a batch if none is open. Nesting depth is
	/// otherwise left alone.
	pub fn set_batch(&self, uuid: Uuid) {
		let mut state = self.state.lock();
		state.uuid = Some(uuid);
		state.depth = state.depth.max(1);
		trace!(batch_uuid = %uuid, depth = state.depth, "batch uuid set");
	}

	pub fn current_uuid(&self) -> Option<Uuid> {
		let state = self.state.lock();
		state.uuid.filter(|_| state.depth > 0)
	}

	pub fn is_open(&self) -> bool {
		self.state.lock().depth > 0
	}

	pub fn state(&self) -> BatchState {
		*self.state.lock()
	}

	/// Closes any open batch regardless of depth.
	pub fn reset(&self) {
		*self.state.lock() = BatchState::default();
	}

	/// Runs `f` inside a batch. The batch level is ended on every exit path.
	pub fn within_batch<R>(&self, f: impl FnOnce(Uuid) -> R) -> R {
		let uuid = self.start_batch();
		let _scope = BatchScope { batch: self };
		f(uuid)
	}
}

struct BatchScope<'a> {
	batch: &'a LogBatch,
}

impl Drop for BatchScope<'_> {
	fn drop(&mut self) {
		self.batch.end_batch();
	}
}
