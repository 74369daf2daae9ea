// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Enable/disable switch for activity logging.

use parking_lot::Mutex;
use tracing::trace;

#[derive(Debug, Clone, Copy)]
struct GateState {
	enabled: bool,
	/// Number of live suppression guards.
	depth: usize,
	/// Flag to restore when the last guard is released.
	saved: bool,
}

/// Whether activities are recorded in the current unit of work.
#[derive(Debug)]
pub struct LoggingGate {
	state: Mutex<GateState>,
}

impl LoggingGate {
	pub fn new(enabled: bool) -> Self {
		Self {
			state: Mutex::new(GateState {
				enabled,
				depth: 0,
				saved: enabled,
			}),
		}
	}

	pub fn enable(&self) {
		self.state.lock().enabled = true;
	}

	pub fn disable(&self) {
		self.state.lock().enabled = false;
	}

	pub fn is_enabled(&self) -> bool {
		self.state.lock().enabled
	}

	/// Disables logging until every outstanding guard is dropped, then restores
	/// the state that was in effect before the first of them was taken.
	///
	/// Guards may be dropped in any order. Dropping a guard while others are
	/// still alive leaves logging disabled.
	pub fn suppress(&self) -> SuppressionGuard<'_> {
		let mut state = self.state.lock();
		if state.depth == 0 {
			state.saved = state.enabled;
		}
		state.depth += 1;
		state.enabled = false;
		trace!(saved = state.saved, depth = state.depth, "activity logging suppressed");
		SuppressionGuard { gate: self }
	}

	/// Runs `f` with logging disabled and returns its result unchanged.
	///
	/// The previous state is restored on every exit path, including unwinding
	/// and `f` toggling the gate itself.
	pub fn without_logs<R>(&self, f: impl FnOnce() -> R) -> R {
		let _guard = self.suppress();
		f()
	}

	fn release(&self) {
		let mut state = self.state.lock();
		state.depth = state.depth.saturating_sub(1);
		if state.depth == 0 {
			state.enabled = state.saved;
			trace!(restored = state.saved, "activity logging suppression ended");
		} else {
			state.enabled = false;
		}
	}
}

impl Default for LoggingGate {
	fn default() -> Self {
		Self::new(true)
	}
}

/// Keeps logging suppressed while alive.
#[must_use = "logging is re-enabled as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SuppressionGuard<'a> {
	gate: &'a LoggingGate,
}

impl Drop for SuppressionGuard<'_> {
	fn drop(&mut self) {
		self.gate.release();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::panic::{catch_unwind, AssertUnwindSafe};

	#[test]
	fn enabled_by_default() {
		assert!(LoggingGate::default().is_enabled());
	}

	#[test]
	fn enable_and_disable() {
		let gate = LoggingGate::new(false);
		assert!(!gate.is_enabled());
		gate.enable();
		assert!(gate.is_enabled());
		gate.disable();
		assert!(!gate.is_enabled());
	}

	#[test]
	fn without_logs_disables_inside_and_returns_result() {
		let gate = LoggingGate::new(true);
		let result = gate.without_logs(|| {
			assert!(!gate.is_enabled());
			"hello"
		});
		assert_eq!(result, "hello");
		assert!(gate.is_enabled());
	}

	#[test]
	fn without_logs_keeps_disabled_gate_disabled() {
		let gate = LoggingGate::new(false);
		gate.without_logs(|| ());
		assert!(!gate.is_enabled());
	}

	#[test]
	fn without_logs_propagates_errors_and_restores() {
		let gate = LoggingGate::new(true);
		let result: Result<(), &str> = gate.without_logs(|| Err("OH NO"));
		assert_eq!(result, Err("OH NO"));
		assert!(gate.is_enabled());
	}

	#[test]
	fn without_logs_restores_after_panic() {
		let gate = LoggingGate::new(true);
		let outcome = catch_unwind(AssertUnwindSafe(|| {
			let _: () = gate.without_logs(|| panic!("OH NO"));
		}));
		assert!(outcome.is_err());
		assert!(gate.is_enabled());
	}

	#[test]
	fn without_logs_ignores_toggles_inside_block() {
		let gate = LoggingGate::new(false);
		gate.without_logs(|| gate.enable());
		assert!(!gate.is_enabled());
	}

	#[test]
	fn nested_suppression_unwinds_in_order() {
		let gate = LoggingGate::new(true);
		{
			let _outer = gate.suppress();
			{
				let _inner = gate.suppress();
				assert!(!gate.is_enabled());
			}
			assert!(!gate.is_enabled());
		}
		assert!(gate.is_enabled());
	}

	#[test]
	fn guards_dropped_in_creation_order_restore() {
		let gate = LoggingGate::new(true);
		let first = gate.suppress();
		let second = gate.suppress();

		drop(first);
		assert!(!gate.is_enabled());
		drop(second);
		assert!(gate.is_enabled());
	}

	#[test]
	fn guards_held_as_struct_fields_restore() {
		struct Scope<'a> {
			_request: SuppressionGuard<'a>,
			_job: SuppressionGuard<'a>,
		}

		let gate = LoggingGate::new(true);
		let scope = Scope {
			_request: gate.suppress(),
			_job: gate.suppress(),
		};
		drop(scope);
		assert!(gate.is_enabled());
	}

	#[test]
	fn dropping_inner_guard_keeps_outer_suppression() {
		let gate = LoggingGate::new(true);
		let _outer = gate.suppress();
		{
			let _inner = gate.suppress();
			gate.enable();
		}
		assert!(!gate.is_enabled());
	}

	proptest! {
		#[test]
		fn guards_restore_in_any_drop_order(
			initial in any::<bool>(),
			order in Just((0..6usize).collect::<Vec<_>>()).prop_shuffle(),
		) {
			let gate = LoggingGate::new(initial);
			let mut guards: Vec<Option<SuppressionGuard<'_>>> =
				order.iter().map(|_| Some(gate.suppress())).collect();
			for index in order {
				prop_assert!(!gate.is_enabled());
				drop(guards[index].take());
			}
			prop_assert_eq!(gate.is_enabled(), initial);
		}

		#[test]
		fn without_logs_restores_any_state(initial in any::<bool>(), toggles in proptest::collection::vec(any::<bool>(), 0..8)) {
			let gate = LoggingGate::new(initial);
			gate.without_logs(|| {
				for enable in toggles {
					if enable { gate.enable() } else { gate.disable() }
				}
			});
			prop_assert_eq!(gate.is_enabled(), initial);
		}
	}
}
