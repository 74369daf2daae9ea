// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-unit-of-work activity logging context.

use std::fmt;
use std::sync::Arc;

use loom_activity_config::ActivityLogConfig;
use loom_activity_core::EntityLookup;

use crate::batch::LogBatch;
use crate::causer::{CauserResolver, IdentityProvider};
use crate::gate::{LoggingGate, SuppressionGuard};
use crate::model::{ActivityModel, ActivityModels};
use crate::pending::PendingActivity;
use crate::store::RecordStore;

/// Entry point for recording activities.
///
/// Holds the logging gate and batch state for one request or job. Create one
/// per unit of work and share only the record store between them.
pub struct ActivityLogger {
	config: ActivityLogConfig,
	gate: LoggingGate,
	batch: LogBatch,
	causers: CauserResolver,
	models: ActivityModels,
	store: Arc<dyn RecordStore>,
}

impl ActivityLogger {
	/// Creates a logger whose causer resolution follows `config`: ambient
	/// causers come from `identity` on the configured guard and scalar causer
	/// ids are looked up in `lookup` as the configured causer type.
	pub fn new(
		config: ActivityLogConfig,
		store: Arc<dyn RecordStore>,
		identity: Arc<dyn IdentityProvider>,
		lookup: Arc<dyn EntityLookup>,
	) -> Self {
		Self {
			gate: LoggingGate::new(config.enabled),
			batch: LogBatch::new(),
			causers: CauserResolver::from_config(&config, identity, lookup),
			models: ActivityModels::new(),
			config,
			store,
		}
	}

	/// Start an activity on the configured default log.
	pub fn activity(&self) -> PendingActivity<'_> {
		PendingActivity::new(self, self.config.default_log_name.clone())
	}

	/// Start an activity on a named log.
	pub fn activity_in(&self, log_name: impl Into<String>) -> PendingActivity<'_> {
		PendingActivity::new(self, Some(log_name.into()))
	}

	pub fn enable_logging(&self) {
		self.gate.enable();
	}

	pub fn disable_logging(&self) {
		self.gate.disable();
	}

	pub fn is_enabled(&self) -> bool {
		self.gate.is_enabled()
	}

	/// Runs `f` without recording any activity; see [`LoggingGate::without_logs`].
	pub fn without_logs<R>(&self, f: impl FnOnce() -> R) -> R {
		self.gate.without_logs(f)
	}

	pub fn suppress(&self) -> SuppressionGuard<'_> {
		self.gate.suppress()
	}

	pub fn register_model(&mut self, model: Arc<dyn ActivityModel>) {
		self.models.register(model);
	}

	pub fn config(&self) -> &ActivityLogConfig {
		&self.config
	}

	pub fn gate(&self) -> &LoggingGate {
		&self.gate
	}

	pub fn batch(&self) -> &LogBatch {
		&self.batch
	}

	pub fn causers(&self) -> &CauserResolver {
		&self.causers
	}

	pub fn causers_mut(&mut self) -> &mut CauserResolver {
		&mut self.causers
	}

	pub fn models(&self) -> &ActivityModels {
		&self.models
	}

	pub fn store(&self) -> &Arc<dyn RecordStore> {
		&self.store
	}
}

impl fmt::Debug for ActivityLogger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActivityLogger")
			.field("config", &self.config)
			.field("gate", &self.gate)
			.field("batch", &self.batch)
			.field("causers", &self.causers)
			.field("models", &self.models)
			.finish_non_exhaustive()
	}
}
