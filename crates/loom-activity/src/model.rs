// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Activity models: the record types activities can be persisted as.
//!
//! The model is picked by name from configuration and validated the first time
//! an activity is logged, not when configuration is loaded.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use loom_activity_core::{Activity, ActivityError, EntityRef, NewActivity, Result};
use serde_json::Value;
use uuid::Uuid;

pub const DEFAULT_ACTIVITY_MODEL: &str = "activity";

/// A record type activities are persisted as.
///
/// A usable model builds its records from the assembled activity, keeps every
/// field of it, and exposes the subject and causer references of its records.
/// The defaults do all three.
pub trait ActivityModel: fmt::Debug + Send + Sync {
	fn name(&self) -> &str;

	/// Builds the record written for `activity` under the store-assigned `id`.
	///
	/// Returns `None` when records of this model cannot be built from activity fields.
	fn construct(&self, id: i64, activity: NewActivity) -> Option<Activity> {
		Some(Activity::from_new(id, self.name(), activity))
	}

	fn subject_of(&self, record: &Activity) -> Option<EntityRef> {
		record.subject.clone()
	}

	fn causer_of(&self, record: &Activity) -> Option<EntityRef> {
		record.causer.clone()
	}
}

/// The built-in activity model.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultActivityModel;

impl ActivityModel for DefaultActivityModel {
	fn name(&self) -> &str {
		DEFAULT_ACTIVITY_MODEL
	}
}

/// Exercises `model` against a fully populated activity and names the
/// capabilities it lacks: `constructible`, `persistable`, `polymorphic_relations`.
pub fn missing_capabilities(model: &dyn ActivityModel) -> Vec<&'static str> {
	let activity = reference_activity();
	let Some(record) = model.construct(0, activity.clone()) else {
		return vec!["constructible"];
	};

	let mut missing = Vec::new();
	if record != Activity::from_new(0, model.name(), activity.clone()) {
		missing.push("persistable");
	}
	if model.subject_of(&record) != activity.subject || model.causer_of(&record) != activity.causer
	{
		missing.push("polymorphic_relations");
	}
	missing
}

fn reference_activity() -> NewActivity {
	let mut activity = NewActivity::new(Some("model-check".to_string()), Utc::now());
	activity.description = "model check".to_string();
	activity.subject = Some(EntityRef::new("model_check_subject", 1_i64));
	activity.causer = Some(EntityRef::new("model_check_causer", 2_i64));
	activity
		.properties
		.insert("key".to_string(), Value::from("value"));
	activity.event = Some("checked".to_string());
	activity.batch_uuid = Some(Uuid::nil());
	activity
}

#[derive(Debug, Clone)]
struct RegisteredModel {
	model: Arc<dyn ActivityModel>,
	missing: Vec<&'static str>,
}

/// Registry of activity models by name.
///
/// Models are checked when registered; a model lacking a capability is still
/// registered and only rejected when it is resolved.
#[derive(Debug, Clone)]
pub struct ActivityModels {
	models: HashMap<String, RegisteredModel>,
}

impl ActivityModels {
	pub fn new() -> Self {
		let mut models = Self {
			models: HashMap::new(),
		};
		models.register(Arc::new(DefaultActivityModel));
		models
	}

	pub fn register(&mut self, model: Arc<dyn ActivityModel>) {
		let missing = missing_capabilities(model.as_ref());
		self.models
			.insert(model.name().to_string(), RegisteredModel { model, missing });
	}

	/// Looks up the configured model; `None` selects the built-in model.
	pub fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn ActivityModel>> {
		let name = name.unwrap_or(DEFAULT_ACTIVITY_MODEL);
		let registered = self.models.get(name).ok_or_else(|| {
			ActivityError::InvalidConfiguration(format!(
				"activity model '{name}' is not a registered activity model"
			))
		})?;

		if !registered.missing.is_empty() {
			return Err(ActivityError::InvalidConfiguration(format!(
				"activity model '{name}' is missing required capabilities: {}",
				registered.missing.join(", ")
			)));
		}

		Ok(Arc::clone(&registered.model))
	}
}

impl Default for ActivityModels {
	fn default() -> Self {
		Self::new()
	}
}
