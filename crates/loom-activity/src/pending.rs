// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fluent builder for a single activity.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use loom_activity_core::properties::merge_into;
use loom_activity_core::{
	Activity, ActivityError, Entity, EntityId, NewActivity, PlaceholderRenderer, Properties,
	Result,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::causer::CauserRef;
use crate::logger::ActivityLogger;

type Tap<'a> = Box<dyn FnOnce(&mut NewActivity) + 'a>;

#[derive(Debug)]
enum CauserChoice {
	Ambient,
	Anonymous,
	Given(CauserRef),
}

/// An activity being described. Nothing is recorded until [`PendingActivity::log`].
#[must_use = "activities are only recorded by calling `log`"]
pub struct PendingActivity<'a> {
	logger: &'a ActivityLogger,
	log_name: Option<String>,
	subject: Option<Arc<dyn Entity>>,
	causer: CauserChoice,
	properties: Properties,
	event: Option<String>,
	created_at: Option<DateTime<Utc>>,
	taps: Vec<Tap<'a>>,
	error: Option<ActivityError>,
}

impl<'a> PendingActivity<'a> {
	pub(crate) fn new(logger: &'a ActivityLogger, log_name: Option<String>) -> Self {
		Self {
			logger,
			log_name,
			subject: None,
			causer: CauserChoice::Ambient,
			properties: Properties::new(),
			event: None,
			created_at: None,
			taps: Vec::new(),
			error: None,
		}
	}

	/// Set the entity the activity was performed on.
	pub fn performed_on(mut self, subject: Arc<dyn Entity>) -> Self {
		self.subject = Some(subject);
		self
	}

	/// Credit the activity to an entity.
	pub fn caused_by(mut self, causer: Arc<dyn Entity>) -> Self {
		self.causer = CauserChoice::Given(CauserRef::Entity(causer));
		self
	}

	/// Credit the activity to the causer with this id, resolved when logging.
	pub fn caused_by_id(mut self, id: impl Into<EntityId>) -> Self {
		self.causer = CauserChoice::Given(CauserRef::Id(id.into()));
		self
	}

	/// Record no causer, even if an identity is authenticated.
	pub fn caused_by_anonymous(mut self) -> Self {
		self.causer = CauserChoice::Anonymous;
		self
	}

	/// Add one property. Values that cannot be encoded fail the `log` call.
	pub fn with_property(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
		match serde_json::to_value(value) {
			Ok(value) => {
				self.properties.insert(key.into(), value);
			}
			Err(e) => self.fail(e.into()),
		}
		self
	}

	/// Merge a property mapping; keys already set are overwritten.
	pub fn with_properties(mut self, properties: impl Serialize) -> Self {
		match serde_json::to_value(properties) {
			Ok(Value::Object(map)) => merge_into(&mut self.properties, map),
			Ok(Value::Null) => {}
			Ok(other) => self.fail(ActivityError::InvalidProperties(value_kind(&other).to_string())),
			Err(e) => self.fail(e.into()),
		}
		self
	}

	pub fn event(mut self, event: impl Into<String>) -> Self {
		self.event = Some(event.into());
		self
	}

	/// Record the activity with this timestamp instead of the current time.
	pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
		self.created_at = Some(created_at);
		self
	}

	pub fn use_log(mut self, log_name: impl Into<String>) -> Self {
		self.log_name = Some(log_name.into());
		self
	}

	/// Register a hook that may change the activity right before it is stored.
	///
	/// Hooks run after the subject's own hook, in registration order.
	pub fn tap<F>(mut self, f: F) -> Self
	where
		F: FnOnce(&mut NewActivity) + 'a,
	{
		self.taps.push(Box::new(f));
		self
	}

	/// Record the activity.
	///
	/// Returns `Ok(None)` without doing anything when logging is disabled.
	#[instrument(skip_all, fields(log_name = ?self.log_name, event = ?self.event))]
	pub fn log(self, description: impl AsRef<str>) -> Result<Option<Activity>> {
		let logger = self.logger;
		if !logger.is_enabled() {
			debug!("activity logging disabled, skipping");
			return Ok(None);
		}
		if let Some(error) = self.error {
			return Err(error);
		}

		let model = logger
			.models()
			.resolve(logger.config().activity_model.as_deref())?;

		let causer = match self.causer {
			CauserChoice::Ambient => logger.causers().resolve(None)?,
			CauserChoice::Anonymous => None,
			CauserChoice::Given(causer) => logger.causers().resolve(Some(causer))?,
		};

		let mut activity =
			NewActivity::new(self.log_name, self.created_at.unwrap_or_else(Utc::now));
		activity.event = self.event;
		activity.batch_uuid = logger.batch().current_uuid();
		activity.subject = self.subject.as_ref().map(|subject| subject.entity_ref());
		activity.causer = causer.as_ref().map(|causer| causer.entity_ref());
		activity.properties = self.properties;

		let description =
			PlaceholderRenderer::new(self.subject.as_deref(), causer.as_deref(), &activity.properties)
				.render(description.as_ref());
		activity.description = description;

		if let Some(tapper) = self.subject.as_deref().and_then(|subject| subject.as_tapper()) {
			let event_name = activity.event.clone().unwrap_or_default();
			tapper.tap_activity(&mut activity, &event_name);
		}

		for tap in self.taps {
			tap(&mut activity);
		}

		let record = logger.store().create(model.as_ref(), activity)?;
		debug!(
			activity_id = record.id,
			model = %record.model,
			batch_uuid = ?record.batch_uuid,
			"activity recorded"
		);
		Ok(Some(record))
	}

	fn fail(&mut self, error: ActivityError) {
		if self.error.is_none() {
			self.error = Some(error);
		}
	}
}

impl fmt::Debug for PendingActivity<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PendingActivity")
			.field("log_name", &self.log_name)
			.field("subject", &self.subject)
			.field("causer", &self.causer)
			.field("properties", &self.properties)
			.field("event", &self.event)
			.field("created_at", &self.created_at)
			.field("taps", &self.taps.len())
			.field("error", &self.error)
			.finish()
	}
}

fn value_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "a mapping",
	}
}
