// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Activity records before and after persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entity::{Entity, EntityLookup, EntityRef};
use crate::properties::{lookup_path, Properties};

/// An activity that has been assembled but not yet persisted.
///
/// Subject and causer hooks receive this by mutable reference and may change
/// any field before it reaches the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
	/// Log channel; `None` when no log name is configured.
	pub log_name: Option<String>,
	pub description: String,
	pub subject: Option<EntityRef>,
	pub causer: Option<EntityRef>,
	pub properties: Properties,
	pub event: Option<String>,
	/// Correlation id of the batch open when the activity was logged.
	pub batch_uuid: Option<Uuid>,
	pub created_at: DateTime<Utc>,
}

impl NewActivity {
	pub fn new(log_name: Option<String>, created_at: DateTime<Utc>) -> Self {
		Self {
			log_name,
			description: String::new(),
			subject: None,
			causer: None,
			properties: Properties::new(),
			event: None,
			batch_uuid: None,
			created_at,
		}
	}
}

/// A persisted activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
	/// Identifier assigned by the record store.
	pub id: i64,
	/// Name of the activity model the record was persisted as.
	pub model: String,
	pub log_name: Option<String>,
	pub description: String,
	pub subject: Option<EntityRef>,
	pub causer: Option<EntityRef>,
	pub properties: Properties,
	pub event: Option<String>,
	pub batch_uuid: Option<Uuid>,
	pub created_at: DateTime<Utc>,
}

impl Activity {
	pub fn from_new(id: i64, model: impl Into<String>, new: NewActivity) -> Self {
		Self {
			id,
			model: model.into(),
			log_name: new.log_name,
			description: new.description,
			subject: new.subject,
			causer: new.causer,
			properties: new.properties,
			event: new.event,
			batch_uuid: new.batch_uuid,
			created_at: new.created_at,
		}
	}

	/// Reads a property by dotted path, e.g. `property.subProperty`.
	pub fn extra_property(&self, path: &str) -> Option<&Value> {
		let (head, rest) = match path.split_once('.') {
			Some((head, rest)) => (head, Some(rest)),
			None => (path, None),
		};
		let value = self.properties.get(head)?;
		match rest {
			Some(rest) => lookup_path(value, rest),
			None => Some(value),
		}
	}

	/// Returns the change-tracking payload: the `attributes` and `old` entries.
	pub fn changes(&self) -> Properties {
		["attributes", "old"]
			.into_iter()
			.filter_map(|key| {
				self.properties
					.get(key)
					.map(|value| (key.to_string(), value.clone()))
			})
			.collect()
	}

	pub fn subject_entity(&self, lookup: &dyn EntityLookup) -> Option<Arc<dyn Entity>> {
		let subject = self.subject.as_ref()?;
		lookup.find(&subject.entity_type, &subject.id)
	}

	pub fn causer_entity(&self, lookup: &dyn EntityLookup) -> Option<Arc<dyn Entity>> {
		let causer = self.causer.as_ref()?;
		lookup.find(&causer.entity_type, &causer.id)
	}
}
