// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Polymorphic entity references for activity subjects and causers.
//!
//! An activity points at arbitrary application entities by a `(type, id)` pair.
//! Live entities are handed to the logger as `Arc<dyn Entity>`; persisted
//! activities only keep the [`EntityRef`] and dereference it through an
//! [`EntityLookup`] when needed.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::activity::NewActivity;
use crate::properties::Properties;

/// Identifier of an entity, stored in its canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_inner(self) -> String {
		self.0
	}
}

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for EntityId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for EntityId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl From<i32> for EntityId {
	fn from(id: i32) -> Self {
		Self(id.to_string())
	}
}

impl From<i64> for EntityId {
	fn from(id: i64) -> Self {
		Self(id.to_string())
	}
}

impl From<u64> for EntityId {
	fn from(id: u64) -> Self {
		Self(id.to_string())
	}
}

impl From<Uuid> for EntityId {
	fn from(id: Uuid) -> Self {
		Self(id.to_string())
	}
}

/// A `(type, id)` pair naming one entity of any type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
	pub entity_type: String,
	pub id: EntityId,
}

impl EntityRef {
	pub fn new(entity_type: impl Into<String>, id: impl Into<EntityId>) -> Self {
		Self {
			entity_type: entity_type.into(),
			id: id.into(),
		}
	}
}

impl fmt::Display for EntityRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.entity_type, self.id)
	}
}

/// An application entity that can be the subject or causer of an activity.
pub trait Entity: fmt::Debug + Send + Sync {
	fn entity_ref(&self) -> EntityRef;

	/// Reads a stored attribute.
	fn attribute(&self, key: &str) -> Option<Value>;

	/// Reads a computed attribute. Consulted when [`Entity::attribute`] has no value.
	fn accessor(&self, _name: &str) -> Option<Value> {
		None
	}

	/// Returns the activity hook if this entity customizes activities logged on it.
	fn as_tapper(&self) -> Option<&dyn TapsActivity> {
		None
	}
}

/// Lets a subject adjust an activity about itself right before it is persisted.
pub trait TapsActivity {
	fn tap_activity(&self, activity: &mut NewActivity, event_name: &str);
}

/// Dereferences entity references, e.g. to turn a scalar causer id into an entity.
pub trait EntityLookup: Send + Sync {
	fn find(&self, entity_type: &str, id: &EntityId) -> Option<Arc<dyn Entity>>;
}

/// A plain entity made of a reference and an attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
	pub entity: EntityRef,
	pub attributes: Properties,
}

impl EntitySnapshot {
	pub fn new(entity_type: impl Into<String>, id: impl Into<EntityId>) -> Self {
		Self {
			entity: EntityRef::new(entity_type, id),
			attributes: Properties::new(),
		}
	}

	pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attributes.insert(key.into(), value.into());
		self
	}
}

impl Entity for EntitySnapshot {
	fn entity_ref(&self) -> EntityRef {
		self.entity.clone()
	}

	fn attribute(&self, key: &str) -> Option<Value> {
		match self.attributes.get(key) {
			Some(value) => Some(value.clone()),
			None if key == "id" => Some(Value::String(self.entity.id.to_string())),
			None => None,
		}
	}
}
