// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared fixtures: a couple of users and articles, a session and a logger.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use loom_activity::{
	ActivityLogConfig, ActivityLogger, Entity, EntityId, EntityLookup, EntityRef,
	IdentityProvider, MemoryRecordStore, NewActivity, Properties, TapsActivity,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct User {
	pub id: i64,
	pub name: String,
}

impl Entity for User {
	fn entity_ref(&self) -> EntityRef {
		EntityRef::new("user", self.id)
	}

	fn attribute(&self, key: &str) -> Option<Value> {
		match key {
			"id" => Some(json!(self.id)),
			"name" => Some(json!(self.name)),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct Article {
	pub id: i64,
	pub name: String,
	pub user_id: Option<i64>,
	pub extra: Properties,
}

impl Article {
	pub fn new(id: i64, name: &str) -> Self {
		Self {
			id,
			name: name.to_string(),
			..Default::default()
		}
	}
}

impl Entity for Article {
	fn entity_ref(&self) -> EntityRef {
		EntityRef::new("article", self.id)
	}

	fn attribute(&self, key: &str) -> Option<Value> {
		match key {
			"id" => Some(json!(self.id)),
			"name" => Some(json!(self.name)),
			"user_id" => self.user_id.map(|id| json!(id)),
			other => self.extra.get(other).cloned(),
		}
	}

	fn accessor(&self, name: &str) -> Option<Value> {
		match name {
			"owner_name" => self.user_id.map(|id| json!(format!("name {id}"))),
			_ => None,
		}
	}
}

/// An article that rewrites descriptions of activities logged on it.
#[derive(Debug, Clone)]
pub struct TappedArticle(pub Article);

impl Entity for TappedArticle {
	fn entity_ref(&self) -> EntityRef {
		self.0.entity_ref()
	}

	fn attribute(&self, key: &str) -> Option<Value> {
		self.0.attribute(key)
	}

	fn as_tapper(&self) -> Option<&dyn TapsActivity> {
		Some(self)
	}
}

impl TapsActivity for TappedArticle {
	fn tap_activity(&self, activity: &mut NewActivity, event_name: &str) {
		activity.description = "my custom description".to_string();
		activity
			.properties
			.insert("tapped_event".to_string(), json!(event_name));
	}
}

/// Entity table keyed by `(type, id)`.
#[derive(Default)]
pub struct Entities {
	rows: Mutex<HashMap<(String, EntityId), Arc<dyn Entity>>>,
}

impl Entities {
	pub fn insert(&self, entity: Arc<dyn Entity>) {
		let key = entity.entity_ref();
		self.rows.lock().insert((key.entity_type, key.id), entity);
	}
}

impl EntityLookup for Entities {
	fn find(&self, entity_type: &str, id: &EntityId) -> Option<Arc<dyn Entity>> {
		self.rows
			.lock()
			.get(&(entity_type.to_string(), id.clone()))
			.cloned()
	}
}

/// Session-backed identity provider with a set of named guards.
pub struct Auth {
	guards: Vec<String>,
	user: Mutex<Option<Arc<dyn Entity>>>,
}

impl Auth {
	pub fn new(guards: &[&str]) -> Self {
		Self {
			guards: guards.iter().map(|g| g.to_string()).collect(),
			user: Mutex::new(None),
		}
	}

	pub fn login(&self, user: Arc<dyn Entity>) {
		*self.user.lock() = Some(user);
	}

	pub fn logout(&self) {
		*self.user.lock() = None;
	}
}

impl IdentityProvider for Auth {
	fn has_guard(&self, guard: &str) -> bool {
		self.guards.iter().any(|g| g == guard)
	}

	fn current_identity(&self, guard: Option<&str>) -> Option<Arc<dyn Entity>> {
		if guard.is_some_and(|g| !self.has_guard(g)) {
			return None;
		}
		self.user.lock().clone()
	}
}

pub struct Fixture {
	pub store: Arc<MemoryRecordStore>,
	pub entities: Arc<Entities>,
	pub auth: Arc<Auth>,
	pub logger: ActivityLogger,
}

impl Fixture {
	pub fn user(&self, id: i64) -> Arc<dyn Entity> {
		self.entities
			.find("user", &EntityId::from(id))
			.expect("seeded user")
	}

	pub fn article(&self, id: i64) -> Arc<dyn Entity> {
		self.entities
			.find("article", &EntityId::from(id))
			.expect("seeded article")
	}
}

pub fn fixture() -> Fixture {
	fixture_with(ActivityLogConfig::default())
}

pub fn fixture_with(config: ActivityLogConfig) -> Fixture {
	let store = Arc::new(MemoryRecordStore::new());
	let entities = Arc::new(Entities::default());
	let auth = Arc::new(Auth::new(&["web"]));

	for id in 1..=2 {
		entities.insert(Arc::new(User {
			id,
			name: format!("name {id}"),
		}));
	}
	entities.insert(Arc::new(Article::new(1, "article 1")));

	let logger = ActivityLogger::new(config, store.clone(), auth.clone(), entities.clone());

	Fixture {
		store,
		entities,
		auth,
		logger,
	}
}
