// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persistence seam for activities.

use std::sync::atomic::{AtomicI64, Ordering};

use loom_activity_core::{Activity, EntityRef, NewActivity, StoreError};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::model::ActivityModel;

/// Where activities are written and read back from.
pub trait RecordStore: Send + Sync {
	/// Persists one activity as `model` in a single write.
	fn create(&self, model: &dyn ActivityModel, activity: NewActivity)
		-> Result<Activity, StoreError>;

	/// Returns matching activities, oldest first.
	fn query(&self, query: &ActivityQuery) -> Result<Vec<Activity>, StoreError>;
}

/// Filter over persisted activities. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityQuery {
	pub log_names: Vec<String>,
	pub subject: Option<EntityRef>,
	pub causer: Option<EntityRef>,
	pub event: Option<String>,
	pub batch_uuid: Option<Uuid>,
	pub has_batch: Option<bool>,
	pub limit: Option<usize>,
}

impl ActivityQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn in_log<I, S>(mut self, log_names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.log_names = log_names.into_iter().map(Into::into).collect();
		self
	}

	pub fn for_subject(mut self, subject: EntityRef) -> Self {
		self.subject = Some(subject);
		self
	}

	pub fn caused_by(mut self, causer: EntityRef) -> Self {
		self.causer = Some(causer);
		self
	}

	pub fn for_event(mut self, event: impl Into<String>) -> Self {
		self.event = Some(event.into());
		self
	}

	pub fn for_batch(mut self, batch_uuid: Uuid) -> Self {
		self.batch_uuid = Some(batch_uuid);
		self
	}

	pub fn has_batch(mut self, has_batch: bool) -> Self {
		self.has_batch = Some(has_batch);
		self
	}

	pub fn limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}

	pub fn allows(&self, activity: &Activity) -> bool {
		if !self.log_names.is_empty()
			&& !activity
				.log_name
				.as_ref()
				.is_some_and(|name| self.log_names.contains(name))
		{
			return false;
		}
		if self.subject.is_some() && activity.subject != self.subject {
			return false;
		}
		if self.causer.is_some() && activity.causer != self.causer {
			return false;
		}
		if self.event.is_some() && activity.event != self.event {
			return false;
		}
		if self.batch_uuid.is_some() && activity.batch_uuid != self.batch_uuid {
			return false;
		}
		if let Some(has_batch) = self.has_batch {
			if activity.batch_uuid.is_some() != has_batch {
				return false;
			}
		}
		true
	}
}

/// In-memory record store. Ids are assigned sequentially from 1.
#[derive(Debug)]
pub struct MemoryRecordStore {
	records: Mutex<Vec<Activity>>,
	next_id: AtomicI64,
}

impl MemoryRecordStore {
	pub fn new() -> Self {
		Self {
			records: Mutex::new(Vec::new()),
			next_id: AtomicI64::new(1),
		}
	}

	pub fn len(&self) -> usize {
		self.records.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.lock().is_empty()
	}

	pub fn first(&self) -> Option<Activity> {
		self.records.lock().first().cloned()
	}

	pub fn last(&self) -> Option<Activity> {
		self.records.lock().last().cloned()
	}

	pub fn all(&self) -> Vec<Activity> {
		self.records.lock().clone()
	}

	pub fn clear(&self) {
		self.records.lock().clear();
	}
}

impl Default for MemoryRecordStore {
	fn default() -> Self {
		Self::new()
	}
}

impl RecordStore for MemoryRecordStore {
	fn create(
		&self,
		model: &dyn ActivityModel,
		activity: NewActivity,
	) -> Result<Activity, StoreError> {
		let id = self.next_id.fetch_add(1, Ordering::SeqCst);
		let record = model.construct(id, activity).ok_or_else(|| {
			StoreError::new(format!(
				"activity model '{}' cannot build records",
				model.name()
			))
		})?;
		self.records.lock().push(record.clone());
		Ok(record)
	}

	fn query(&self, query: &ActivityQuery) -> Result<Vec<Activity>, StoreError> {
		let records = self.records.lock();
		let matching = records.iter().filter(|activity| query.allows(activity));
		Ok(match query.limit {
			Some(limit) => matching.take(limit).cloned().collect(),
			None => matching.cloned().collect(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::DefaultActivityModel;
	use chrono::Utc;

	fn new_activity(log_name: &str, causer: Option<EntityRef>, batch: Option<Uuid>) -> NewActivity {
		let mut activity = NewActivity::new(Some(log_name.to_string()), Utc::now());
		activity.description = format!("in {log_name}");
		activity.causer = causer;
		activity.batch_uuid = batch;
		activity
	}

	#[test]
	fn create_assigns_sequential_ids_and_model() {
		let store = MemoryRecordStore::new();
		let first = store
			.create(&DefaultActivityModel, new_activity("default", None, None))
			.unwrap();
		let second = store
			.create(&DefaultActivityModel, new_activity("default", None, None))
			.unwrap();

		assert_eq!(first.id, 1);
		assert_eq!(second.id, 2);
		assert_eq!(first.model, "activity");
		assert_eq!(store.len(), 2);
		assert_eq!(store.last().unwrap().id, 2);
	}

	#[test]
	fn query_filters_by_log_causer_and_batch() {
		let store = MemoryRecordStore::new();
		let user = EntityRef::new("user", 1_i64);
		let batch = Uuid::new_v4();

		for activity in [
			new_activity("log1", Some(user.clone()), Some(batch)),
			new_activity("log2", Some(user.clone()), None),
			new_activity("log2", None, Some(batch)),
		] {
			store.create(&DefaultActivityModel, activity).unwrap();
		}

		let by_log = store.query(&ActivityQuery::new().in_log(["log2"])).unwrap();
		assert_eq!(by_log.len(), 2);

		let by_causer = store
			.query(&ActivityQuery::new().caused_by(user.clone()))
			.unwrap();
		assert_eq!(by_causer.len(), 2);

		let in_batch = store.query(&ActivityQuery::new().for_batch(batch)).unwrap();
		assert_eq!(in_batch.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 3]);

		let unbatched = store.query(&ActivityQuery::new().has_batch(false)).unwrap();
		assert_eq!(unbatched.len(), 1);

		let limited = store.query(&ActivityQuery::new().limit(1)).unwrap();
		assert_eq!(limited[0].id, 1);
	}

	#[test]
	fn log_filter_excludes_unnamed_logs() {
		let store = MemoryRecordStore::new();
		let mut activity = new_activity("default", None, None);
		activity.log_name = None;
		store.create(&DefaultActivityModel, activity).unwrap();

		assert!(store
			.query(&ActivityQuery::new().in_log(["default"]))
			.unwrap()
			.is_empty());
		assert_eq!(store.query(&ActivityQuery::new()).unwrap().len(), 1);
	}

	#[test]
	fn clear_empties_store() {
		let store = MemoryRecordStore::new();
		store
			.create(&DefaultActivityModel, new_activity("default", None, None))
			.unwrap();
		store.clear();
		assert!(store.is_empty());
		assert!(store.first().is_none());
	}

	#[derive(Debug)]
	struct UnbuildableModel;

	impl ActivityModel for UnbuildableModel {
		fn name(&self) -> &str {
			"unbuildable"
		}

		fn construct(&self, _id: i64, _activity: NewActivity) -> Option<Activity> {
			None
		}
	}

	#[test]
	fn create_fails_when_model_cannot_build_record() {
		let store = MemoryRecordStore::new();
		let err = store
			.create(&UnbuildableModel, new_activity("default", None, None))
			.unwrap_err();

		assert!(err.message().contains("unbuildable"));
		assert!(store.is_empty());
	}

	#[test]
	fn create_uses_record_built_by_model() {
		#[derive(Debug)]
		struct Stamped;

		impl ActivityModel for Stamped {
			fn name(&self) -> &str {
				"stamped"
			}

			fn construct(&self, id: i64, mut activity: NewActivity) -> Option<Activity> {
				activity.description = format!("[stamped] {}", activity.description);
				Some(Activity::from_new(id, self.name(), activity))
			}
		}

		let store = MemoryRecordStore::new();
		let record = store
			.create(&Stamped, new_activity("default", None, None))
			.unwrap();
		assert_eq!(record.description, "[stamped] in default");
		assert_eq!(store.first().unwrap(), record);
	}
}
