// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Activity logging for Loom.
//!
//! An [`ActivityLogger`] records who did what to which entity:
//!
//! ```ignore
//! logger
//!     .activity()
//!     .performed_on(article)
//!     .caused_by(user)
//!     .with_property("key", "value")
//!     .event("updated")
//!     .log("Updated :subject.name")?;
//! ```
//!
//! Activities can be grouped with [`LogBatch`], suppressed with
//! [`ActivityLogger::without_logs`], and persisted through any [`RecordStore`].

pub mod batch;
pub mod causer;
pub mod gate;
pub mod logger;
pub mod model;
pub mod pending;
pub mod store;

pub use batch::{BatchState, LogBatch};
pub use causer::{CauserRef, CauserResolver, IdentityProvider, NoIdentity};
pub use gate::{LoggingGate, SuppressionGuard};
pub use logger::ActivityLogger;
pub use model::{
	missing_capabilities, ActivityModel, ActivityModels, DefaultActivityModel,
	DEFAULT_ACTIVITY_MODEL,
};
pub use pending::PendingActivity;
pub use store::{ActivityQuery, MemoryRecordStore, RecordStore};

pub use loom_activity_config::ActivityLogConfig;
pub use loom_activity_core::{
	Activity, ActivityError, Entity, EntityId, EntityLookup, EntityRef, EntitySnapshot,
	NewActivity, PlaceholderRenderer, Properties, Result, StoreError, TapsActivity,
};
