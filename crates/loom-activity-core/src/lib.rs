// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loom activity log.
//!
//! - [`Entity`] / [`EntityRef`]: polymorphic subject and causer references
//! - [`NewActivity`] / [`Activity`]: an activity before and after persistence
//! - [`PlaceholderRenderer`]: `:subject.name` style description templating
//! - [`ActivityError`]: the error taxonomy shared by every activity crate

pub mod activity;
pub mod entity;
pub mod error;
pub mod placeholder;
pub mod properties;

pub use activity::{Activity, NewActivity};
pub use entity::{Entity, EntityId, EntityLookup, EntityRef, EntitySnapshot, TapsActivity};
pub use error::{ActivityError, Result, StoreError};
pub use placeholder::PlaceholderRenderer;
pub use properties::{lookup_path, Properties};
