// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolution of the entity credited with an activity.

use std::fmt;
use std::sync::Arc;

use loom_activity_config::{ActivityLogConfig, DEFAULT_CAUSER_TYPE};
use loom_activity_core::{ActivityError, Entity, EntityId, EntityLookup, Result};
use tracing::{debug, warn};

/// Source of the currently authenticated identity.
pub trait IdentityProvider: Send + Sync {
	/// Whether a guard with this name is configured.
	fn has_guard(&self, guard: &str) -> bool;

	/// The identity authenticated on `guard`, or on the default guard when `None`.
	fn current_identity(&self, guard: Option<&str>) -> Option<Arc<dyn Entity>>;
}

/// Identity provider for contexts without authentication, such as background jobs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIdentity;

impl IdentityProvider for NoIdentity {
	fn has_guard(&self, _guard: &str) -> bool {
		false
	}

	fn current_identity(&self, _guard: Option<&str>) -> Option<Arc<dyn Entity>> {
		None
	}
}

/// An explicitly supplied causer.
#[derive(Debug, Clone)]
pub enum CauserRef {
	Entity(Arc<dyn Entity>),
	Id(EntityId),
}

impl From<Arc<dyn Entity>> for CauserRef {
	fn from(entity: Arc<dyn Entity>) -> Self {
		Self::Entity(entity)
	}
}

impl From<EntityId> for CauserRef {
	fn from(id: EntityId) -> Self {
		Self::Id(id)
	}
}

type ResolverOverride = Arc<dyn Fn(Option<&EntityId>) -> Option<Arc<dyn Entity>> + Send + Sync>;

/// Turns ids, entities or the ambient identity into a causer entity.
pub struct CauserResolver {
	identity: Arc<dyn IdentityProvider>,
	lookup: Arc<dyn EntityLookup>,
	auth_driver: Option<String>,
	causer_type: String,
	resolver_override: Option<ResolverOverride>,
	causer_override: Option<Arc<dyn Entity>>,
}

impl CauserResolver {
	pub fn new(identity: Arc<dyn IdentityProvider>, lookup: Arc<dyn EntityLookup>) -> Self {
		Self {
			identity,
			lookup,
			auth_driver: None,
			causer_type: DEFAULT_CAUSER_TYPE.to_string(),
			resolver_override: None,
			causer_override: None,
		}
	}

	pub fn from_config(
		config: &ActivityLogConfig,
		identity: Arc<dyn IdentityProvider>,
		lookup: Arc<dyn EntityLookup>,
	) -> Self {
		Self {
			auth_driver: config.default_auth_driver.clone(),
			causer_type: config.causer_type.clone(),
			..Self::new(identity, lookup)
		}
	}

	pub fn with_auth_driver(mut self, guard: impl Into<String>) -> Self {
		self.auth_driver = Some(guard.into());
		self
	}

	pub fn with_causer_type(mut self, causer_type: impl Into<String>) -> Self {
		self.causer_type = causer_type.into();
		self
	}

	/// Replaces default resolution of ids and of the ambient causer.
	///
	/// The callback receives the id being resolved, or `None` for the ambient
	/// causer. Explicit entities are never passed through it.
	pub fn resolve_using<F>(&mut self, resolver: F) -> &mut Self
	where
		F: Fn(Option<&EntityId>) -> Option<Arc<dyn Entity>> + Send + Sync + 'static,
	{
		self.resolver_override = Some(Arc::new(resolver));
		self
	}

	/// Pins the ambient causer, e.g. from a job that knows who triggered it.
	pub fn set_causer(&mut self, causer: Option<Arc<dyn Entity>>) -> &mut Self {
		self.causer_override = causer;
		self
	}

	/// Resolves `causer`, or the ambient causer when `None`.
	///
	/// A missing ambient identity is not an error; an id that cannot be
	/// resolved is [`ActivityError::CouldNotLogActivity`].
	pub fn resolve(&self, causer: Option<CauserRef>) -> Result<Option<Arc<dyn Entity>>> {
		match causer {
			Some(CauserRef::Entity(entity)) => Ok(Some(entity)),
			Some(CauserRef::Id(id)) => self.resolve_id(&id).map(Some),
			None => Ok(self.resolve_ambient()),
		}
	}

	fn resolve_id(&self, id: &EntityId) -> Result<Arc<dyn Entity>> {
		let found = match &self.resolver_override {
			Some(resolver) => resolver(Some(id)),
			None => self.lookup.find(&self.causer_type, id),
		};

		found.ok_or_else(|| {
			debug!(causer_type = %self.causer_type, causer_id = %id, "causer id did not resolve");
			ActivityError::could_not_determine_user(id)
		})
	}

	fn resolve_ambient(&self) -> Option<Arc<dyn Entity>> {
		if let Some(causer) = &self.causer_override {
			return Some(Arc::clone(causer));
		}
		if let Some(resolver) = &self.resolver_override {
			return resolver(None);
		}

		let guard = self.auth_driver.as_deref().filter(|guard| {
			let known = self.identity.has_guard(guard);
			if !known {
				warn!(guard, "auth guard not configured, using default guard");
			}
			known
		});

		self.identity.current_identity(guard)
	}
}

impl fmt::Debug for CauserResolver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CauserResolver")
			.field("auth_driver", &self.auth_driver)
			.field("causer_type", &self.causer_type)
			.field("has_resolver_override", &self.resolver_override.is_some())
			.field("causer_override", &self.causer_override)
			.finish()
	}
}
