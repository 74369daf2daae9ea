// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Activity log configuration layer and resolved configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_NAME: &str = "default";
pub const DEFAULT_CAUSER_TYPE: &str = "user";

/// Partial configuration produced by a single source.
///
/// Every field is optional so layers can be merged by precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityLogConfigLayer {
	pub enabled: Option<bool>,
	/// An empty string means "no log name" rather than "use the default".
	pub default_log_name: Option<String>,
	pub activity_model: Option<String>,
	pub default_auth_driver: Option<String>,
	pub causer_type: Option<String>,
}

impl ActivityLogConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.default_log_name.is_some() {
			self.default_log_name = other.default_log_name;
		}
		if other.activity_model.is_some() {
			self.activity_model = other.activity_model;
		}
		if other.default_auth_driver.is_some() {
			self.default_auth_driver = other.default_auth_driver;
		}
		if other.causer_type.is_some() {
			self.causer_type = other.causer_type;
		}
	}

	pub fn finalize(self) -> ActivityLogConfig {
		let default_log_name = match self.default_log_name {
			None => Some(DEFAULT_LOG_NAME.to_string()),
			Some(name) if name.is_empty() => None,
			Some(name) => Some(name),
		};

		ActivityLogConfig {
			enabled: self.enabled.unwrap_or(true),
			default_log_name,
			activity_model: self.activity_model.filter(|m| !m.is_empty()),
			default_auth_driver: self.default_auth_driver.filter(|d| !d.is_empty()),
			causer_type: self
				.causer_type
				.filter(|t| !t.is_empty())
				.unwrap_or_else(|| DEFAULT_CAUSER_TYPE.to_string()),
		}
	}
}

/// Fully resolved activity log configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityLogConfig {
	/// Initial state of the logging gate.
	pub enabled: bool,
	/// Log name used by builders that do not pick one; `None` records no log name.
	pub default_log_name: Option<String>,
	/// Name of the registered activity model; `None` selects the built-in model.
	pub activity_model: Option<String>,
	/// Authentication guard consulted for the ambient causer.
	pub default_auth_driver: Option<String>,
	/// Entity type scalar causer ids are looked up as.
	pub causer_type: String,
}

impl Default for ActivityLogConfig {
	fn default() -> Self {
		ActivityLogConfigLayer::default().finalize()
	}
}
