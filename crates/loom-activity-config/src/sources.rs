// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment variables.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ActivityLogConfigLayer;

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ActivityLogConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ActivityLogConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ActivityLogConfigLayer::default())
	}
}

/// Shape of the TOML file: settings live under an `[activitylog]` table.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
	activitylog: Option<ActivityLogConfigLayer>,
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/loom/activitylog.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ActivityLogConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ActivityLogConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(file.activitylog.unwrap_or_default())
	}
}

/// Environment variable source.
///
/// Convention: LOOM_ACTIVITYLOG_<FIELD>
pub struct EnvSource;

impl EnvSource {
	/// Builds a layer from an arbitrary variable lookup.
	pub fn load_with<F>(&self, var: F) -> Result<ActivityLogConfigLayer, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let non_empty = |name: &str| var(name).filter(|v| !v.is_empty());

		let enabled = match non_empty("LOOM_ACTIVITYLOG_ENABLED") {
			Some(v) => Some(parse_bool("LOOM_ACTIVITYLOG_ENABLED", &v)?),
			None => None,
		};

		Ok(ActivityLogConfigLayer {
			enabled,
			// Kept even when empty: an empty name disables the default log name.
			default_log_name: var("LOOM_ACTIVITYLOG_DEFAULT_LOG_NAME"),
			activity_model: non_empty("LOOM_ACTIVITYLOG_ACTIVITY_MODEL"),
			default_auth_driver: non_empty("LOOM_ACTIVITYLOG_DEFAULT_AUTH_DRIVER"),
			causer_type: non_empty("LOOM_ACTIVITYLOG_CAUSER_TYPE"),
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ActivityLogConfigLayer, ConfigError> {
		debug!("loading environment variables");
		self.load_with(|name| std::env::var(name).ok())
	}
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
	match value.to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(ConfigError::InvalidValue {
			key: key.to_string(),
			message: format!("invalid boolean value '{value}'"),
		}),
	}
}
