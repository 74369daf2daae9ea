// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Loom activity log.
//!
//! Layered configuration from defaults, a TOML file and `LOOM_ACTIVITYLOG_*`
//! environment variables, resolved into an [`ActivityLogConfig`].
//!
//! # Usage
//!
//! ```ignore
//! use loom_activity_config::load_config;
//!
//! let config = load_config()?;
//! println!("activity logging enabled: {}", config.enabled);
//! ```

pub mod error;
pub mod layer;
pub mod sources;

pub use error::ConfigError;
pub use layer::{ActivityLogConfig, ActivityLogConfigLayer, DEFAULT_CAUSER_TYPE, DEFAULT_LOG_NAME};
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`LOOM_ACTIVITYLOG_*`)
/// 2. Config file (`/etc/loom/activitylog.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ActivityLogConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ActivityLogConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<ActivityLogConfig, ConfigError> {
	load_from(vec![Box::new(EnvSource)])
}

/// Merge the given sources by precedence and resolve the result.
pub fn load_from(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ActivityLogConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ActivityLogConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	let config = merged.finalize();

	info!(
		enabled = config.enabled,
		default_log_name = config.default_log_name.as_deref().unwrap_or("<none>"),
		activity_model = config.activity_model.as_deref().unwrap_or("<default>"),
		causer_type = %config.causer_type,
		"Activity log configuration loaded"
	);

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;

	struct FixedSource(Precedence, ActivityLogConfigLayer);

	impl ConfigSource for FixedSource {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.0
		}

		fn load(&self) -> Result<ActivityLogConfigLayer, ConfigError> {
			Ok(self.1.clone())
		}
	}

	#[test]
	fn higher_precedence_wins_regardless_of_order() {
		let env = FixedSource(
			Precedence::Environment,
			ActivityLogConfigLayer {
				default_log_name: Some("from-env".to_string()),
				..Default::default()
			},
		);
		let file = FixedSource(
			Precedence::ConfigFile,
			ActivityLogConfigLayer {
				enabled: Some(false),
				default_log_name: Some("from-file".to_string()),
				..Default::default()
			},
		);

		let config = load_from(vec![Box::new(env), Box::new(file)]).unwrap();
		assert_eq!(config.default_log_name.as_deref(), Some("from-env"));
		assert!(!config.enabled);
	}

	#[test]
	fn no_sources_yields_defaults() {
		let config = load_from(Vec::new()).unwrap();
		assert_eq!(config, ActivityLogConfig::default());
	}
}
