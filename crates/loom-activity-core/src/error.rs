// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for activity logging.

use thiserror::Error;

/// Result type for activity log operations.
pub type Result<T> = std::result::Result<T, ActivityError>;

/// Errors that can abort an activity log call.
#[derive(Debug, Error)]
pub enum ActivityError {
	#[error("could not determine a user with identifier '{causer}'")]
	CouldNotLogActivity { causer: String },

	#[error("invalid activity log configuration: {0}")]
	InvalidConfiguration(String),

	#[error("could not encode activity properties: {0}")]
	Encoding(#[from] serde_json::Error),

	#[error("activity properties must be a mapping, got {0}")]
	InvalidProperties(String),

	#[error("record store error: {source}")]
	Store {
		#[source]
		source: StoreError,
	},
}

impl ActivityError {
	pub fn could_not_determine_user(causer: impl ToString) -> Self {
		Self::CouldNotLogActivity {
			causer: causer.to_string(),
		}
	}
}

impl From<StoreError> for ActivityError {
	fn from(source: StoreError) -> Self {
		Self::Store { source }
	}
}

/// A record store rejected a write or a read.
///
/// The write of an activity is a single insert, so the core never retries;
/// the failure is handed back to the caller of `log` as-is.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct StoreError {
	message: String,
	#[source]
	source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			source: None,
		}
	}

	pub fn with_source(
		message: impl Into<String>,
		source: impl std::error::Error + Send + Sync + 'static,
	) -> Self {
		Self {
			message: message.into(),
			source: Some(Box::new(source)),
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}
