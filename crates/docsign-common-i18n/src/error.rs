// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for bundle loading and configuration.

use std::path::PathBuf;

/// Errors raised while loading a message bundle.
///
/// Locale matching never produces errors; only loading does.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error("No message bundle for locale '{locale}' at {source_id}")]
	NotFound { locale: String, source_id: String },

	#[error("Invalid locale tag: {0:?}")]
	InvalidLocale(String),

	#[error("Failed to read message bundle {source_id}: {source}")]
	Io {
		source_id: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse message bundle {source_id}: {message}")]
	Parse { source_id: String, message: String },
}

impl LoadError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, LoadError::NotFound { .. })
	}
}

/// Errors raised while assembling [`crate::I18nConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("Failed to parse TOML config at {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Validation error: {0}")]
	Validation(String),
}
