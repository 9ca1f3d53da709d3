// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime mode and bundle source identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selects which translation format is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
	/// Human-editable gettext sources (`.po`), picked up without a rebuild.
	Development,
	/// Compiled gettext catalogs (`.mo`).
	#[default]
	Production,
}

impl RuntimeMode {
	pub fn file_extension(&self) -> &'static str {
		match self {
			RuntimeMode::Development => "po",
			RuntimeMode::Production => "mo",
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			RuntimeMode::Development => "development",
			RuntimeMode::Production => "production",
		}
	}
}

impl fmt::Display for RuntimeMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for RuntimeMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"development" | "dev" => Ok(RuntimeMode::Development),
			"production" | "prod" => Ok(RuntimeMode::Production),
			other => Err(format!("unknown runtime mode '{other}'")),
		}
	}
}

/// Name of the message catalog inside each locale directory.
pub const CATALOG_NAME: &str = "web";

/// Identifies one message bundle: `{locale}/web.{ext}`.
///
/// A pure function of locale and mode; resolvers map it to a file, an
/// embedded blob or anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleSource {
	locale: String,
	mode: RuntimeMode,
}

impl BundleSource {
	pub fn new(locale: impl Into<String>, mode: RuntimeMode) -> Self {
		Self {
			locale: locale.into(),
			mode,
		}
	}

	pub fn locale(&self) -> &str {
		&self.locale
	}

	pub fn mode(&self) -> RuntimeMode {
		self.mode
	}

	/// Relative identifier, e.g. `pt-BR/web.po`.
	pub fn id(&self) -> String {
		format!(
			"{}/{CATALOG_NAME}.{}",
			self.locale,
			self.mode.file_extension()
		)
	}
}

impl fmt::Display for BundleSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.id())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_file_extension() {
		assert_eq!(RuntimeMode::Development.file_extension(), "po");
		assert_eq!(RuntimeMode::Production.file_extension(), "mo");
	}

	#[test]
	fn test_mode_from_str() {
		assert_eq!("development".parse::<RuntimeMode>(), Ok(RuntimeMode::Development));
		assert_eq!("DEV".parse::<RuntimeMode>(), Ok(RuntimeMode::Development));
		assert_eq!(" production ".parse::<RuntimeMode>(), Ok(RuntimeMode::Production));
		assert_eq!("prod".parse::<RuntimeMode>(), Ok(RuntimeMode::Production));
		assert!("staging".parse::<RuntimeMode>().is_err());
	}

	#[test]
	fn test_default_mode_is_production() {
		assert_eq!(RuntimeMode::default(), RuntimeMode::Production);
	}

	#[test]
	fn test_source_id_depends_on_locale_and_mode() {
		let dev = BundleSource::new("pt-BR", RuntimeMode::Development);
		let prod = BundleSource::new("pt-BR", RuntimeMode::Production);
		assert_eq!(dev.id(), "pt-BR/web.po");
		assert_eq!(prod.id(), "pt-BR/web.mo");
		assert_eq!(dev.to_string(), dev.id());
		assert_eq!(dev, BundleSource::new("pt-BR", RuntimeMode::Development));
	}

	#[test]
	fn test_mode_serde() {
		#[derive(Deserialize)]
		struct Wrapper {
			mode: RuntimeMode,
		}
		let w: Wrapper = toml::from_str("mode = \"development\"").unwrap();
		assert_eq!(w.mode, RuntimeMode::Development);
	}
}
