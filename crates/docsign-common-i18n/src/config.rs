// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered i18n configuration.
//!
//! Precedence (highest to lowest):
//! 1. Command-line overrides
//! 2. Environment variables (`DOCSIGN_I18N_*`)
//! 3. Config file (`/etc/docsign/i18n.toml`)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::error::ConfigError;
use crate::loader::MessageLoader;
use crate::locale::{is_valid_language_tag, SupportedLanguages, SOURCE_LOCALE};
use crate::matcher::LocaleMatcher;
use crate::resolver::FsBundleResolver;
use crate::source::RuntimeMode;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/docsign/i18n.toml";
pub const DEFAULT_TRANSLATIONS_DIR: &str = "translations";

/// Configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct I18nConfigLayer {
	pub source_lang: Option<String>,
	pub supported_langs: Option<Vec<String>>,
	pub translations_dir: Option<PathBuf>,
	pub mode: Option<RuntimeMode>,
	pub cache: Option<bool>,
}

impl I18nConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: Self) {
		if other.source_lang.is_some() {
			self.source_lang = other.source_lang;
		}
		if other.supported_langs.is_some() {
			self.supported_langs = other.supported_langs;
		}
		if other.translations_dir.is_some() {
			self.translations_dir = other.translations_dir;
		}
		if other.mode.is_some() {
			self.mode = other.mode;
		}
		if other.cache.is_some() {
			self.cache = other.cache;
		}
	}

	pub fn finalize(self) -> Result<I18nConfig, ConfigError> {
		let supported_langs = self
			.supported_langs
			.map(SupportedLanguages::new)
			.unwrap_or_default();

		let config = I18nConfig {
			source_lang: self
				.source_lang
				.unwrap_or_else(|| SOURCE_LOCALE.to_string()),
			supported_langs,
			translations_dir: self
				.translations_dir
				.unwrap_or_else(|| PathBuf::from(DEFAULT_TRANSLATIONS_DIR)),
			mode: self.mode.unwrap_or_default(),
			cache: self.cache.unwrap_or(false),
		};

		config.validate()?;
		Ok(config)
	}
}

/// Fully resolved i18n configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct I18nConfig {
	pub source_lang: String,
	pub supported_langs: SupportedLanguages,
	pub translations_dir: PathBuf,
	pub mode: RuntimeMode,
	pub cache: bool,
}

impl Default for I18nConfig {
	fn default() -> Self {
		Self {
			source_lang: SOURCE_LOCALE.to_string(),
			supported_langs: SupportedLanguages::builtin(),
			translations_dir: PathBuf::from(DEFAULT_TRANSLATIONS_DIR),
			mode: RuntimeMode::default(),
			cache: false,
		}
	}
}

impl I18nConfig {
	/// Validate cross-field rules.
	///
	/// Malformed supported codes only warn: the matcher skips them at
	/// resolution time.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.supported_langs.is_empty() {
			return Err(ConfigError::Validation(
				"supported_langs must list at least one language".to_string(),
			));
		}

		if !is_valid_language_tag(&self.source_lang) {
			return Err(ConfigError::InvalidValue {
				key: "source_lang".to_string(),
				message: format!("'{}' is not a valid language tag", self.source_lang),
			});
		}

		if !self.supported_langs.contains(&self.source_lang) {
			return Err(ConfigError::Validation(format!(
				"source_lang '{}' is not in supported_langs",
				self.source_lang
			)));
		}

		for code in self.supported_langs.invalid_codes() {
			warn!(code = %code, "supported language is not a valid language tag and will never be resolved");
		}

		Ok(())
	}

	pub fn matcher(&self) -> LocaleMatcher {
		LocaleMatcher::new(self.supported_langs.clone(), self.source_lang.clone())
	}

	pub fn resolver(&self) -> FsBundleResolver {
		FsBundleResolver::new(&self.translations_dir)
	}

	pub fn loader(&self) -> MessageLoader {
		let loader = MessageLoader::new(Arc::new(self.resolver()));
		if self.cache {
			loader.with_cache()
		} else {
			loader
		}
	}
}

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
	CommandLine = 60,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<I18nConfigLayer, ConfigError>;
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

	fn load(&self) -> Result<I18nConfigLayer, ConfigError> {
		Ok(I18nConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is skipped.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(DEFAULT_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<I18nConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(I18nConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: I18nConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed i18n config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: DOCSIGN_I18N_<FIELD>
pub struct EnvSource;

impl EnvSource {
	/// Build a layer from an arbitrary variable lookup.
	pub fn load_from<F>(lookup: F) -> Result<I18nConfigLayer, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

		let mode = match var("DOCSIGN_I18N_MODE") {
			Some(v) => Some(v.parse::<RuntimeMode>().map_err(|message| {
				ConfigError::InvalidValue {
					key: "DOCSIGN_I18N_MODE".to_string(),
					message,
				}
			})?),
			None => None,
		};

		let cache = match var("DOCSIGN_I18N_CACHE") {
			Some(v) => Some(parse_bool(&v).ok_or_else(|| ConfigError::InvalidValue {
				key: "DOCSIGN_I18N_CACHE".to_string(),
				message: format!("invalid boolean value '{v}'"),
			})?),
			None => None,
		};

		Ok(I18nConfigLayer {
			source_lang: var("DOCSIGN_I18N_SOURCE_LANG").map(|v| v.trim().to_string()),
			supported_langs: var("DOCSIGN_I18N_SUPPORTED_LANGS").map(|v| parse_lang_list(&v)),
			translations_dir: var("DOCSIGN_I18N_TRANSLATIONS_DIR").map(PathBuf::from),
			mode,
			cache,
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

	fn load(&self) -> Result<I18nConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Self::load_from(|name| std::env::var(name).ok())
	}
}

/// A fixed layer, typically built from command-line flags.
pub struct OverridesSource(pub I18nConfigLayer);

impl ConfigSource for OverridesSource {
	fn name(&self) -> &'static str {
		"overrides"
	}

	fn precedence(&self) -> Precedence {
		Precedence::CommandLine
	}

	fn load(&self) -> Result<I18nConfigLayer, ConfigError> {
		Ok(self.0.clone())
	}
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

/// Split a comma-separated language list, dropping empty entries.
pub fn parse_lang_list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect()
}

/// Load configuration from the given sources, applied in precedence order.
pub fn load_config_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<I18nConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = I18nConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	let config = merged.finalize()?;

	info!(
		source_lang = %config.source_lang,
		supported = config.supported_langs.len(),
		translations_dir = %config.translations_dir.display(),
		mode = %config.mode,
		cache = config.cache,
		"i18n configuration loaded"
	);

	Ok(config)
}

/// Load configuration with standard precedence from the system config file.
pub fn load_config() -> Result<I18nConfig, ConfigError> {
	load_config_with_file(DEFAULT_CONFIG_PATH)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<I18nConfig, ConfigError> {
	load_config_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}
