// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Internationalization (i18n) support for Docsign.
//!
//! This crate resolves a request's language from its `Accept-Language`
//! header and loads the matching gettext message bundle.
//!
//! - [`LocaleMatcher`] picks the first supported preference, trying the full
//!   tag and then its base language (`pt-BR` → `pt`), and falls back to the
//!   source language. It never fails.
//! - [`MessageLoader`] loads `{locale}/web.po` in development and
//!   `{locale}/web.mo` otherwise through a [`BundleResolver`]. A missing
//!   bundle is an error.
//! - [`ActiveMessages`] is the per-request activation; it is passed around
//!   explicitly or bound to a task with [`ActiveMessages::scope`].
//!
//! # Example
//!
//! ```
//! use docsign_common_i18n::{LocaleMatcher, SupportedLanguages};
//!
//! let matcher = LocaleMatcher::new(SupportedLanguages::new(["en", "pt"]), "en");
//!
//! let data = matcher.extract_locale_data(Some("pt-BR;q=0.9, en;q=0.8"));
//! assert_eq!(data.lang.as_str(), "pt");
//! assert_eq!(data.locales, vec!["pt-BR;q=0.9", "en;q=0.8"]);
//!
//! let data = matcher.extract_locale_data(Some("fr-CA"));
//! assert!(data.lang.is_fallback());
//! ```

mod bundle;
mod config;
mod context;
mod error;
mod i18n;
mod loader;
mod locale;
mod matcher;
mod resolver;
mod source;

pub use bundle::MessageBundle;
pub use config::{
	load_config, load_config_from_sources, load_config_with_file, parse_lang_list, ConfigSource,
	DefaultsSource, EnvSource, I18nConfig, I18nConfigLayer, OverridesSource, Precedence, TomlSource,
	DEFAULT_CONFIG_PATH, DEFAULT_TRANSLATIONS_DIR,
};
pub use context::{t, t_fmt, ActiveMessages, I18nSession, Message};
pub use error::{ConfigError, LoadError};
pub use i18n::I18n;
pub use loader::MessageLoader;
pub use locale::{
	available_locales, is_valid_language_tag, locale_info, LocaleInfo, SupportedLanguages, LOCALES,
	SOURCE_LOCALE,
};
pub use matcher::{
	accept_language, preference_list, HeaderLocaleData, LocaleData, LocaleMatcher, ResolvedLocale,
};
pub use resolver::{BundleResolver, FsBundleResolver, StaticBundleResolver};
pub use source::{BundleSource, RuntimeMode, CATALOG_NAME};
