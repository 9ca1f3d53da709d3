// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Supported language table and language tag validation.

use unic_langid::LanguageIdentifier;

/// Metadata about a built-in language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleInfo {
	/// Language tag as used in translation directories (e.g., "en", "pt-BR")
	pub code: &'static str,
	/// English name of the language
	pub name: &'static str,
	/// Native name of the language, shown in the language switcher
	pub native_name: &'static str,
}

/// Source language. Always has a bundle and is the resolution fallback.
pub const SOURCE_LOCALE: &str = "en";

/// Built-in languages, in the order they are offered to users.
pub const LOCALES: &[LocaleInfo] = &[
	LocaleInfo {
		code: "en",
		name: "English",
		native_name: "English",
	},
	LocaleInfo {
		code: "de",
		name: "German",
		native_name: "Deutsch",
	},
	LocaleInfo {
		code: "fr",
		name: "French",
		native_name: "Français",
	},
	LocaleInfo {
		code: "es",
		name: "Spanish",
		native_name: "Español",
	},
	LocaleInfo {
		code: "it",
		name: "Italian",
		native_name: "Italiano",
	},
	LocaleInfo {
		code: "nl",
		name: "Dutch",
		native_name: "Nederlands",
	},
	LocaleInfo {
		code: "pl",
		name: "Polish",
		native_name: "Polski",
	},
	LocaleInfo {
		code: "pt-BR",
		name: "Portuguese (Brazil)",
		native_name: "Português (Brasil)",
	},
	LocaleInfo {
		code: "ja",
		name: "Japanese",
		native_name: "日本語",
	},
	LocaleInfo {
		code: "ko",
		name: "Korean",
		native_name: "한국어",
	},
	LocaleInfo {
		code: "zh",
		name: "Chinese",
		native_name: "中文",
	},
];

/// Get metadata for a built-in language.
///
/// Returns `None` if the code is not in the built-in table.
pub fn locale_info(code: &str) -> Option<&'static LocaleInfo> {
	LOCALES.iter().find(|l| l.code == code)
}

/// Get all built-in languages.
pub fn available_locales() -> &'static [LocaleInfo] {
	LOCALES
}

/// Check whether `tag` is a well-formed BCP-47 language identifier.
///
/// Tags must use `-` as the subtag separator. Empty strings, `_` separators
/// and anything [`LanguageIdentifier`] refuses to parse are rejected.
pub fn is_valid_language_tag(tag: &str) -> bool {
	if tag.is_empty() || tag.contains('_') {
		return false;
	}

	tag.parse::<LanguageIdentifier>().is_ok()
}

/// The closed set of language codes a deployment serves.
///
/// Codes are kept verbatim, including ones that are not valid tags, so
/// a hand-edited configuration mistake is caught by the matcher's validity
/// filter instead of being silently rewritten here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLanguages {
	codes: Vec<String>,
}

impl SupportedLanguages {
	pub fn new<I, S>(codes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			codes: codes.into_iter().map(Into::into).collect(),
		}
	}

	/// Built-in language table.
	pub fn builtin() -> Self {
		Self::new(LOCALES.iter().map(|l| l.code))
	}

	/// Find the configured code equal to `code` (case-sensitive).
	pub fn find(&self, code: &str) -> Option<&str> {
		self.codes.iter().map(String::as_str).find(|c| *c == code)
	}

	pub fn contains(&self, code: &str) -> bool {
		self.find(code).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.codes.iter().map(String::as_str)
	}

	/// Configured codes that fail [`is_valid_language_tag`].
	pub fn invalid_codes(&self) -> impl Iterator<Item = &str> {
		self.iter().filter(|c| !is_valid_language_tag(c))
	}

	pub fn len(&self) -> usize {
		self.codes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.codes.is_empty()
	}
}

impl Default for SupportedLanguages {
	fn default() -> Self {
		Self::builtin()
	}
}
