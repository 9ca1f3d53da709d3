// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `Accept-Language` matching against the supported language set.
//!
//! Preferences are evaluated strictly left-to-right. Quality values are
//! stripped and ignored, so the first token that matches a supported code
//! wins even when a later token carries a higher `q` weight.

use std::fmt;

use http::header::ACCEPT_LANGUAGE;
use http::HeaderMap;
use tracing::{debug, warn};

use crate::locale::{is_valid_language_tag, SupportedLanguages, SOURCE_LOCALE};

/// Outcome of resolving a preference list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedLocale {
	/// A supported code matched one of the client's preferences.
	Supported(String),
	/// Nothing matched; the configured source language is used.
	Fallback(String),
}

impl ResolvedLocale {
	pub fn as_str(&self) -> &str {
		match self {
			ResolvedLocale::Supported(code) | ResolvedLocale::Fallback(code) => code,
		}
	}

	pub fn is_fallback(&self) -> bool {
		matches!(self, ResolvedLocale::Fallback(_))
	}

	pub fn into_string(self) -> String {
		match self {
			ResolvedLocale::Supported(code) | ResolvedLocale::Fallback(code) => code,
		}
	}
}

impl fmt::Display for ResolvedLocale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Result of [`LocaleMatcher::extract_locale_data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleData {
	pub lang: ResolvedLocale,
	/// The client's preference list, unfiltered.
	pub locales: Vec<String>,
}

/// Result of [`LocaleMatcher::extract_locale_data_from_header`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLocaleData<'a> {
	pub lang: Option<&'a str>,
	pub locales: Vec<String>,
}

/// Read the raw `Accept-Language` value from request headers.
///
/// Values that are not visible ASCII are treated as absent.
pub fn accept_language(headers: &HeaderMap) -> Option<&str> {
	headers
		.get(ACCEPT_LANGUAGE)
		.and_then(|value| value.to_str().ok())
}

/// Split a header value into its trimmed preference tokens, in order.
///
/// Empty tokens are dropped; duplicates are kept.
pub fn preference_list(header: &str) -> Vec<String> {
	header
		.split(',')
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(str::to_string)
		.collect()
}

/// Matches client language preferences against a fixed supported set.
#[derive(Debug, Clone)]
pub struct LocaleMatcher {
	supported: SupportedLanguages,
	source_lang: String,
}

impl Default for LocaleMatcher {
	fn default() -> Self {
		Self::new(SupportedLanguages::builtin(), SOURCE_LOCALE)
	}
}

impl LocaleMatcher {
	pub fn new(supported: SupportedLanguages, source_lang: impl Into<String>) -> Self {
		Self {
			supported,
			source_lang: source_lang.into(),
		}
	}

	pub fn supported(&self) -> &SupportedLanguages {
		&self.supported
	}

	pub fn source_lang(&self) -> &str {
		&self.source_lang
	}

	/// Match a single preference token such as `"pt-BR;q=0.9"`.
	///
	/// Tries the whole tag first, then its base language (`"pt"`). Returns
	/// `None` when neither is supported; fallback is the caller's decision.
	pub fn parse_single_locale(&self, raw: &str) -> Option<&str> {
		let clean = raw.split(';').next().unwrap_or(raw).trim();

		if let Some(exact) = self.supported.find(clean) {
			return Some(exact);
		}

		let base = clean.split('-').next().unwrap_or(clean);
		self.supported.find(base)
	}

	/// Return the first supported preference, without validity filtering or
	/// fallback.
	pub fn extract_locale_data_from_header(&self, header: Option<&str>) -> HeaderLocaleData<'_> {
		let locales = preference_list(header.unwrap_or_default());
		let lang = locales
			.iter()
			.find_map(|locale| self.parse_single_locale(locale));

		HeaderLocaleData { lang, locales }
	}

	/// Resolve a header to a supported language, falling back to the source
	/// language. Never fails.
	pub fn extract_locale_data(&self, header: Option<&str>) -> LocaleData {
		let locales = preference_list(header.unwrap_or_default());

		let resolved = locales
			.iter()
			.filter_map(|locale| self.parse_single_locale(locale))
			.find(|candidate| {
				let valid = is_valid_language_tag(candidate);
				if !valid {
					warn!(
						candidate = %candidate,
						"supported language code is not a valid language tag, skipping"
					);
				}
				valid
			});

		let lang = match resolved {
			Some(code) => ResolvedLocale::Supported(code.to_string()),
			None => ResolvedLocale::Fallback(self.source_lang.clone()),
		};

		debug!(
			header = header.unwrap_or_default(),
			lang = %lang,
			fallback = lang.is_fallback(),
			"resolved request locale"
		);

		LocaleData { lang, locales }
	}

	/// [`Self::extract_locale_data`] reading `Accept-Language` from headers.
	pub fn extract_locale_data_from_headers(&self, headers: &HeaderMap) -> LocaleData {
		self.extract_locale_data(accept_language(headers))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::HeaderValue;
	use proptest::prelude::*;

	fn matcher(codes: &[&str], source: &str) -> LocaleMatcher {
		LocaleMatcher::new(SupportedLanguages::new(codes.iter().copied()), source)
	}

	#[test]
	fn test_empty_header_falls_back() {
		let m = matcher(&["pt", "en"], "en");
		let data = m.extract_locale_data(Some(""));
		assert_eq!(data.lang, ResolvedLocale::Fallback("en".to_string()));
		assert!(data.locales.is_empty());
	}

	#[test]
	fn test_missing_header_falls_back() {
		let m = matcher(&["pt", "en"], "en");
		let data = m.extract_locale_data(None);
		assert!(data.lang.is_fallback());
		assert_eq!(data.lang.as_str(), "en");
		assert!(data.locales.is_empty());
	}

	#[test]
	fn test_base_language_fallback() {
		let m = matcher(&["pt", "en"], "en");
		let data = m.extract_locale_data(Some("pt-BR;q=0.9"));
		assert_eq!(data.lang, ResolvedLocale::Supported("pt".to_string()));
		assert_eq!(data.locales, vec!["pt-BR;q=0.9"]);
	}

	#[test]
	fn test_first_match_wins_skipping_unsupported() {
		let m = matcher(&["pt", "en"], "en");
		let data = m.extract_locale_data(Some("fr,pt-BR"));
		assert_eq!(data.lang.as_str(), "pt");
		assert_eq!(data.locales, vec!["fr", "pt-BR"]);
	}

	#[test]
	fn test_exact_match_on_first_token() {
		let m = matcher(&["en-US", "pt"], "pt");
		let data = m.extract_locale_data(Some("en-US,pt"));
		assert_eq!(data.lang.as_str(), "en-US");
	}

	#[test]
	fn test_position_beats_exactness() {
		let m = matcher(&["pt", "en-GB"], "en-GB");
		// an earlier base-language match beats a later exact match
		let data = m.extract_locale_data(Some("en-US, pt-PT, en-GB"));
		assert_eq!(data.lang, ResolvedLocale::Supported("pt".to_string()));
	}

	#[test]
	fn test_quality_values_are_ignored() {
		let m = matcher(&["en", "de"], "de");
		assert_eq!(m.parse_single_locale("en;q=0.3"), m.parse_single_locale("en"));
		let data = m.extract_locale_data(Some("en;q=0.1, de;q=1.0"));
		assert_eq!(data.lang.as_str(), "en");
	}

	#[test]
	fn test_parse_single_locale_exact_before_base() {
		let m = matcher(&["pt", "pt-BR"], "pt");
		assert_eq!(m.parse_single_locale("pt-BR"), Some("pt-BR"));
		assert_eq!(m.parse_single_locale("pt-PT"), Some("pt"));
		assert_eq!(m.parse_single_locale(" pt-BR ;q=0.8"), Some("pt-BR"));
	}

	#[test]
	fn test_parse_single_locale_no_match() {
		let m = matcher(&["en"], "en");
		assert_eq!(m.parse_single_locale("fr-CA"), None);
		assert_eq!(m.parse_single_locale("*"), None);
		assert_eq!(m.parse_single_locale(";q=1"), None);
		assert_eq!(m.parse_single_locale("EN"), None);
	}

	#[test]
	fn test_all_malformed_falls_back() {
		let m = matcher(&["en", "de"], "en");
		let data = m.extract_locale_data(Some(";;;, ---, q=0.5"));
		assert!(data.lang.is_fallback());
		assert_eq!(data.locales, vec![";;;", "---", "q=0.5"]);
	}

	#[test]
	fn test_duplicates_and_empty_tokens() {
		let m = matcher(&["en"], "en");
		let data = m.extract_locale_data(Some("fr, fr,, en,"));
		assert_eq!(data.locales, vec!["fr", "fr", "en"]);
		assert_eq!(data.lang, ResolvedLocale::Supported("en".to_string()));
	}

	#[test]
	fn test_invalid_supported_code_is_filtered() {
		let m = matcher(&["en_GB", "de"], "en");
		let data = m.extract_locale_data(Some("en_GB, de"));
		assert_eq!(data.lang.as_str(), "de");
		assert_eq!(data.locales, vec!["en_GB", "de"]);
	}

	#[test]
	fn test_invalid_supported_code_only_candidate_falls_back() {
		let m = matcher(&["en_GB", "de"], "de");
		let data = m.extract_locale_data(Some("en_GB"));
		assert_eq!(data.lang, ResolvedLocale::Fallback("de".to_string()));
	}

	#[test]
	fn test_header_variant_does_not_filter_invalid_codes() {
		let m = matcher(&["en_GB", "de"], "de");
		let data = m.extract_locale_data_from_header(Some("en_GB, de"));
		assert_eq!(data.lang, Some("en_GB"));
	}

	#[test]
	fn test_header_variant_no_match_keeps_list() {
		let m = matcher(&["en"], "en");
		let data = m.extract_locale_data_from_header(Some("fr-FR, es;q=0.5"));
		assert_eq!(data.lang, None);
		assert_eq!(data.locales, vec!["fr-FR", "es;q=0.5"]);
	}

	#[test]
	fn test_from_headers() {
		let m = matcher(&["en", "ja"], "en");
		let mut headers = HeaderMap::new();
		headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ja-JP,ja;q=0.9,en;q=0.8"));
		let data = m.extract_locale_data_from_headers(&headers);
		assert_eq!(data.lang.as_str(), "ja");
		assert_eq!(data.locales.len(), 3);

		let data = m.extract_locale_data_from_headers(&HeaderMap::new());
		assert!(data.lang.is_fallback());
	}

	#[test]
	fn test_default_matcher_uses_builtin_table() {
		let m = LocaleMatcher::default();
		assert_eq!(m.source_lang(), "en");
		assert_eq!(m.extract_locale_data(Some("pt-BR")).lang.as_str(), "pt-BR");
		assert_eq!(m.extract_locale_data(Some("zh-TW")).lang.as_str(), "zh");
		assert!(m.extract_locale_data(Some("pt-PT")).lang.is_fallback());
	}

	#[test]
	fn test_resolved_locale_display() {
		assert_eq!(ResolvedLocale::Supported("de".into()).to_string(), "de");
		assert_eq!(ResolvedLocale::Fallback("en".into()).into_string(), "en");
	}

	proptest! {
		/// Resolution always yields a supported code or the source language.
		#[test]
		fn resolution_is_total(header in ".{0,64}") {
			let m = matcher(&["en", "pt", "pt-BR", "de"], "en");
			let data = m.extract_locale_data(Some(header.as_str()));
			match &data.lang {
				ResolvedLocale::Supported(code) => prop_assert!(m.supported().contains(code)),
				ResolvedLocale::Fallback(code) => prop_assert_eq!(code.as_str(), "en"),
			}
		}

		/// Resolving the same header twice gives the same answer.
		#[test]
		fn resolution_is_idempotent(header in "[a-zA-Z;=,.0-9 -]{0,48}") {
			let m = matcher(&["en", "pt", "fr-CA"], "en");
			prop_assert_eq!(m.extract_locale_data(Some(header.as_str())), m.extract_locale_data(Some(header.as_str())));
		}

		/// A trailing quality value never changes the match.
		#[test]
		fn quality_suffix_is_ignored(tag in "[a-z]{2}(-[A-Z]{2})?", q in "[01]\\.[0-9]") {
			let m = matcher(&["en", "pt", "de"], "en");
			let weighted = format!("{tag};q={q}");
			prop_assert_eq!(m.parse_single_locale(&weighted), m.parse_single_locale(&tag));
		}
	}
}
