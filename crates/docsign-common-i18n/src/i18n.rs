// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolve, load and activate in one call.

use http::HeaderMap;
use tracing::instrument;

use crate::config::I18nConfig;
use crate::context::ActiveMessages;
use crate::error::LoadError;
use crate::loader::MessageLoader;
use crate::matcher::{accept_language, LocaleData, LocaleMatcher};
use crate::source::RuntimeMode;

/// Ties a [`LocaleMatcher`] and a [`MessageLoader`] to one runtime mode.
pub struct I18n {
	matcher: LocaleMatcher,
	loader: MessageLoader,
	mode: RuntimeMode,
}

impl I18n {
	pub fn new(matcher: LocaleMatcher, loader: MessageLoader, mode: RuntimeMode) -> Self {
		Self {
			matcher,
			loader,
			mode,
		}
	}

	pub fn from_config(config: &I18nConfig) -> Self {
		Self::new(config.matcher(), config.loader(), config.mode)
	}

	pub fn matcher(&self) -> &LocaleMatcher {
		&self.matcher
	}

	pub fn loader(&self) -> &MessageLoader {
		&self.loader
	}

	pub fn mode(&self) -> RuntimeMode {
		self.mode
	}

	/// Load and activate the bundle for a known locale.
	#[instrument(skip(self), fields(mode = %self.mode))]
	pub async fn dynamic_activate(&self, locale: &str) -> Result<ActiveMessages, LoadError> {
		let bundle = self.loader.load_messages(locale, self.mode).await?;
		Ok(ActiveMessages::activate(locale, bundle))
	}

	/// Resolve the request's locale from `Accept-Language`, then load and
	/// activate its bundle.
	///
	/// Resolution itself never fails; a missing bundle for the resolved
	/// locale is returned as an error.
	pub async fn activate_for_header(
		&self,
		header: Option<&str>,
	) -> Result<(LocaleData, ActiveMessages), LoadError> {
		let data = self.matcher.extract_locale_data(header);
		let active = self.dynamic_activate(data.lang.as_str()).await?;
		Ok((data, active))
	}

	pub async fn activate_for_headers(
		&self,
		headers: &HeaderMap,
	) -> Result<(LocaleData, ActiveMessages), LoadError> {
		self.activate_for_header(accept_language(headers)).await
	}
}
