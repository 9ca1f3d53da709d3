// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io::Write;

use anyhow::{Context, Result};
use docsign_common_i18n::{I18n, I18nConfig, LocaleData, LocaleMatcher};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResolveReport {
	pub lang: String,
	pub fallback: bool,
	pub locales: Vec<String>,
}

impl From<LocaleData> for ResolveReport {
	fn from(data: LocaleData) -> Self {
		let fallback = data.lang.is_fallback();
		Self {
			lang: data.lang.into_string(),
			fallback,
			locales: data.locales,
		}
	}
}

/// Parse a `name=value` placeholder argument.
pub fn parse_var(arg: &str) -> Result<(String, String), String> {
	let (name, value) = arg
		.split_once('=')
		.ok_or_else(|| format!("expected name=value, got '{arg}'"))?;
	let name = name.trim();
	if name.is_empty() {
		return Err(format!("empty placeholder name in '{arg}'"));
	}
	Ok((name.to_string(), value.to_string()))
}

pub fn resolve(matcher: &LocaleMatcher, header: &str, json: bool, out: &mut impl Write) -> Result<()> {
	let report = ResolveReport::from(matcher.extract_locale_data(Some(header)));

	if json {
		serde_json::to_writer_pretty(&mut *out, &report)?;
		writeln!(out)?;
	} else {
		let how = if report.fallback { "fallback" } else { "matched" };
		writeln!(out, "{} ({how})", report.lang)?;
		writeln!(out, "preferences: {}", report.locales.join(", "))?;
	}

	Ok(())
}

pub enum Target<'a> {
	Header(&'a str),
	Locale(&'a str),
	Source,
}

pub async fn translate(
	i18n: &I18n,
	key: &str,
	target: Target<'_>,
	vars: &[(String, String)],
	out: &mut impl Write,
) -> Result<()> {
	let active = match target {
		Target::Header(header) => i18n.activate_for_header(Some(header)).await?.1,
		Target::Locale(locale) => i18n.dynamic_activate(locale).await?,
		Target::Source => i18n.dynamic_activate(i18n.matcher().source_lang()).await?,
	};

	if !active.bundle().contains(key) {
		warn!(locale = active.locale(), key = %key, "no translation for key, printing it unchanged");
	}

	let args: Vec<(&str, &str)> = vars
		.iter()
		.map(|(name, value)| (name.as_str(), value.as_str()))
		.collect();
	writeln!(out, "{}", active.t_fmt(key, &args))?;

	Ok(())
}

/// Load every supported locale's bundle; returns how many failed.
pub async fn check(config: &I18nConfig, out: &mut impl Write) -> Result<usize> {
	let loader = config.loader();
	let mut failures = 0;

	for locale in config.supported_langs.iter() {
		match loader.load_messages(locale, config.mode).await {
			Ok(_) => writeln!(out, "ok      {locale}")?,
			Err(e) => {
				failures += 1;
				writeln!(out, "FAILED  {locale}: {e}")?;
			}
		}
	}

	info!(
		mode = %config.mode,
		checked = config.supported_langs.len(),
		failures,
		"translation check finished"
	);

	Ok(failures)
}

/// Load and validate configuration, attaching the path on failure.
pub fn load_config(
	config_path: &std::path::Path,
	overrides: docsign_common_i18n::I18nConfigLayer,
) -> Result<I18nConfig> {
	use docsign_common_i18n::{
		load_config_from_sources, ConfigSource, DefaultsSource, EnvSource, OverridesSource,
		TomlSource,
	};

	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
		Box::new(OverridesSource(overrides)),
	];

	load_config_from_sources(sources)
		.with_context(|| format!("loading i18n configuration ({})", config_path.display()))
}
