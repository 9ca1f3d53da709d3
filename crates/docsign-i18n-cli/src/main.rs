// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod commands;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use docsign_common_i18n::{I18n, I18nConfigLayer, RuntimeMode, DEFAULT_CONFIG_PATH};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::Target;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum LogFormat {
	#[default]
	Text,
	Json,
}

#[derive(Parser, Debug)]
#[command(name = "docsign-i18n", version, about, long_about = None)]
struct Args {
	/// Configuration file
	#[arg(long, global = true, env = "DOCSIGN_I18N_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
	config: PathBuf,

	/// Bundle format to load (development or production)
	#[arg(long, global = true)]
	mode: Option<RuntimeMode>,

	/// Directory holding `{locale}/web.{po,mo}`
	#[arg(long, global = true)]
	translations_dir: Option<PathBuf>,

	#[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
	log_format: LogFormat,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Resolve an Accept-Language header against the supported languages
	Resolve {
		header: String,

		#[arg(long)]
		json: bool,
	},

	/// Translate a message id for a header or locale
	Translate {
		key: String,

		#[arg(long, conflicts_with = "locale")]
		header: Option<String>,

		#[arg(long)]
		locale: Option<String>,

		#[arg(long = "var", value_name = "NAME=VALUE", value_parser = commands::parse_var)]
		vars: Vec<(String, String)>,
	},

	/// Load the bundle of every supported language
	Check,
}

fn init_tracing(format: LogFormat) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docsign=info,warn"));

	match format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Text => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();
	init_tracing(args.log_format);

	let overrides = I18nConfigLayer {
		mode: args.mode,
		translations_dir: args.translations_dir.clone(),
		..Default::default()
	};
	let config = commands::load_config(&args.config, overrides)?;

	let mut stdout = std::io::stdout().lock();

	match args.command {
		Command::Resolve { header, json } => {
			commands::resolve(&config.matcher(), &header, json, &mut stdout)?;
		}
		Command::Translate {
			key,
			header,
			locale,
			vars,
		} => {
			let target = match (header.as_deref(), locale.as_deref()) {
				(Some(header), _) => Target::Header(header),
				(None, Some(locale)) => Target::Locale(locale),
				(None, None) => Target::Source,
			};
			let i18n = I18n::from_config(&config);
			commands::translate(&i18n, &key, target, &vars, &mut stdout).await?;
		}
		Command::Check => {
			let failures = commands::check(&config, &mut stdout).await?;
			if failures > 0 {
				bail!("{failures} locale(s) failed to load");
			}
		}
	}

	Ok(())
}
