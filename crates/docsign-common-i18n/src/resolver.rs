// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pluggable lookup of message bundles by [`BundleSource`].

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::bundle::MessageBundle;
use crate::error::LoadError;
use crate::source::{BundleSource, RuntimeMode};

/// Resolves a bundle source to a parsed bundle.
///
/// Implementations must return [`LoadError::NotFound`] when the source does
/// not exist rather than an empty bundle.
#[async_trait]
pub trait BundleResolver: Send + Sync {
	fn name(&self) -> &'static str;

	async fn resolve(&self, source: &BundleSource) -> Result<MessageBundle, LoadError>;
}

/// Reads bundles from `{root}/{locale}/web.{po,mo}`.
#[derive(Debug, Clone)]
pub struct FsBundleResolver {
	root: PathBuf,
}

impl FsBundleResolver {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn path_for(&self, source: &BundleSource) -> PathBuf {
		self.root.join(source.id())
	}
}

#[async_trait]
impl BundleResolver for FsBundleResolver {
	fn name(&self) -> &'static str {
		"filesystem"
	}

	async fn resolve(&self, source: &BundleSource) -> Result<MessageBundle, LoadError> {
		let path = self.path_for(source);

		let bytes = match tokio::fs::read(&path).await {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				debug!(path = %path.display(), "message bundle file not found");
				return Err(LoadError::NotFound {
					locale: source.locale().to_string(),
					source_id: source.id(),
				});
			}
			Err(e) => {
				return Err(LoadError::Io {
					source_id: source.id(),
					source: e,
				})
			}
		};

		trace!(path = %path.display(), bytes = bytes.len(), "read message bundle");
		MessageBundle::parse(source, &bytes)
	}
}

/// Serves bundles from an in-memory table keyed by source id.
///
/// Suited to bundles embedded with `include_bytes!` and to tests.
#[derive(Debug, Clone, Default)]
pub struct StaticBundleResolver {
	entries: HashMap<String, Cow<'static, [u8]>>,
}

impl StaticBundleResolver {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register raw bundle bytes for `(locale, mode)`.
	pub fn with_bundle(
		mut self,
		locale: &str,
		mode: RuntimeMode,
		bytes: impl Into<Cow<'static, [u8]>>,
	) -> Self {
		self.insert(locale, mode, bytes);
		self
	}

	pub fn insert(&mut self, locale: &str, mode: RuntimeMode, bytes: impl Into<Cow<'static, [u8]>>) {
		let id = BundleSource::new(locale, mode).id();
		self.entries.insert(id, bytes.into());
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[async_trait]
impl BundleResolver for StaticBundleResolver {
	fn name(&self) -> &'static str {
		"static"
	}

	async fn resolve(&self, source: &BundleSource) -> Result<MessageBundle, LoadError> {
		let id = source.id();
		let bytes = self.entries.get(&id).ok_or_else(|| LoadError::NotFound {
			locale: source.locale().to_string(),
			source_id: id.clone(),
		})?;

		MessageBundle::parse(source, bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const DE_PO: &str = "msgid \"Documents\"\nmsgstr \"Dokumente\"\n";

	#[tokio::test]
	async fn test_static_resolver_hit() {
		let resolver =
			StaticBundleResolver::new().with_bundle("de", RuntimeMode::Development, DE_PO.as_bytes());
		let source = BundleSource::new("de", RuntimeMode::Development);
		let bundle = resolver.resolve(&source).await.unwrap();
		assert_eq!(bundle.get("Documents"), Some("Dokumente"));
		assert_eq!(resolver.len(), 1);
	}

	#[tokio::test]
	async fn test_static_resolver_mode_is_part_of_the_key() {
		let resolver =
			StaticBundleResolver::new().with_bundle("de", RuntimeMode::Development, DE_PO.as_bytes());
		let source = BundleSource::new("de", RuntimeMode::Production);
		let err = resolver.resolve(&source).await.unwrap_err();
		assert!(err.is_not_found());
	}

	#[tokio::test]
	async fn test_fs_resolver_reads_locale_directory() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::create_dir_all(dir.path().join("de")).unwrap();
		std::fs::write(dir.path().join("de/web.po"), DE_PO).unwrap();

		let resolver = FsBundleResolver::new(dir.path());
		let source = BundleSource::new("de", RuntimeMode::Development);
		assert_eq!(resolver.path_for(&source), dir.path().join("de/web.po"));

		let bundle = resolver.resolve(&source).await.unwrap();
		assert_eq!(bundle.locale(), "de");
		assert_eq!(bundle.translate("Documents"), "Dokumente");
	}

	#[tokio::test]
	async fn test_fs_resolver_missing_file_is_not_found() {
		let dir = tempfile::tempdir().unwrap();
		let resolver = FsBundleResolver::new(dir.path());
		let source = BundleSource::new("fr", RuntimeMode::Development);
		match resolver.resolve(&source).await.unwrap_err() {
			LoadError::NotFound { locale, source_id } => {
				assert_eq!(locale, "fr");
				assert_eq!(source_id, "fr/web.po");
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn test_fs_resolver_directory_instead_of_file_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::create_dir_all(dir.path().join("de/web.po")).unwrap();
		let resolver = FsBundleResolver::new(dir.path());
		let source = BundleSource::new("de", RuntimeMode::Development);
		let err = resolver.resolve(&source).await.unwrap_err();
		assert!(matches!(err, LoadError::Io { .. }), "{err:?}");
	}
}
