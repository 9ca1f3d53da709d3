// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! On-demand loading of message bundles.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::bundle::MessageBundle;
use crate::error::LoadError;
use crate::locale::is_valid_language_tag;
use crate::resolver::BundleResolver;
use crate::source::{BundleSource, RuntimeMode};

/// Loads bundles through a [`BundleResolver`].
///
/// Loads are single-shot: a missing bundle is returned as
/// [`LoadError::NotFound`] and never replaced by an empty one or by another
/// locale's bundle. Choosing a fallback is up to the caller.
pub struct MessageLoader {
	resolver: Arc<dyn BundleResolver>,
	cache: Option<RwLock<HashMap<BundleSource, Arc<MessageBundle>>>>,
}

impl MessageLoader {
	pub fn new(resolver: Arc<dyn BundleResolver>) -> Self {
		Self {
			resolver,
			cache: None,
		}
	}

	/// Keep successfully loaded bundles so repeated loads skip the resolver.
	pub fn with_cache(mut self) -> Self {
		self.cache = Some(RwLock::new(HashMap::new()));
		self
	}

	pub fn is_cached(&self) -> bool {
		self.cache.is_some()
	}

	pub fn resolver(&self) -> &dyn BundleResolver {
		self.resolver.as_ref()
	}

	/// Load the bundle for `locale` in `mode`.
	pub async fn load_messages(
		&self,
		locale: &str,
		mode: RuntimeMode,
	) -> Result<Arc<MessageBundle>, LoadError> {
		if !is_valid_language_tag(locale) {
			warn!(locale = %locale, "refusing to load bundle for invalid locale tag");
			return Err(LoadError::InvalidLocale(locale.to_string()));
		}

		let source = BundleSource::new(locale, mode);

		if let Some(cache) = &self.cache {
			if let Some(bundle) = cache.read().get(&source) {
				debug!(source = %source, "message bundle served from cache");
				return Ok(Arc::clone(bundle));
			}
		}

		debug!(
			source = %source,
			resolver = self.resolver.name(),
			"loading message bundle"
		);

		let bundle = match self.resolver.resolve(&source).await {
			Ok(bundle) => Arc::new(bundle),
			Err(e) => {
				warn!(source = %source, error = %e, "failed to load message bundle");
				return Err(e);
			}
		};

		if let Some(cache) = &self.cache {
			let mut cache = cache.write();
			let entry = cache.entry(source.clone()).or_insert_with(|| Arc::clone(&bundle));
			info!(source = %source, "message bundle loaded");
			return Ok(Arc::clone(entry));
		}

		info!(source = %source, "message bundle loaded");
		Ok(bundle)
	}

	/// Drop every cached bundle. No-op without a cache.
	pub fn clear_cache(&self) {
		if let Some(cache) = &self.cache {
			cache.write().clear();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resolver::StaticBundleResolver;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct CountingResolver {
		inner: StaticBundleResolver,
		calls: AtomicUsize,
	}

	#[async_trait]
	impl BundleResolver for CountingResolver {
		fn name(&self) -> &'static str {
			"counting"
		}

		async fn resolve(&self, source: &BundleSource) -> Result<MessageBundle, LoadError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.inner.resolve(source).await
		}
	}

	fn counting() -> Arc<CountingResolver> {
		Arc::new(CountingResolver {
			inner: StaticBundleResolver::new().with_bundle(
				"de",
				RuntimeMode::Development,
				&b"msgid \"Sign\"\nmsgstr \"Unterschreiben\"\n"[..],
			),
			calls: AtomicUsize::new(0),
		})
	}

	#[tokio::test]
	async fn test_load_messages() {
		let loader = MessageLoader::new(counting());
		let bundle = loader
			.load_messages("de", RuntimeMode::Development)
			.await
			.unwrap();
		assert_eq!(bundle.translate("Sign"), "Unterschreiben");
		assert_eq!(bundle.mode(), RuntimeMode::Development);
	}

	#[tokio::test]
	async fn test_missing_bundle_is_an_error() {
		let loader = MessageLoader::new(counting());
		let err = loader
			.load_messages("fr", RuntimeMode::Development)
			.await
			.unwrap_err();
		assert!(err.is_not_found());
	}

	#[tokio::test]
	async fn test_invalid_locale_never_reaches_resolver() {
		let resolver = counting();
		let loader = MessageLoader::new(resolver.clone());
		let err = loader
			.load_messages("../../etc/passwd", RuntimeMode::Development)
			.await
			.unwrap_err();
		assert!(matches!(err, LoadError::InvalidLocale(_)));
		assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn test_uncached_loader_resolves_every_time() {
		let resolver = counting();
		let loader = MessageLoader::new(resolver.clone());
		let a = loader.load_messages("de", RuntimeMode::Development).await.unwrap();
		let b = loader.load_messages("de", RuntimeMode::Development).await.unwrap();
		assert!(!Arc::ptr_eq(&a, &b));
		assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn test_cached_loader_reuses_bundle() {
		let resolver = counting();
		let loader = MessageLoader::new(resolver.clone()).with_cache();
		assert!(loader.is_cached());
		let a = loader.load_messages("de", RuntimeMode::Development).await.unwrap();
		let b = loader.load_messages("de", RuntimeMode::Development).await.unwrap();
		assert!(Arc::ptr_eq(&a, &b));
		assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);

		loader.clear_cache();
		loader.load_messages("de", RuntimeMode::Development).await.unwrap();
		assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn test_cache_does_not_store_failures() {
		let resolver = counting();
		let loader = MessageLoader::new(resolver.clone()).with_cache();
		assert!(loader.load_messages("fr", RuntimeMode::Development).await.is_err());
		assert!(loader.load_messages("fr", RuntimeMode::Development).await.is_err());
		assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
	}
}
