// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request activation of a message bundle.
//!
//! There is no process-wide "current locale". A request either carries an
//! [`ActiveMessages`] value explicitly or runs inside
//! [`ActiveMessages::scope`], which binds it to the current tokio task.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::bundle::{format_placeholders, MessageBundle};

tokio::task_local! {
	static ACTIVE_MESSAGES: ActiveMessages;
}

/// A locale and the bundle activated for it.
#[derive(Debug, Clone)]
pub struct ActiveMessages {
	locale: String,
	bundle: Arc<MessageBundle>,
}

impl ActiveMessages {
	pub fn activate(locale: impl Into<String>, bundle: Arc<MessageBundle>) -> Self {
		let locale = locale.into();
		debug!(locale = %locale, bundle_locale = bundle.locale(), "activating messages");
		Self { locale, bundle }
	}

	pub fn locale(&self) -> &str {
		&self.locale
	}

	pub fn bundle(&self) -> &MessageBundle {
		&self.bundle
	}

	pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
		self.bundle.translate(key)
	}

	pub fn t_fmt(&self, key: &str, args: &[(&str, &str)]) -> String {
		self.bundle.translate_fmt(key, args)
	}

	/// Render a literal or a translatable descriptor.
	pub fn render(&self, message: &Message) -> String {
		match message {
			Message::Literal(text) => text.clone(),
			Message::Descriptor { id, values } => {
				let args: Vec<(&str, &str)> = values
					.iter()
					.map(|(k, v)| (k.as_str(), v.as_str()))
					.collect();
				self.t_fmt(id, &args)
			}
		}
	}

	/// Run `fut` with these messages bound to the current task.
	pub async fn scope<F>(self, fut: F) -> F::Output
	where
		F: Future,
	{
		ACTIVE_MESSAGES.scope(self, fut).await
	}

	/// Messages bound by the enclosing [`ActiveMessages::scope`], if any.
	pub fn current() -> Option<ActiveMessages> {
		ACTIVE_MESSAGES.try_with(|active| active.clone()).ok()
	}
}

/// Translate `key` with the task's active messages, or return it unchanged
/// outside any scope.
pub fn t(key: &str) -> String {
	ACTIVE_MESSAGES
		.try_with(|active| active.t(key).to_string())
		.unwrap_or_else(|_| key.to_string())
}

/// [`t`] with `{name}` placeholder substitution.
pub fn t_fmt(key: &str, args: &[(&str, &str)]) -> String {
	ACTIVE_MESSAGES
		.try_with(|active| active.t_fmt(key, args))
		.unwrap_or_else(|_| format_placeholders(key, args))
}

/// Text that is either already final or still needs translating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
	Literal(String),
	Descriptor {
		id: String,
		values: Vec<(String, String)>,
	},
}

impl Message {
	pub fn literal(text: impl Into<String>) -> Self {
		Message::Literal(text.into())
	}

	pub fn descriptor(id: impl Into<String>) -> Self {
		Message::Descriptor {
			id: id.into(),
			values: Vec::new(),
		}
	}

	/// Add a placeholder value. Has no effect on literals.
	pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		if let Message::Descriptor { values, .. } = &mut self {
			values.push((name.into(), value.into()));
		}
		self
	}
}

impl From<&str> for Message {
	fn from(text: &str) -> Self {
		Message::literal(text)
	}
}

/// Holds the activation for one request or session.
///
/// Activating again replaces the previous bundle wholesale.
#[derive(Debug, Clone, Default)]
pub struct I18nSession {
	active: Option<ActiveMessages>,
}

impl I18nSession {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn activate(&mut self, locale: impl Into<String>, bundle: Arc<MessageBundle>) {
		self.active = Some(ActiveMessages::activate(locale, bundle));
	}

	pub fn active(&self) -> Option<&ActiveMessages> {
		self.active.as_ref()
	}

	pub fn locale(&self) -> Option<&str> {
		self.active.as_ref().map(ActiveMessages::locale)
	}

	pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
		match &self.active {
			Some(active) => active.t(key),
			None => key,
		}
	}
}
