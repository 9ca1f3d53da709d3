// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Message bundles parsed from gettext sources or compiled catalogs.

use std::collections::HashMap;
use std::fmt;

use gettext::Catalog;

use crate::error::LoadError;
use crate::source::{BundleSource, RuntimeMode};

/// Separator gettext uses between a message context and its msgid.
const CONTEXT_SEPARATOR: char = '\u{4}';

enum Messages {
	Source(HashMap<String, String>),
	Compiled(Catalog),
}

/// The translated strings for one locale in one [`RuntimeMode`].
pub struct MessageBundle {
	locale: String,
	mode: RuntimeMode,
	messages: Messages,
}

impl fmt::Debug for MessageBundle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let kind = match &self.messages {
			Messages::Source(map) => format!("source({} entries)", map.len()),
			Messages::Compiled(_) => "compiled".to_string(),
		};
		f.debug_struct("MessageBundle")
			.field("locale", &self.locale)
			.field("mode", &self.mode)
			.field("messages", &kind)
			.finish()
	}
}

impl MessageBundle {
	/// Build a bundle from an already-parsed key → text table.
	pub fn from_map(
		locale: impl Into<String>,
		mode: RuntimeMode,
		messages: HashMap<String, String>,
	) -> Self {
		Self {
			locale: locale.into(),
			mode,
			messages: Messages::Source(messages),
		}
	}

	/// Parse raw bundle bytes in the format `source.mode()` selects.
	pub fn parse(source: &BundleSource, bytes: &[u8]) -> Result<Self, LoadError> {
		let messages = match source.mode() {
			RuntimeMode::Development => {
				let text = std::str::from_utf8(bytes).map_err(|e| LoadError::Parse {
					source_id: source.id(),
					message: format!("not valid UTF-8: {e}"),
				})?;
				Messages::Source(parse_po(text).map_err(|message| LoadError::Parse {
					source_id: source.id(),
					message,
				})?)
			}
			RuntimeMode::Production => {
				let catalog = Catalog::parse(bytes).map_err(|e| LoadError::Parse {
					source_id: source.id(),
					message: e.to_string(),
				})?;
				Messages::Compiled(catalog)
			}
		};

		Ok(Self {
			locale: source.locale().to_string(),
			mode: source.mode(),
			messages,
		})
	}

	pub fn locale(&self) -> &str {
		&self.locale
	}

	pub fn mode(&self) -> RuntimeMode {
		self.mode
	}

	/// Look up the translation for `key`.
	///
	/// Returns `None` for keys without a translation. For compiled catalogs
	/// a translation identical to its key is indistinguishable from a
	/// missing one and also yields `None`.
	pub fn get<'a>(&'a self, key: &'a str) -> Option<&'a str> {
		match &self.messages {
			Messages::Source(map) => map.get(key).map(String::as_str),
			Messages::Compiled(catalog) => {
				let translated = catalog.gettext(key);
				(translated != key).then_some(translated)
			}
		}
	}

	/// Look up a translation declared with `msgctxt`.
	pub fn get_in_context<'a>(&'a self, context: &'a str, key: &'a str) -> Option<&'a str> {
		match &self.messages {
			Messages::Source(map) => map
				.get(&format!("{context}{CONTEXT_SEPARATOR}{key}"))
				.map(String::as_str),
			Messages::Compiled(catalog) => {
				let translated = catalog.pgettext(context, key);
				(translated != key).then_some(translated)
			}
		}
	}

	pub fn contains(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	/// Translate `key`, falling back to the key itself.
	pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
		self.get(key).unwrap_or(key)
	}

	/// Translate with `{name}` placeholder substitution.
	pub fn translate_fmt(&self, key: &str, args: &[(&str, &str)]) -> String {
		format_placeholders(self.translate(key), args)
	}
}

/// Replace `{name}` placeholders with their values.
pub(crate) fn format_placeholders(template: &str, args: &[(&str, &str)]) -> String {
	let mut result = template.to_string();

	for (name, value) in args {
		let placeholder = format!("{{{name}}}");
		result = result.replace(&placeholder, value);
	}

	result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
	Context,
	Id,
	IdPlural,
	Str(usize),
}

#[derive(Default)]
struct PoEntry {
	context: Option<String>,
	id: Option<String>,
	strs: Vec<(usize, String)>,
	fuzzy: bool,
	current: Option<Field>,
}

impl PoEntry {
	fn has_strs(&self) -> bool {
		!self.strs.is_empty()
	}

	fn push(&mut self, field: Field, value: String) {
		match field {
			Field::Context => self.context = Some(value),
			Field::Id => self.id = Some(value),
			Field::IdPlural => {}
			Field::Str(n) => self.strs.push((n, value)),
		}
		self.current = Some(field);
	}

	fn append(&mut self, value: &str) -> bool {
		let target = match self.current {
			Some(Field::Context) => self.context.as_mut(),
			Some(Field::Id) => self.id.as_mut(),
			Some(Field::IdPlural) => return true,
			Some(Field::Str(_)) => self.strs.last_mut().map(|(_, s)| s),
			None => None,
		};

		match target {
			Some(s) => {
				s.push_str(value);
				true
			}
			None => false,
		}
	}

	/// Key and text for a translated entry; `None` for the header, fuzzy
	/// entries and untranslated ones.
	fn finish(self) -> Option<(String, String)> {
		if self.fuzzy {
			return None;
		}
		let id = self.id.filter(|id| !id.is_empty())?;
		let text = self
			.strs
			.into_iter()
			.find(|(n, _)| *n == 0)
			.map(|(_, s)| s)
			.filter(|s| !s.is_empty())?;

		let key = match self.context {
			Some(ctx) => format!("{ctx}{CONTEXT_SEPARATOR}{id}"),
			None => id,
		};
		Some((key, text))
	}
}

/// Parse gettext PO source into a key → translation table.
///
/// Errors carry the 1-based line number.
fn parse_po(text: &str) -> Result<HashMap<String, String>, String> {
	let mut messages = HashMap::new();
	let mut entry = PoEntry::default();

	let mut flush = |entry: &mut PoEntry| {
		if let Some((key, value)) = std::mem::take(entry).finish() {
			messages.insert(key, value);
		}
	};

	for (index, raw) in text.lines().enumerate() {
		let line_no = index + 1;
		let line = raw.trim();

		if line.is_empty() {
			flush(&mut entry);
			continue;
		}

		if let Some(comment) = line.strip_prefix('#') {
			if entry.has_strs() {
				flush(&mut entry);
			}
			if let Some(flags) = comment.strip_prefix(',') {
				if flags.split(',').any(|f| f.trim() == "fuzzy") {
					entry.fuzzy = true;
				}
			}
			continue;
		}

		if line.starts_with('"') {
			let value = unquote(line).map_err(|e| format!("line {line_no}: {e}"))?;
			if !entry.append(&value) {
				return Err(format!("line {line_no}: string continuation without a keyword"));
			}
			continue;
		}

		let (keyword, rest) = line
			.split_once(char::is_whitespace)
			.ok_or_else(|| format!("line {line_no}: unrecognised line {line:?}"))?;
		let value = unquote(rest.trim()).map_err(|e| format!("line {line_no}: {e}"))?;

		let field = match keyword {
			"msgctxt" => Field::Context,
			"msgid" => Field::Id,
			"msgid_plural" => Field::IdPlural,
			"msgstr" => Field::Str(0),
			other => {
				let index = other
					.strip_prefix("msgstr[")
					.and_then(|s| s.strip_suffix(']'))
					.and_then(|n| n.parse::<usize>().ok())
					.ok_or_else(|| format!("line {line_no}: unknown keyword {other:?}"))?;
				Field::Str(index)
			}
		};

		if matches!(field, Field::Context | Field::Id) && entry.has_strs() {
			flush(&mut entry);
		}
		if field == Field::Context && entry.id.is_some() {
			return Err(format!("line {line_no}: msgctxt after msgid"));
		}

		entry.push(field, value);
	}

	flush(&mut entry);
	Ok(messages)
}

/// Strip the surrounding quotes from a PO string literal and resolve escapes.
fn unquote(literal: &str) -> Result<String, String> {
	let inner = literal
		.strip_prefix('"')
		.and_then(|s| s.strip_suffix('"'))
		.ok_or_else(|| format!("expected a quoted string, found {literal:?}"))?;

	let mut out = String::with_capacity(inner.len());
	let mut chars = inner.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}
		match chars.next() {
			Some('n') => out.push('\n'),
			Some('t') => out.push('\t'),
			Some('r') => out.push('\r'),
			Some('"') => out.push('"'),
			Some('\\') => out.push('\\'),
			Some(other) => {
				out.push('\\');
				out.push(other);
			}
			None => return Err("dangling escape at end of string".to_string()),
		}
	}
	Ok(out)
}
