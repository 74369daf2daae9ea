// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Description templating.
//!
//! Descriptions may reference the subject, causer and properties of an activity
//! with `:subject.<path>`, `:causer.<path>` and `:properties.<path>` tokens. A
//! token is a `:` followed by ASCII letters, digits, `.`, `_` or `-`, never
//! ending in `.` so that sentence punctuation is not swallowed. Tokens that do
//! not resolve are left exactly as written.

use serde_json::Value;

use crate::entity::Entity;
use crate::properties::{display_value, lookup_path, Properties};

/// Substitutes placeholders in a description from one activity's data.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderRenderer<'a> {
	subject: Option<&'a dyn Entity>,
	causer: Option<&'a dyn Entity>,
	properties: &'a Properties,
}

impl<'a> PlaceholderRenderer<'a> {
	pub fn new(
		subject: Option<&'a dyn Entity>,
		causer: Option<&'a dyn Entity>,
		properties: &'a Properties,
	) -> Self {
		Self {
			subject,
			causer,
			properties,
		}
	}

	pub fn render(&self, template: &str) -> String {
		let mut out = String::with_capacity(template.len());
		let mut rest = template;

		while let Some(pos) = rest.find(':') {
			out.push_str(&rest[..pos]);
			let after = &rest[pos + 1..];
			let run = after
				.find(|c: char| !is_token_char(c))
				.unwrap_or(after.len());
			let token = after[..run].trim_end_matches('.');

			out.push_str(
				&self
					.resolve(token)
					.unwrap_or_else(|| format!(":{token}")),
			);
			rest = &after[token.len()..];
		}

		out.push_str(rest);
		out
	}

	fn resolve(&self, token: &str) -> Option<String> {
		let (root, path) = token.split_once('.')?;
		let value = match root {
			"subject" => entity_path(self.subject?, path),
			"causer" => entity_path(self.causer?, path),
			"properties" => properties_path(self.properties, path),
			_ => None,
		}?;
		display_value(&value)
	}
}

fn is_token_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

fn entity_path(entity: &dyn Entity, path: &str) -> Option<Value> {
	let (head, rest) = split_head(path);
	let value = entity
		.attribute(head)
		.or_else(|| entity.accessor(head))?;
	match rest {
		Some(rest) => lookup_path(&value, rest).cloned(),
		None => Some(value),
	}
}

fn properties_path(properties: &Properties, path: &str) -> Option<Value> {
	let (head, rest) = split_head(path);
	let value = properties.get(head)?;
	match rest {
		Some(rest) => lookup_path(value, rest).cloned(),
		None => Some(value.clone()),
	}
}

fn split_head(path: &str) -> (&str, Option<&str>) {
	match path.split_once('.') {
		Some((head, rest)) => (head, Some(rest)),
		None => (path, None),
	}
}
