// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Property trees attached to activities.

use serde_json::Value;

/// Insertion-ordered mapping of property names to arbitrarily nested JSON values.
pub type Properties = serde_json::Map<String, Value>;

/// Follows a dotted path (`a.b.0.c`) through nested objects and arrays.
///
/// Returns `None` as soon as any segment is missing or the value being indexed
/// is not a container, including when an intermediate value is `null`.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
	path.split('.').try_fold(value, |current, segment| match current {
		Value::Object(map) => map.get(segment),
		Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
		_ => None,
	})
}

/// Shallow union: keys from `other` overwrite keys already present in `target`.
pub fn merge_into(target: &mut Properties, other: Properties) {
	for (key, value) in other {
		target.insert(key, value);
	}
}

/// Renders a scalar for inclusion in a description.
///
/// Objects and arrays render as compact JSON; `null` yields `None`.
pub fn display_value(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(s) => Some(s.clone()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Number(n) => Some(n.to_string()),
		other => Some(other.to_string()),
	}
}
