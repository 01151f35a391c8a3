// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON text formatting shared by read-mode rendering and document re-serialization.

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

pub const DEFAULT_INDENT: usize = 2;

/// Serializes `value` with `indent` spaces per level; `0` produces compact output.
pub fn to_pretty_json(value: &Value, indent: usize) -> Result<String, serde_json::Error> {
    if indent == 0 {
        return serde_json::to_string(value);
    }

    let indent = " ".repeat(indent);
    let mut out = Vec::with_capacity(256);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(serde_json::Error::custom)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::to_pretty_json;

    #[test]
    fn two_space_indent_matches_default_pretty_output() {
        let value = json!({"a": {"b": [1, 2]}, "c": null});
        assert_eq!(to_pretty_json(&value, 2).unwrap(), serde_json::to_string_pretty(&value).unwrap());
    }

    #[test]
    fn zero_indent_is_compact() {
        let value = json!({"a": [1, 2]});
        assert_eq!(to_pretty_json(&value, 0).unwrap(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn custom_indent_width() {
        let value = json!({"a": 1});
        assert_eq!(to_pretty_json(&value, 4).unwrap(), "{\n    \"a\": 1\n}");
    }

    #[test]
    fn empty_object_renders_braces() {
        assert_eq!(to_pretty_json(&json!({}), 2).unwrap(), "{}");
    }
}
