// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON value kind, spelled the way node rows spell their `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub fn is_structured(self) -> bool {
        matches!(self, Self::Array | Self::Object)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a node's raw field list.
///
/// Structured rows (`array`/`object`) carry a summary value (the child count) rather than the
/// child itself; the child is its own node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRow {
    #[serde(default)]
    pub key: Option<String>,
    pub value: Value,
    #[serde(rename = "type")]
    pub kind: ValueKind,
}

impl FieldRow {
    pub fn new(key: Option<String>, value: Value, kind: ValueKind) -> Self {
        Self { key, value, kind }
    }

    /// A keyed row whose kind is inferred from `value`.
    pub fn keyed(key: impl Into<String>, value: Value) -> Self {
        let kind = ValueKind::of(&value);
        Self { key: Some(key.into()), value, kind }
    }

    /// A keyless row, the shape of a scalar-valued node.
    pub fn bare(value: Value) -> Self {
        let kind = ValueKind::of(&value);
        Self { key: None, value, kind }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|key| !key.is_empty())
    }
}
