// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flat, editable projection of a node's field rows.
//!
//! The projection is a pure function of the rows. It is recomputed from scratch whenever the
//! observed node changes; nothing here caches.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::field::FieldRow;
use crate::format::json::to_pretty_json;

/// Working copy of field edits: field key to the user's string input.
///
/// Keeps display order for projected keys and staging order for new ones, which is the order
/// new keys land in the document.
pub type StagedFields = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum EditableView {
    /// Scalar fields of an object-shaped node, in row order.
    Fields(Map<String, Value>),
    /// A node made of exactly one keyless row: the bare value itself.
    Scalar(Value),
}

impl Default for EditableView {
    fn default() -> Self {
        Self::Fields(Map::new())
    }
}

impl EditableView {
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Fields(fields) => Some(fields),
            Self::Scalar(_) => None,
        }
    }

    /// Editable keys. A scalar view has none.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields().into_iter().flat_map(|fields| fields.keys().map(String::as_str))
    }

    /// Read-mode text: the view as formatted JSON, `{}` when there is nothing to show.
    pub fn render(&self, indent: usize) -> Result<String, serde_json::Error> {
        match self {
            Self::Fields(fields) if fields.is_empty() => Ok("{}".to_owned()),
            Self::Fields(fields) => to_pretty_json(&Value::Object(fields.clone()), indent),
            Self::Scalar(value) => to_pretty_json(value, indent),
        }
    }

    /// Initial input values for write mode: every field stringified.
    pub fn staged_defaults(&self) -> StagedFields {
        self.fields()
            .map(|fields| {
                fields.iter().map(|(key, value)| (key.clone(), stringify_value(value))).collect()
            })
            .unwrap_or_default()
    }
}

/// Builds the editable view of a node.
///
/// Rows typed `array`/`object` and rows without a key are dropped, except that a node with
/// exactly one keyless row degenerates to that row's value.
pub fn project(rows: Option<&[FieldRow]>) -> EditableView {
    let Some(rows) = rows else {
        return EditableView::default();
    };

    if let [only] = rows {
        if only.key().is_none() {
            return EditableView::Scalar(only.value.clone());
        }
    }

    let mut fields = Map::new();
    for row in rows {
        if row.kind.is_structured() {
            continue;
        }
        if let Some(key) = row.key() {
            fields.insert(key.to_owned(), row.value.clone());
        }
    }
    EditableView::Fields(fields)
}

/// Text shown in an input for `value`; `null` becomes the empty string.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
