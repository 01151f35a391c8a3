// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Turns a JSON document into graph nodes.
//!
//! Objects become one node each, carrying their fields as rows. Arrays have no node of their
//! own: every element becomes a node at `[.., index]`, and scalar elements become single-row
//! nodes with no key.

use serde_json::{json, Map, Value};

use crate::model::{FieldRow, GraphNode, JsonPath, NodeId, ValueKind};

pub fn build_nodes(document: &Value) -> Vec<GraphNode> {
    let mut builder = NodeBuilder::default();
    builder.visit(document, JsonPath::root());
    builder.nodes
}

#[derive(Debug, Default)]
struct NodeBuilder {
    nodes: Vec<GraphNode>,
}

impl NodeBuilder {
    fn visit(&mut self, value: &Value, path: JsonPath) {
        match value {
            Value::Object(fields) => {
                self.push(path.clone(), object_rows(fields));

                for (key, child) in fields {
                    if ValueKind::of(child).is_structured() {
                        self.visit(child, path.child(key.as_str()));
                    }
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.visit(item, path.child(index));
                }
            }
            scalar => self.push(path, vec![FieldRow::bare(scalar.clone())]),
        }
    }

    fn push(&mut self, path: JsonPath, rows: Vec<FieldRow>) {
        let id = NodeId::from_index(self.nodes.len() + 1);
        self.nodes.push(GraphNode::new(id, path, rows));
    }
}

/// Rows for an object node: scalar fields carry their value, containers their child count.
pub fn object_rows(fields: &Map<String, Value>) -> Vec<FieldRow> {
    fields.iter().map(|(key, child)| field_row(key, child)).collect()
}

fn field_row(key: &str, value: &Value) -> FieldRow {
    match value {
        Value::Array(items) => FieldRow::new(Some(key.to_owned()), json!(items.len()), ValueKind::Array),
        Value::Object(fields) => {
            FieldRow::new(Some(key.to_owned()), json!(fields.len()), ValueKind::Object)
        }
        scalar => FieldRow::keyed(key, scalar.clone()),
    }
}
