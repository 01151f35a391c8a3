// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde_json::Value;

use crate::graph::object_rows;
use crate::model::{project, EditableView, GraphNode, JsonPath, StagedFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// View-only; the projection is shown as formatted JSON.
    #[default]
    Read,
    /// One input per projected key, backed by `staged`.
    Write,
}

/// Working state for the one node that is currently open.
///
/// Staged edits never outlive the node they were made against: observing a different node
/// rebuilds the session from scratch.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    node: Option<GraphNode>,
    view: EditableView,
    mode: EditMode,
    staged: StagedFields,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(None)
    }
}

impl EditSession {
    pub fn new(node: Option<GraphNode>) -> Self {
        let view = project(node.as_ref().map(GraphNode::text));
        let staged = view.staged_defaults();
        Self { node, view, mode: EditMode::Read, staged }
    }

    pub fn node(&self) -> Option<&GraphNode> {
        self.node.as_ref()
    }

    pub fn path(&self) -> Option<&JsonPath> {
        self.node.as_ref().map(GraphNode::path)
    }

    pub fn view(&self) -> &EditableView {
        &self.view
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn staged(&self) -> &StagedFields {
        &self.staged
    }

    /// Read-mode text for the current view.
    pub fn render(&self, indent: usize) -> Result<String, serde_json::Error> {
        self.view.render(indent)
    }

    /// Tracks the externally selected node. Returns `true` when the session was reset.
    ///
    /// A node counts as changed when its path or rows differ from the last observation; a
    /// change always drops back to read mode and discards staged edits.
    pub fn observe(&mut self, node: Option<&GraphNode>) -> bool {
        let unchanged = match (&self.node, node) {
            (Some(current), Some(next)) => current.same_content(next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return false;
        }

        *self = Self::new(node.cloned());
        true
    }

    pub fn begin_edit(&mut self) -> Result<(), SessionError> {
        if self.node.is_none() {
            return Err(SessionError::NoNode);
        }
        if self.mode == EditMode::Write {
            return Err(SessionError::AlreadyEditing);
        }
        self.staged = self.view.staged_defaults();
        self.mode = EditMode::Write;
        Ok(())
    }

    pub fn stage_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        if self.mode != EditMode::Write {
            return Err(SessionError::NotEditing);
        }
        self.staged.insert(key.into(), value.into());
        Ok(())
    }

    /// Drops staged edits and re-derives them from the node's rows.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        if self.mode != EditMode::Write {
            return Err(SessionError::NotEditing);
        }
        self.reset();
        Ok(())
    }

    /// Back to read mode with a fresh projection of the current node.
    pub fn reset(&mut self) {
        self.view = project(self.node.as_ref().map(GraphNode::text));
        self.staged = self.view.staged_defaults();
        self.mode = EditMode::Read;
    }

    /// Called once the document accepted the staged fields. `written` is the value now at the
    /// node's path.
    ///
    /// The node snapshot and view are rebuilt from it, so a later edit starts from the saved
    /// values and the rebuilt graph node does not count as a change.
    pub(crate) fn finish_commit(&mut self, written: &Value) {
        if let (Some(node), Value::Object(fields)) = (self.node.as_mut(), written) {
            *node = GraphNode::new(node.id().clone(), node.path().clone(), object_rows(fields));
        }
        self.reset();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    NoNode,
    AlreadyEditing,
    NotEditing,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNode => f.write_str("no node is selected"),
            Self::AlreadyEditing => f.write_str("an edit is already in progress"),
            Self::NotEditing => f.write_str("no edit is in progress"),
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{EditMode, EditSession, SessionError};
    use crate::model::{FieldRow, GraphNode, JsonPath, NodeId, PathSegment};

    fn node(id: &str, path: Vec<PathSegment>, rows: Vec<FieldRow>) -> GraphNode {
        GraphNode::new(NodeId::new(id).unwrap(), JsonPath::new(path), rows)
    }

    fn customer() -> GraphNode {
        node(
            "1",
            vec!["customer".into()],
            vec![FieldRow::keyed("name", json!("Ada")), FieldRow::keyed("age", json!(36))],
        )
    }

    fn order() -> GraphNode {
        node("2", vec!["orders".into(), 0.into()], vec![FieldRow::keyed("sku", json!("A-1"))])
    }

    #[test]
    fn starts_in_read_mode_with_projected_defaults() {
        let session = EditSession::new(Some(customer()));
        assert_eq!(session.mode(), EditMode::Read);
        assert_eq!(session.staged().get("age").map(String::as_str), Some("36"));
        assert_eq!(session.path().map(ToString::to_string).as_deref(), Some(r#"$["customer"]"#));
    }

    #[test]
    fn begin_edit_stage_and_cancel() {
        let mut session = EditSession::new(Some(customer()));
        session.begin_edit().unwrap();
        assert_eq!(session.mode(), EditMode::Write);

        session.stage_field("name", "Grace").unwrap();
        assert_eq!(session.staged()["name"], "Grace");

        session.cancel().unwrap();
        assert_eq!(session.mode(), EditMode::Read);
        assert_eq!(session.staged()["name"], "Ada");
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let mut session = EditSession::new(Some(customer()));
        assert_eq!(session.stage_field("name", "x"), Err(SessionError::NotEditing));
        assert_eq!(session.cancel(), Err(SessionError::NotEditing));

        session.begin_edit().unwrap();
        assert_eq!(session.begin_edit(), Err(SessionError::AlreadyEditing));

        let mut empty = EditSession::default();
        assert_eq!(empty.begin_edit(), Err(SessionError::NoNode));
    }

    #[test]
    fn observing_same_node_keeps_staged_edits() {
        let mut session = EditSession::new(Some(customer()));
        session.begin_edit().unwrap();
        session.stage_field("name", "Grace").unwrap();

        assert!(!session.observe(Some(&customer())));
        assert_eq!(session.mode(), EditMode::Write);
        assert_eq!(session.staged()["name"], "Grace");
    }

    #[test]
    fn switching_nodes_and_back_does_not_restore_staged_edits() {
        let mut session = EditSession::new(Some(customer()));
        session.begin_edit().unwrap();
        session.stage_field("name", "Grace").unwrap();

        assert!(session.observe(Some(&order())));
        assert_eq!(session.mode(), EditMode::Read);
        assert_eq!(session.staged()["sku"], "A-1");

        assert!(session.observe(Some(&customer())));
        assert_eq!(session.mode(), EditMode::Read);
        assert_eq!(session.staged()["name"], "Ada");
    }

    #[test]
    fn changed_rows_at_same_path_reset_the_session() {
        let mut session = EditSession::new(Some(customer()));
        session.begin_edit().unwrap();

        let updated = node(
            "9",
            vec!["customer".into()],
            vec![FieldRow::keyed("name", json!("Ada L.")), FieldRow::keyed("age", json!(36))],
        );
        assert!(session.observe(Some(&updated)));
        assert_eq!(session.mode(), EditMode::Read);
        assert_eq!(session.staged()["name"], "Ada L.");
    }

    #[test]
    fn deselecting_resets_to_empty_view() {
        let mut session = EditSession::new(Some(customer()));
        assert!(session.observe(None));
        assert!(session.path().is_none());
        assert_eq!(session.render(2).unwrap(), "{}");
        assert!(!session.observe(None));
    }

    #[test]
    fn finish_commit_reprojects_written_values() {
        let mut session = EditSession::new(Some(customer()));
        session.begin_edit().unwrap();
        session.stage_field("age", "37").unwrap();
        session.finish_commit(&json!({"name": "Ada", "age": "37", "tags": [1, 2]}));

        assert_eq!(session.mode(), EditMode::Read);
        assert_eq!(session.staged()["age"], "37");
        assert!(session.staged().get("tags").is_none());
        assert_eq!(session.node().map(|n| n.id().as_str()), Some("1"));

        session.begin_edit().unwrap();
        assert_eq!(session.staged()["age"], "37");
    }

    #[test]
    fn rebuilt_node_matching_commit_is_not_a_change() {
        let mut session = EditSession::new(Some(customer()));
        session.begin_edit().unwrap();
        session.stage_field("age", "37").unwrap();
        session.finish_commit(&json!({"name": "Ada", "age": "37"}));
        session.begin_edit().unwrap();
        session.stage_field("name", "Grace").unwrap();

        let rebuilt = node(
            "4",
            vec!["customer".into()],
            vec![FieldRow::keyed("name", json!("Ada")), FieldRow::keyed("age", json!("37"))],
        );
        assert!(!session.observe(Some(&rebuilt)));
        assert_eq!(session.mode(), EditMode::Write);
        assert_eq!(session.staged()["name"], "Grace");
    }

    #[test]
    fn finish_commit_on_scalar_keeps_node() {
        let leaf = node("3", vec!["list".into(), 0.into()], vec![FieldRow::bare(json!("leaf"))]);
        let mut session = EditSession::new(Some(leaf.clone()));
        session.begin_edit().unwrap();
        session.finish_commit(&json!("leaf"));
        assert_eq!(session.node(), Some(&leaf));
        assert_eq!(session.mode(), EditMode::Read);
    }
}
