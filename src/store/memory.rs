// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use super::{DocumentStore, EditorContents, EditorStore, GraphStore};
use crate::graph::build_nodes;
use crate::model::{GraphNode, JsonPath};
use crate::ops::{CommitError, Committed};
use crate::sync::find_node_by_path;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Canonical document held in memory behind a single writer lock.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    text: Mutex<String>,
}

impl MemoryDocumentStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: Mutex::new(text.into()) }
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn text(&self) -> String {
        lock(&self.text).clone()
    }

    fn replace_with(
        &self,
        update: &mut dyn FnMut(&str) -> Result<Committed, CommitError>,
    ) -> Result<Committed, CommitError> {
        let mut text = lock(&self.text);
        let committed = update(&text)?;
        *text = committed.text.clone();
        Ok(committed)
    }
}

#[derive(Debug, Default)]
pub struct MemoryEditorStore {
    contents: Mutex<EditorContents>,
}

impl MemoryEditorStore {
    pub fn new(contents: EditorContents) -> Self {
        Self { contents: Mutex::new(contents) }
    }
}

impl EditorStore for MemoryEditorStore {
    fn contents(&self) -> EditorContents {
        lock(&self.contents).clone()
    }

    fn set_contents(&self, contents: EditorContents) {
        *lock(&self.contents) = contents;
    }
}

#[derive(Debug, Default)]
struct GraphState {
    nodes: Vec<GraphNode>,
    selected: Option<GraphNode>,
}

/// Node list plus selection, with a revision channel bumped on every rebuild.
#[derive(Debug)]
pub struct MemoryGraphStore {
    state: Mutex<GraphState>,
    revision: watch::Sender<u64>,
}

impl Default for MemoryGraphStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemoryGraphStore {
    pub fn new(nodes: Vec<GraphNode>) -> Self {
        let (revision, _) = watch::channel(0);
        Self { state: Mutex::new(GraphState { nodes, selected: None }), revision }
    }

    /// Builds the node list from document text.
    pub fn from_document(text: &str) -> Result<Self, serde_json::Error> {
        let store = Self::default();
        store.recompute(text)?;
        Ok(store)
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Replaces the node list. The selection is left as-is, exactly like an upstream rebuild
    /// that does not know about the editor.
    pub fn set_nodes(&self, nodes: Vec<GraphNode>) {
        lock(&self.state).nodes = nodes;
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    /// Rebuilds the node list from document text. Returns the node count.
    pub fn recompute(&self, text: &str) -> Result<usize, serde_json::Error> {
        let document: serde_json::Value = serde_json::from_str(text)?;
        let nodes = build_nodes(&document);
        let count = nodes.len();
        self.set_nodes(nodes);
        Ok(count)
    }

    /// Selects the node at `path`, if the current node list has one.
    pub fn select_path(&self, path: &JsonPath) -> Option<GraphNode> {
        let mut state = lock(&self.state);
        let node = find_node_by_path(&state.nodes, path)?.clone();
        state.selected = Some(node.clone());
        Some(node)
    }

    pub fn clear_selection(&self) {
        lock(&self.state).selected = None;
    }
}

impl GraphStore for MemoryGraphStore {
    fn nodes(&self) -> Vec<GraphNode> {
        lock(&self.state).nodes.clone()
    }

    fn selected_node(&self) -> Option<GraphNode> {
        lock(&self.state).selected.clone()
    }

    fn set_selected_node(&self, node: GraphNode) {
        lock(&self.state).selected = Some(node);
    }

    fn subscribe_recomputed(&self) -> Option<watch::Receiver<u64>> {
        Some(self.revision.subscribe())
    }
}
