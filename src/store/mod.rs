// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Collaborator stores the editor reads from and publishes to.
//!
//! The editor never holds the canonical document itself. It goes through these traits so the
//! commit and resync logic can run against in-memory fakes or a file on disk.

pub mod file;
pub mod memory;

pub use file::{FileDocumentStore, StoreError, WriteDurability};
pub use memory::{MemoryDocumentStore, MemoryEditorStore, MemoryGraphStore};

use tokio::sync::watch;

use crate::model::GraphNode;
use crate::ops::{CommitError, Committed};

/// Holder of the canonical document text.
pub trait DocumentStore: Send + Sync {
    fn text(&self) -> String;

    /// Runs a read-modify-write of the document as one step.
    ///
    /// Implementations hold their writer lock from reading the current text until the text
    /// returned by `update` is published. If `update` fails, nothing is published. The returned
    /// commit carries the text exactly as published.
    fn replace_with(
        &self,
        update: &mut dyn FnMut(&str) -> Result<Committed, CommitError>,
    ) -> Result<Committed, CommitError>;

    fn set_text(&self, text: String) -> Result<(), CommitError> {
        self.replace_with(&mut |_| Ok(Committed::replacement(text.clone()))).map(|_| ())
    }
}

/// Text shown by the dependent editor view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorContents {
    pub contents: String,
    pub has_changes: bool,
}

impl EditorContents {
    /// Contents that mirror the canonical document exactly.
    pub fn saved(contents: impl Into<String>) -> Self {
        Self { contents: contents.into(), has_changes: false }
    }
}

pub trait EditorStore: Send + Sync {
    fn contents(&self) -> EditorContents;
    fn set_contents(&self, contents: EditorContents);
}

/// The graph built from the document, plus the current selection.
pub trait GraphStore: Send + Sync {
    fn nodes(&self) -> Vec<GraphNode>;
    fn selected_node(&self) -> Option<GraphNode>;
    fn set_selected_node(&self, node: GraphNode);

    /// A revision counter that changes every time the node list is rebuilt, when the store can
    /// signal that.
    fn subscribe_recomputed(&self) -> Option<watch::Receiver<u64>> {
        None
    }
}
