// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The node editor: one open node, its edit session, and the commit/resync cycle.
//!
//! `NodeEditor` is the UI-facing layer. It observes the graph's selected node, stages edits in an
//! [`EditSession`], writes them into the canonical document through a [`DocumentStore`], mirrors
//! the new text into the [`EditorStore`], and hands back a [`ResyncTask`] that re-selects the
//! edited node once the graph has been rebuilt.

pub mod session;

pub use session::{EditMode, EditSession, SessionError};

use std::fmt;
use std::sync::Arc;

use crate::config::EditorConfig;
use crate::model::{EditableView, GraphNode, JsonPath, StagedFields};
use crate::ops::{commit_document, ApplyResult, CommitError, Committed};
use crate::store::{DocumentStore, EditorContents, EditorStore, GraphStore};
use crate::sync::{Interest, ResyncTask};

pub struct NodeEditor {
    documents: Arc<dyn DocumentStore>,
    editor: Arc<dyn EditorStore>,
    graph: Arc<dyn GraphStore>,
    config: EditorConfig,
    session: EditSession,
    interest: Interest,
    opened: bool,
}

/// A successful commit: what was written, and the pending re-selection.
pub struct CommitOutcome {
    pub result: ApplyResult,
    pub text: String,
    pub resync: ResyncTask,
}

impl NodeEditor {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        editor: Arc<dyn EditorStore>,
        graph: Arc<dyn GraphStore>,
        config: EditorConfig,
    ) -> Self {
        Self {
            documents,
            editor,
            graph,
            config,
            session: EditSession::default(),
            interest: Interest::default(),
            opened: false,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn mode(&self) -> EditMode {
        self.session.mode()
    }

    pub fn view(&self) -> &EditableView {
        self.session.view()
    }

    pub fn staged(&self) -> &StagedFields {
        self.session.staged()
    }

    /// Display form of the open node's path; `$` when nothing is open.
    pub fn path_display(&self) -> String {
        self.session.path().map(ToString::to_string).unwrap_or_else(|| JsonPath::root().to_string())
    }

    /// Read-mode text for the open node.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        self.session.render(self.config.indent)
    }

    /// Opens the editor on whatever the graph currently has selected.
    pub fn open(&mut self) -> bool {
        self.opened = true;
        self.refresh()
    }

    /// Closes the editor. Pending resyncs for the node become no-ops.
    pub fn close(&mut self) {
        self.opened = false;
        self.session.reset();
        self.interest.clear();
    }

    /// Re-reads the graph's selected node. Returns `true` when the session was reset.
    pub fn refresh(&mut self) -> bool {
        let selected = self.graph.selected_node();
        self.observe(selected.as_ref())
    }

    /// Tracks an externally observed node; any change discards unsaved edits.
    pub fn observe(&mut self, node: Option<&GraphNode>) -> bool {
        let reset = self.session.observe(node);
        if self.opened {
            self.interest.set(self.session.path().cloned());
        }
        if reset {
            tracing::debug!(path = %self.path_display(), "observed node changed");
        }
        reset
    }

    pub fn begin_edit(&mut self) -> Result<(), SessionError> {
        self.session.begin_edit()
    }

    pub fn stage_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.session.stage_field(key, value)
    }

    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.session.cancel()
    }

    /// Writes the staged fields into the canonical document at the open node's path.
    ///
    /// On failure the error is logged and returned, the session stays in write mode with its
    /// staged fields, and the document is unchanged.
    pub fn commit(&mut self) -> Result<CommitOutcome, EditorError> {
        if self.session.mode() != EditMode::Write {
            return Err(EditorError::Session(SessionError::NotEditing));
        }
        let Some(path) = self.session.path().cloned() else {
            return Err(EditorError::Session(SessionError::NoNode));
        };

        let recomputed = self.graph.subscribe_recomputed();
        let options = self.config.commit_options();
        let staged = self.session.staged();

        let committed = self
            .documents
            .replace_with(&mut |text| commit_document(text, &path, staged, options))
            .map_err(|err| {
                tracing::warn!(path = %path, error = %err, "commit failed; staged edits kept");
                EditorError::Commit(err)
            })?;
        let Committed { text, result, target } = committed;

        self.editor.set_contents(EditorContents::saved(text.clone()));
        self.session.finish_commit(&target);
        if self.opened {
            self.interest.set(Some(path.clone()));
        }
        tracing::debug!(
            path = %path,
            added = result.delta.added.len(),
            updated = result.delta.updated.len(),
            "commit published"
        );

        let resync = ResyncTask::new(
            self.graph.clone(),
            path,
            self.interest.clone(),
            self.config.resync_delay,
            recomputed,
        );
        Ok(CommitOutcome { result, text, resync })
    }
}

#[derive(Debug)]
pub enum EditorError {
    Session(SessionError),
    Commit(CommitError),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(err) => write!(f, "{err}"),
            Self::Commit(err) => write!(f, "commit failed: {err}"),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Session(err) => Some(err),
            Self::Commit(err) => Some(err),
        }
    }
}

impl From<SessionError> for EditorError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl From<CommitError> for EditorError {
    fn from(err: CommitError) -> Self {
        Self::Commit(err)
    }
}
