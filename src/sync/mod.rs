// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Re-selecting a node after its document changed.
//!
//! The graph is rebuilt outside the editor's control, so after a commit the edited node has to be
//! found again by path. This is best-effort: a node that cannot be found leaves the selection as
//! it was and is not an error.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::model::{GraphNode, JsonPath, NodeId};
use crate::store::GraphStore;

pub const DEFAULT_RESYNC_DELAY: Duration = Duration::from_millis(50);

/// First node whose path equals `path`.
pub fn find_node_by_path<'a>(nodes: &'a [GraphNode], path: &JsonPath) -> Option<&'a GraphNode> {
    nodes.iter().find(|node| node.path() == path)
}

/// Path of the node the editor currently has open, shared with pending resyncs.
#[derive(Debug, Clone, Default)]
pub struct Interest {
    path: Arc<Mutex<Option<JsonPath>>>,
}

impl Interest {
    pub fn set(&self, path: Option<JsonPath>) {
        *self.path.lock().unwrap_or_else(PoisonError::into_inner) = path;
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn is(&self, path: &JsonPath) -> bool {
        self.path.lock().unwrap_or_else(PoisonError::into_inner).as_ref() == Some(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResyncOutcome {
    Selected(NodeId),
    /// No node at the path after the retry; selection unchanged.
    NotFound,
    /// The editor closed or moved on before the lookup ran.
    Superseded,
}

/// A deferred re-selection for one committed path.
pub struct ResyncTask {
    graph: Arc<dyn GraphStore>,
    path: JsonPath,
    interest: Interest,
    delay: Duration,
    recomputed: Option<watch::Receiver<u64>>,
}

impl ResyncTask {
    /// `recomputed` should be subscribed before the document is published, so a rebuild that
    /// finishes early is not missed.
    pub fn new(
        graph: Arc<dyn GraphStore>,
        path: JsonPath,
        interest: Interest,
        delay: Duration,
        recomputed: Option<watch::Receiver<u64>>,
    ) -> Self {
        Self { graph, path, interest, delay, recomputed }
    }

    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    pub fn spawn(self) -> JoinHandle<ResyncOutcome> {
        tokio::spawn(self.run())
    }

    /// Waits for the graph to be rebuilt, looks the path up, and retries once after `delay`.
    pub async fn run(mut self) -> ResyncOutcome {
        self.wait_for_rebuild().await;
        let outcome = match self.try_select() {
            Some(outcome) => outcome,
            None => {
                tokio::time::sleep(self.delay).await;
                self.try_select().unwrap_or(ResyncOutcome::NotFound)
            }
        };

        tracing::debug!(path = %self.path, outcome = ?outcome, "resync finished");
        outcome
    }

    async fn wait_for_rebuild(&mut self) {
        match self.recomputed.as_mut() {
            Some(rx) => {
                // A closed channel or a slow rebuild both fall through to the lookup.
                let _ = tokio::time::timeout(self.delay, rx.changed()).await;
            }
            None => tokio::time::sleep(self.delay).await,
        }
    }

    fn try_select(&self) -> Option<ResyncOutcome> {
        if !self.interest.is(&self.path) {
            return Some(ResyncOutcome::Superseded);
        }

        let nodes = self.graph.nodes();
        let node = find_node_by_path(&nodes, &self.path)?;
        let id = node.id().clone();
        self.graph.set_selected_node(node.clone());
        Some(ResyncOutcome::Selected(id))
    }
}
