// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::field::FieldRow;
use super::ids::NodeId;
use super::path::JsonPath;

/// A node record as produced by the graph pipeline.
///
/// Nodes are matched across recomputations by `path`, never by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    id: NodeId,
    path: JsonPath,
    #[serde(default)]
    text: Vec<FieldRow>,
}

impl GraphNode {
    pub fn new(id: NodeId, path: JsonPath, text: Vec<FieldRow>) -> Self {
        Self { id, path, text }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    pub fn text(&self) -> &[FieldRow] {
        &self.text
    }

    /// True when both nodes would project to the same view at the same location.
    pub fn same_content(&self, other: &GraphNode) -> bool {
        self.path == other.path && self.text == other.text
    }
}
