// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Jsonode: inspect and edit single nodes of a JSON document rendered as a graph.
//!
//! A node is addressed by its structural path. The editor projects the node's scalar fields into
//! a flat view, stages edits against it, writes them back into the canonical document at that
//! path, and re-selects the node once the graph has been rebuilt.

pub mod config;
pub mod editor;
pub mod format;
pub mod graph;
pub mod model;
pub mod ops;
pub mod store;
pub mod sync;
