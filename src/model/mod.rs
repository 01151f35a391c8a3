// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: paths, node records, and the editable projection of a node.

pub mod field;
pub mod ids;
pub mod node;
pub mod path;
pub mod view;

pub use field::{FieldRow, ValueKind};
pub use ids::{Id, IdError, NodeId};
pub use node::GraphNode;
pub use path::{JsonPath, ParsePathError, PathNotFound, PathSegment};
pub use view::{project, stringify_value, EditableView, StagedFields};
