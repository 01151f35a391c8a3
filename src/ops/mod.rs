// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Writing staged field edits back into the canonical document.
//!
//! A commit parses the document text, writes into a working copy, and re-serializes it. The
//! caller only ever sees a complete new text or an error; the input text is never touched.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::Value;

use crate::format::json::{to_pretty_json, DEFAULT_INDENT};
use crate::model::{JsonPath, PathNotFound, StagedFields, ValueKind};

/// How staged strings are written into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionPolicy {
    /// Write every staged value as a JSON string.
    #[default]
    Verbatim,
    /// Write a typed value when the field currently holds a number, boolean or null and the
    /// staged text parses unambiguously as that kind; otherwise write a string.
    MatchExisting,
}

impl FromStr for CoercionPolicy {
    type Err = ParseCoercionPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "verbatim" => Ok(Self::Verbatim),
            "match-existing" => Ok(Self::MatchExisting),
            other => Err(ParseCoercionPolicyError(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCoercionPolicyError(String);

impl fmt::Display for ParseCoercionPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown coercion policy {:?} (expected verbatim or match-existing)", self.0)
    }
}

impl std::error::Error for ParseCoercionPolicyError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOptions {
    pub indent: usize,
    pub coercion: CoercionPolicy,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self { indent: DEFAULT_INDENT, coercion: CoercionPolicy::default() }
    }
}

/// Which staged keys replaced an existing field and which created a new one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<String>,
    pub updated: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub written: usize,
    pub delta: Delta,
}

/// A finished commit: the new document text, what was written, and the value now at the path.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed {
    pub text: String,
    pub result: ApplyResult,
    pub target: Value,
}

impl Committed {
    /// Wholesale replacement of the document text; no fields were applied.
    pub fn replacement(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            result: ApplyResult { written: 0, delta: Delta::default() },
            target: Value::Null,
        }
    }
}

/// Writes every staged field into the object at `path` inside `document`.
///
/// Existing keys are overwritten unconditionally and missing keys are created. An empty staged
/// map only checks that `path` resolves.
pub fn apply_staged(
    document: &mut Value,
    path: &JsonPath,
    staged: &StagedFields,
    coercion: CoercionPolicy,
) -> Result<ApplyResult, CommitError> {
    let target = path.resolve_mut(document).map_err(CommitError::PathNotFound)?;

    if staged.is_empty() {
        return Ok(ApplyResult { written: 0, delta: Delta::default() });
    }

    let found = ValueKind::of(target);
    let Value::Object(fields) = target else {
        return Err(CommitError::InvalidTarget { path: path.clone(), found });
    };

    let mut delta = Delta::default();
    for (key, raw) in staged {
        let value = coerce_staged(fields.get(key), raw, coercion);
        match fields.insert(key.clone(), value) {
            Some(_) => delta.updated.push(key.clone()),
            None => delta.added.push(key.clone()),
        }
    }

    Ok(ApplyResult { written: staged.len(), delta })
}

/// Parses `text`, applies `staged` at `path`, and re-serializes the whole document.
pub fn commit_document(
    text: &str,
    path: &JsonPath,
    staged: &StagedFields,
    options: CommitOptions,
) -> Result<Committed, CommitError> {
    let mut document: Value =
        serde_json::from_str(text).map_err(|source| CommitError::MalformedDocument { source })?;

    let result = apply_staged(&mut document, path, staged, options.coercion)?;
    let target = path.resolve(&document)?.clone();

    let text = to_pretty_json(&document, options.indent)
        .map_err(|source| CommitError::Serialize { source })?;

    Ok(Committed { text, result, target })
}

#[derive(Debug)]
pub enum CommitError {
    /// The canonical document text is not valid JSON.
    MalformedDocument { source: serde_json::Error },
    PathNotFound(PathNotFound),
    /// The path resolved to something that cannot hold keyed fields.
    InvalidTarget { path: JsonPath, found: ValueKind },
    Serialize { source: serde_json::Error },
    /// A persistent document store failed to write the new text.
    Persist { path: PathBuf, source: io::Error },
}

impl CommitError {
    pub fn kind(&self) -> CommitErrorKind {
        match self {
            Self::MalformedDocument { .. } => CommitErrorKind::MalformedDocument,
            Self::PathNotFound(_) => CommitErrorKind::PathNotFound,
            Self::InvalidTarget { .. } => CommitErrorKind::InvalidTarget,
            Self::Serialize { .. } => CommitErrorKind::Serialize,
            Self::Persist { .. } => CommitErrorKind::Persist,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitErrorKind {
    MalformedDocument,
    PathNotFound,
    InvalidTarget,
    Serialize,
    Persist,
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedDocument { source } => write!(f, "malformed document: {source}"),
            Self::PathNotFound(err) => write!(f, "{err}"),
            Self::InvalidTarget { path, found } => {
                write!(f, "cannot write fields into {path}: target is {found}, expected object")
            }
            Self::Serialize { source } => write!(f, "cannot serialize document: {source}"),
            Self::Persist { path, source } => {
                write!(f, "cannot persist document to {path:?}: {source}")
            }
        }
    }
}

impl std::error::Error for CommitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedDocument { source } => Some(source),
            Self::PathNotFound(err) => Some(err),
            Self::InvalidTarget { .. } => None,
            Self::Serialize { source } => Some(source),
            Self::Persist { source, .. } => Some(source),
        }
    }
}

impl From<PathNotFound> for CommitError {
    fn from(err: PathNotFound) -> Self {
        Self::PathNotFound(err)
    }
}

// Staged-value coercion helpers used by `apply_staged`.
include!("ops_impl.rs");
