// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structural paths into a JSON document.
//!
//! A path is an ordered list of object keys and array indices. Paths are the only identity a
//! graph node has across recomputations: two nodes are "the same" when their paths are equal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field::ValueKind;

/// One step of a [`JsonPath`].
///
/// Serializes untagged, so a path round-trips as `["a", 0, "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        match self {
            Self::Index(index) => write!(f, "{index}")?,
            Self::Key(key) => write_key_literal(f, key)?,
        }
        f.write_str("]")
    }
}

fn write_key_literal(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in key.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

/// Ordered sequence of segments addressing a sub-value of a document.
///
/// Canonical display form is `$` for the root and `$["key"][0]...` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn parse(input: &str) -> Result<Self, ParsePathError> {
        let mut rest = input.trim().strip_prefix('$').ok_or(ParsePathError::MissingRoot)?;
        let mut segments = Vec::new();

        while !rest.is_empty() {
            let inner = rest.strip_prefix('[').ok_or_else(|| ParsePathError::ExpectedBracket {
                found: rest.chars().next().unwrap_or_default(),
            })?;

            if inner.starts_with('"') {
                let end = closing_quote(inner).ok_or(ParsePathError::Unterminated)?;
                let literal = &inner[..=end];
                let key: String = serde_json::from_str(literal)
                    .map_err(|_| ParsePathError::InvalidKey(literal.to_owned()))?;
                rest = inner[end + 1..].strip_prefix(']').ok_or(ParsePathError::Unterminated)?;
                segments.push(PathSegment::Key(key));
            } else {
                let close = inner.find(']').ok_or(ParsePathError::Unterminated)?;
                let digits = &inner[..close];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ParsePathError::InvalidIndex(digits.to_owned()));
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| ParsePathError::InvalidIndex(digits.to_owned()))?;
                rest = &inner[close + 1..];
                segments.push(PathSegment::Index(index));
            }
        }

        Ok(Self { segments })
    }

    /// Navigates `document` segment by segment.
    ///
    /// String segments only index objects and integer segments only index arrays; any other
    /// combination, or a missing key/index, is a `PathNotFound`.
    pub fn resolve<'a>(&self, document: &'a Value) -> Result<&'a Value, PathNotFound> {
        let mut current = document;
        for (depth, segment) in self.segments.iter().enumerate() {
            let next = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key),
                (PathSegment::Index(index), Value::Array(items)) => items.get(*index),
                _ => None,
            };
            current = match next {
                Some(value) => value,
                None => return Err(self.not_found(depth, ValueKind::of(current))),
            };
        }
        Ok(current)
    }

    pub fn resolve_mut<'a>(&self, document: &'a mut Value) -> Result<&'a mut Value, PathNotFound> {
        let mut current = document;
        for (depth, segment) in self.segments.iter().enumerate() {
            let found = ValueKind::of(current);
            let next = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get_mut(key),
                (PathSegment::Index(index), Value::Array(items)) => items.get_mut(*index),
                _ => None,
            };
            current = match next {
                Some(value) => value,
                None => return Err(self.not_found(depth, found)),
            };
        }
        Ok(current)
    }

    fn not_found(&self, depth: usize, found: ValueKind) -> PathNotFound {
        PathNotFound {
            resolved: Self::new(self.segments[..depth].to_vec()),
            segment: self.segments[depth].clone(),
            found,
        }
    }
}

fn closing_quote(literal: &str) -> Option<usize> {
    let bytes = literal.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = ParsePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Vec<PathSegment>> for JsonPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self::new(segments)
    }
}

impl FromIterator<PathSegment> for JsonPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Navigation stopped before the end of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNotFound {
    resolved: JsonPath,
    segment: PathSegment,
    found: ValueKind,
}

impl PathNotFound {
    /// The prefix of the path that did resolve.
    pub fn resolved(&self) -> &JsonPath {
        &self.resolved
    }

    pub fn segment(&self) -> &PathSegment {
        &self.segment
    }

    /// Kind of the value the failing segment was applied to.
    pub fn found(&self) -> ValueKind {
        self.found
    }
}

impl fmt::Display for PathNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "path segment {} not found under {} ({})",
            self.segment, self.resolved, self.found
        )
    }
}

impl std::error::Error for PathNotFound {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsePathError {
    MissingRoot,
    ExpectedBracket { found: char },
    Unterminated,
    InvalidKey(String),
    InvalidIndex(String),
}

impl fmt::Display for ParsePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRoot => f.write_str("path must start with '$'"),
            Self::ExpectedBracket { found } => write!(f, "expected '[' but found {found:?}"),
            Self::Unterminated => f.write_str("unterminated path segment"),
            Self::InvalidKey(literal) => write!(f, "invalid key literal {literal}"),
            Self::InvalidIndex(raw) => write!(f, "invalid array index {raw:?}"),
        }
    }
}

impl std::error::Error for ParsePathError {}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{JsonPath, ParsePathError, PathSegment};
    use crate::model::ValueKind;

    fn path(segments: Vec<PathSegment>) -> JsonPath {
        JsonPath::new(segments)
    }

    #[test]
    fn root_displays_as_dollar() {
        assert_eq!(JsonPath::root().to_string(), "$");
    }

    #[test]
    fn display_quotes_keys_and_leaves_indices_bare() {
        let p = path(vec!["a".into(), 0.into(), "b".into()]);
        assert_eq!(p.to_string(), r#"$["a"][0]["b"]"#);
    }

    #[test]
    fn display_escapes_quotes_in_keys() {
        let p = path(vec![r#"say "hi""#.into()]);
        assert_eq!(p.to_string(), r#"$["say \"hi\""]"#);
        assert_eq!(JsonPath::parse(&p.to_string()).unwrap(), p);
    }

    #[rstest]
    #[case("$", vec![])]
    #[case(" $ ", vec![])]
    #[case(r#"$["a"]"#, vec!["a".into()])]
    #[case(r#"$["a"][0]["b"]"#, vec!["a".into(), 0.into(), "b".into()])]
    #[case(r#"$["]"][12]"#, vec!["]".into(), 12.into()])]
    #[case(r#"$["0"]"#, vec!["0".into()])]
    fn parse_accepts_display_form(#[case] input: &str, #[case] expected: Vec<PathSegment>) {
        assert_eq!(JsonPath::parse(input).unwrap(), path(expected));
    }

    #[rstest]
    #[case("a", ParsePathError::MissingRoot)]
    #[case("$.a", ParsePathError::ExpectedBracket { found: '.' })]
    #[case(r#"$["a""#, ParsePathError::Unterminated)]
    #[case(r#"$["a]"#, ParsePathError::Unterminated)]
    #[case("$[-1]", ParsePathError::InvalidIndex("-1".to_owned()))]
    #[case("$[]", ParsePathError::InvalidIndex(String::new()))]
    fn parse_rejects_malformed_paths(#[case] input: &str, #[case] expected: ParsePathError) {
        assert_eq!(JsonPath::parse(input).unwrap_err(), expected);
    }

    #[test]
    fn serde_shape_is_a_mixed_array() {
        let p = path(vec!["a".into(), 0.into(), "b".into()]);
        assert_eq!(serde_json::to_value(&p).unwrap(), json!(["a", 0, "b"]));
        let back: JsonPath = serde_json::from_value(json!(["a", 0, "b"])).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_value::<JsonPath>(json!([-1])).is_err());
    }

    #[test]
    fn resolve_walks_objects_and_arrays() {
        let doc = json!({"a": [{"b": 1}, {"b": 2}]});
        let p = path(vec!["a".into(), 1.into(), "b".into()]);
        assert_eq!(p.resolve(&doc).unwrap(), &json!(2));
        assert_eq!(JsonPath::root().resolve(&doc).unwrap(), &doc);
    }

    #[test]
    fn resolve_missing_key_is_path_not_found() {
        let doc = json!({"a": 1});
        let err = path(vec!["z".into()]).resolve(&doc).unwrap_err();
        assert_eq!(err.resolved(), &JsonPath::root());
        assert_eq!(err.segment(), &PathSegment::key("z"));
        assert_eq!(err.found(), ValueKind::Object);
    }

    #[test]
    fn resolve_rejects_wrong_container_kind() {
        let doc = json!({"a": [1, 2], "b": {"0": true}});

        let err = path(vec!["a".into(), "0".into()]).resolve(&doc).unwrap_err();
        assert_eq!(err.found(), ValueKind::Array);

        let err = path(vec!["b".into(), 0.into()]).resolve(&doc).unwrap_err();
        assert_eq!(err.found(), ValueKind::Object);
        assert_eq!(err.resolved().to_string(), r#"$["b"]"#);
    }

    #[test]
    fn resolve_out_of_bounds_index_fails() {
        let doc = json!([1, 2]);
        let err = path(vec![2.into()]).resolve(&doc).unwrap_err();
        assert_eq!(err.to_string(), "path segment [2] not found under $ (array)");
    }

    #[test]
    fn resolve_through_scalar_fails() {
        let doc = json!({"a": "text"});
        let err = path(vec!["a".into(), "b".into()]).resolve(&doc).unwrap_err();
        assert_eq!(err.found(), ValueKind::String);
    }

    #[test]
    fn resolve_mut_allows_in_place_writes() {
        let mut doc = json!({"a": {"b": 1}});
        let p = path(vec!["a".into(), "b".into()]);
        *p.resolve_mut(&mut doc).unwrap() = json!("x");
        assert_eq!(doc, json!({"a": {"b": "x"}}));

        let err = path(vec!["a".into(), "c".into(), "d".into()])
            .resolve_mut(&mut doc)
            .unwrap_err();
        assert_eq!(err.resolved().to_string(), r#"$["a"]"#);
    }
}
