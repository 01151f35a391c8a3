// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor configuration.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `JSONODE_INDENT` | `2` | Spaces per level when the document is re-serialized (`0` = compact) |
//! | `JSONODE_RESYNC_DELAY_MS` | `50` | Delay before (and between) post-commit node lookups |
//! | `JSONODE_COERCE` | `verbatim` | `verbatim` or `match-existing`, see [`CoercionPolicy`] |

use std::fmt;
use std::time::Duration;

use crate::format::json::DEFAULT_INDENT;
use crate::ops::{CoercionPolicy, CommitOptions};
use crate::sync::DEFAULT_RESYNC_DELAY;

const ENV_INDENT: &str = "JSONODE_INDENT";
const ENV_RESYNC_DELAY_MS: &str = "JSONODE_RESYNC_DELAY_MS";
const ENV_COERCE: &str = "JSONODE_COERCE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    pub indent: usize,
    pub resync_delay: Duration,
    pub coercion: CoercionPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            resync_delay: DEFAULT_RESYNC_DELAY,
            coercion: CoercionPolicy::default(),
        }
    }
}

impl EditorConfig {
    /// Defaults overridden by any `JSONODE_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_INDENT) {
            config.indent = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(ENV_INDENT, &raw, "expected a non-negative integer"))?;
        }

        if let Some(raw) = lookup(ENV_RESYNC_DELAY_MS) {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(ENV_RESYNC_DELAY_MS, &raw, "expected milliseconds"))?;
            config.resync_delay = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup(ENV_COERCE) {
            config.coercion = raw
                .parse::<CoercionPolicy>()
                .map_err(|err| ConfigError::invalid(ENV_COERCE, &raw, &err.to_string()))?;
        }

        Ok(config)
    }

    pub fn commit_options(&self) -> CommitOptions {
        CommitOptions { indent: self.indent, coercion: self.coercion }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { var: &'static str, value: String, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: &str) -> Self {
        Self::Invalid { var, value: value.to_owned(), reason: reason.to_owned() }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { var, value, reason } => write!(f, "invalid {var}={value:?}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}
