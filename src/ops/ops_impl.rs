// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jsonode-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Jsonode and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Turns one staged input string into the JSON value written for `key`.
/// `existing` is the field's current value in the working copy, if any.
fn coerce_staged(existing: Option<&Value>, raw: &str, coercion: CoercionPolicy) -> Value {
    if coercion == CoercionPolicy::Verbatim {
        return Value::String(raw.to_owned());
    }

    match existing {
        Some(Value::Number(_)) => {
            parse_number(raw).map(Value::Number).unwrap_or_else(|| Value::String(raw.to_owned()))
        }
        Some(Value::Bool(_)) => match raw.trim() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(raw.to_owned()),
        },
        // Null stringifies to "" in write mode, so an untouched input keeps the null.
        Some(Value::Null) if raw.is_empty() || raw.trim() == "null" => Value::Null,
        _ => Value::String(raw.to_owned()),
    }
}

fn parse_number(raw: &str) -> Option<serde_json::Number> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str::<serde_json::Number>(trimmed).ok()
}
