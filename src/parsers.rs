/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::errors::{OpenPhotoError, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

// Empty, zero, false and null values count as "no data"
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

// Parses UNIX seconds given either as a number or a numeric string
pub fn from_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let secs = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    DateTime::from_timestamp(secs, 0)
}

// Ids travel as strings or numbers
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Ids are free text (tags especially) and go into paths as one segment
pub fn path_id(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Rejects option keys outside of `allowed`, naming every offending key
pub fn check_known_options(options: &Map<String, Value>, allowed: &[&str]) -> Result<()> {
    let mut unknown: Vec<&str> = options
        .keys()
        .map(String::as_str)
        .filter(|k| !allowed.contains(k))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    Err(OpenPhotoError::InvalidArgument(format!(
        "'{}': invalid keyword argument(s) for this function",
        unknown.join("', '")
    )))
}
