//! YAML rendering of a pipeline document.
//!
//! Struct field order is kept, sequence items sit at their key's
//! indentation and multi-line strings become literal block scalars. Empty
//! collections are written as a bare `key:`.
//!
//! The text is for display and copy-out only and is never parsed back.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::Result;

/// `key: []` or `key: {}` at the end of a line. Quoted or block scalar text
/// never matches: keys are plain identifiers.
static EMPTY_COLLECTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^( *(?:- )?[A-Za-z0-9_.-]+): (?:\[\]|\{\})$").unwrap());

/// Render a serializable value as YAML text.
pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let text = serde_yaml::to_string(value)?;
    Ok(EMPTY_COLLECTION.replace_all(&text, "$1:").into_owned())
}
