use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Parse a query parameter, treating blank or malformed values as absent.
pub fn lenient<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Validate an ID list whose length must fall in `min..=max` with no duplicates.
pub fn validate_id_list(ids: &[String], name: &str, min: usize, max: usize) -> Result<(), AppError> {
    if ids.len() < min || ids.len() > max {
        return Err(AppError::Validation(format!(
            "{name} must contain between {min} and {max} ids"
        )));
    }
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(AppError::Validation(format!("{name} contains a blank id")));
        }
        if !seen.insert(id.as_str()) {
            return Err(AppError::Validation(format!("Duplicate {name} id: {id}")));
        }
    }
    Ok(())
}
