//! Custom serde deserialization helpers.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Deserializes an optional value from its string form, treating a
/// missing parameter or an empty string as `None`.
///
/// Query-string parameters always arrive as strings and HTML forms
/// submit empty strings for untouched inputs; both should read as "not
/// provided" rather than a parse error.
pub fn deserialize_optional_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
