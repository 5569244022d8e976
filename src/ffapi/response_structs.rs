//! Response structures for the remote services.
//!
//! This module contains structures for deserializing JSON responses from the
//! action endpoints and from the item metadata list.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

use crate::ffapi::SUCCESS_STATUS;

/// Body returned by `/emote`, `/5group`, `/6group` and `/lag`.
///
/// Every field is optional: a body without `status`, or with a non string one,
/// is simply not a success. `wait_seconds` is only sent by the lag endpoint.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ActionResponse {
    /// `"success"` when the action was accepted.
    #[serde(default)]
    pub status: Option<Value>,
    /// Human readable outcome, shown to the user as is.
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    /// Seconds before the lag request takes effect.
    #[serde(default)]
    pub wait_seconds: Option<Value>,
}

impl ActionResponse {
    /// Whether `status` is exactly the string `success`.
    pub fn is_success(&self) -> bool {
        matches!(&self.status, Some(Value::String(status)) if status == SUCCESS_STATUS)
    }

    /// Renders `wait_seconds` for display, `N/A` when absent.
    pub fn wait_seconds_label(&self) -> String {
        match &self.wait_seconds {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "N/A".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

impl fmt::Display for ActionResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "status={:?}, message={}, wait_seconds={:?}",
            self.status, self.message, self.wait_seconds
        )
    }
}

/// Strings as is, `null` as empty, any other value as its JSON text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// An entry of the item metadata list.
///
/// The upstream list mixes numeric and string ids, so `Id` is kept raw and
/// compared through [`ItemRecord::id_string`].
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ItemRecord {
    /// Item id, number or string.
    #[serde(rename = "Id", default)]
    pub id: Value,
    /// Display name of the item.
    #[serde(default)]
    pub name: Option<String>,
}

impl ItemRecord {
    /// Id as a string, numbers without quotes.
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
