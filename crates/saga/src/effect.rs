//! Inert effect descriptions yielded by sagas.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One requested operation, described as plain data.
///
/// Sagas never perform IO themselves. At each suspension point a saga hands
/// one of these to the interpreter, which fulfills it and resumes the saga
/// with the outcome. An effect is created fresh per step and consumed exactly
/// once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Suspend until the given duration has elapsed.
    Wait(Duration),
    /// Hand a message to the external dispatch bus, suspending until the bus
    /// accepts it.
    Emit(Message),
}

/// A message handed to the dispatch bus via [`Effect::Emit`].
///
/// Opaque to this crate: the kind label and optional payload are owned by
/// whatever store or bus receives them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Kind label, e.g. `"INCREMENT"`.
    pub kind: String,
    /// Optional payload, uninterpreted here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl Message {
    /// A message with a kind label and no payload.
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Message {
            kind: kind.into(),
            payload: None,
        }
    }

    /// A message carrying a payload.
    pub fn with_payload(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Message {
            kind: kind.into(),
            payload: Some(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_payload_is_omitted_from_serialized_form() {
        let json = serde_json::to_value(Message::of_kind("INCREMENT")).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "INCREMENT" }));
    }
}
