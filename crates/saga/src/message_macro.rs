//! Macro for reducing message-construction boilerplate.

/// Build a [`Message`](crate::Message) from a kind label and an optional
/// `serde_json::json!`-style payload.
///
/// # Example
///
/// ```ignore
/// use saga_core::message;
///
/// let plain = message!("INCREMENT");
/// let with_payload = message!("INCREMENT_BY", { "amount": 5 });
/// ```
#[macro_export]
macro_rules! message {
    ($kind:expr) => {
        $crate::Message::of_kind($kind)
    };
    ($kind:expr, $payload:tt) => {
        $crate::Message::with_payload($kind, serde_json::json!($payload))
    };
}

#[cfg(test)]
mod tests {
    use crate::Message;

    #[test]
    fn builds_messages_with_and_without_payloads() {
        assert_eq!(crate::message!("INCREMENT"), Message::of_kind("INCREMENT"));

        let message = crate::message!("INCREMENT_BY", { "amount": 5 });
        assert_eq!(message.kind, "INCREMENT_BY");
        assert_eq!(message.payload, Some(serde_json::json!({ "amount": 5 })));
    }
}
