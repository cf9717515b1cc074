//! LINE Messaging API request payloads.

use serde::Serialize;

/// Body of a push request: one recipient, up to five message objects.
#[derive(Debug, Clone, Serialize)]
pub struct PushRequest {
    /// Recipient user ID.
    pub to: String,

    /// Message objects to deliver.
    pub messages: Vec<TextMessage>,
}

/// A `text`-type message object.
#[derive(Debug, Clone, Serialize)]
pub struct TextMessage {
    #[serde(rename = "type")]
    pub message_type: String,

    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            message_type: "text".to_string(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_request_wire_format() {
        let request = PushRequest {
            to: "U123".to_string(),
            messages: vec![TextMessage::new("hello")],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "to": "U123",
                "messages": [{"type": "text", "text": "hello"}]
            })
        );
    }
}
