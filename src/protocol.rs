use crate::types::{Millis, ScoreEntry};
use serde::{Deserialize, Serialize};

/// Message shown to viewers when the trigger is pressed before the indicator is lit
pub const EARLY_PRESS_MESSAGE: &str = "Pressed too early! Test aborted.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    StartTest { name: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Reaction time of the attempt that just finished
    ReactionResult { time: Millis },
    /// Full leaderboard, fastest first
    Leaderboard { scores: Vec<ScoreEntry> },
    Error { message: String },
}

impl ServerMessage {
    pub fn early_press() -> Self {
        ServerMessage::Error {
            message: EARLY_PRESS_MESSAGE.to_string(),
        }
    }
}

/// Serialize an outbound event to its JSON text frame
pub fn encode(msg: &ServerMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

/// Extract the trimmed player name from an inbound frame.
///
/// Returns `None` for anything that is not a well-formed `startTest` with a
/// non-blank name.
pub fn parse_start_request(text: &str) -> Option<String> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::StartTest { name }) => {
            let trimmed = name.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Err(e) => {
            tracing::debug!("Dropping malformed client message: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn encoded(msg: &ServerMessage) -> Value {
        serde_json::from_str(&encode(msg).unwrap()).unwrap()
    }

    #[test]
    fn test_reaction_result_schema() {
        let value = encoded(&ServerMessage::ReactionResult { time: 231 });
        assert_eq!(value, json!({ "type": "reactionResult", "time": 231 }));
    }

    #[test]
    fn test_leaderboard_schema() {
        let value = encoded(&ServerMessage::Leaderboard {
            scores: vec![
                ScoreEntry {
                    name: "Ada".to_string(),
                    time: 180,
                },
                ScoreEntry {
                    name: "Bob".to_string(),
                    time: 240,
                },
            ],
        });
        assert_eq!(
            value,
            json!({
                "type": "leaderboard",
                "scores": [
                    { "name": "Ada", "time": 180 },
                    { "name": "Bob", "time": 240 }
                ]
            })
        );
    }

    #[test]
    fn test_early_press_schema() {
        let value = encoded(&ServerMessage::early_press());
        assert_eq!(
            value,
            json!({ "type": "error", "message": EARLY_PRESS_MESSAGE })
        );
    }

    #[test]
    fn test_parse_start_request_trims_name() {
        let name = parse_start_request(r#"{"type":"startTest","name":"  Ada  "}"#);
        assert_eq!(name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_parse_start_request_ignores_extra_fields() {
        let name = parse_start_request(r#"{"type":"startTest","name":"Ada","color":"red"}"#);
        assert_eq!(name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_parse_start_request_rejects_bad_input() {
        let rejected = [
            r#"{"type":"startTest","name":""}"#,
            r#"{"type":"startTest","name":"   "}"#,
            r#"{"type":"startTest"}"#,
            r#"{"type":"startTest","name":null}"#,
            r#"{"type":"startTest","name":42}"#,
            r#"{"type":"stopTest","name":"Ada"}"#,
            r#"{"name":"Ada"}"#,
            "not json",
            "",
        ];
        for text in rejected {
            assert_eq!(parse_start_request(text), None, "accepted {:?}", text);
        }
    }
}
