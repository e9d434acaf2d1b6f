//! Wire protocol for the state stream.
//!
//! Two framings reach the view:
//! - Enveloped: `{"type": "message", "payload": "<json string>"}`
//! - Length-prefixed: six opaque characters followed by a JSON board

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::board::{BoardError, GameState};

/// Required value of the envelope `type` field.
pub const MESSAGE_TYPE: &str = "message";

/// Width of the length-prefixed framing header, in characters.
pub const PREFIX_CHARS: usize = 6;

/// Decoding error.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unexpected message type {found:?}, expected \"message\"")]
    Protocol { found: String },
    #[error("Envelope has no payload")]
    MissingPayload,
    #[error("Envelope payload is not a JSON string")]
    PayloadNotString,
    #[error("Frame has {len} characters, shorter than the 6-character prefix")]
    ShortFrame { len: usize },
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid board: {0}")]
    Shape(#[from] BoardError),
}

/// Framing of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// JSON object with a `type` discriminator and a string `payload`.
    Enveloped,
    /// Fixed-width prefix followed by a bare JSON board.
    LengthPrefixed,
}

impl WireFormat {
    /// Classify a raw message by its shape.
    #[must_use]
    pub fn probe(raw: &str) -> Self {
        match Frame::parse(raw) {
            Frame::Enveloped(_) => Self::Enveloped,
            Frame::LengthPrefixed(_) => Self::LengthPrefixed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<Value>,
    payload: Option<Value>,
}

impl Envelope {
    fn open(self) -> Result<GameState, DecodeError> {
        match self.kind {
            None => {}
            Some(Value::String(kind)) if kind == MESSAGE_TYPE => {}
            Some(Value::String(found)) => return Err(DecodeError::Protocol { found }),
            Some(other) => {
                return Err(DecodeError::Protocol {
                    found: other.to_string(),
                });
            }
        }

        let payload = match self.payload {
            None | Some(Value::Null) => return Err(DecodeError::MissingPayload),
            Some(Value::String(payload)) => payload,
            Some(_) => return Err(DecodeError::PayloadNotString),
        };

        let value: Value = serde_json::from_str(&payload)?;
        Ok(GameState::from_value(&value)?)
    }
}

enum Frame<'a> {
    Enveloped(Envelope),
    LengthPrefixed(&'a str),
}

impl<'a> Frame<'a> {
    /// An object carrying `type` or `payload` is an envelope; anything else
    /// is assumed to start with the fixed-width prefix.
    fn parse(raw: &'a str) -> Self {
        if raw.trim_start().starts_with('{') {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
                if map.contains_key("type") || map.contains_key("payload") {
                    if let Ok(envelope) = serde_json::from_value(Value::Object(map)) {
                        return Self::Enveloped(envelope);
                    }
                }
            }
        }
        Self::LengthPrefixed(raw)
    }
}

fn strip_prefix(raw: &str) -> Result<&str, DecodeError> {
    let mut indices = raw.char_indices().skip(PREFIX_CHARS);
    match indices.next() {
        Some((at, _)) => Ok(&raw[at..]),
        None => {
            let len = raw.chars().count();
            if len < PREFIX_CHARS {
                Err(DecodeError::ShortFrame { len })
            } else {
                Ok("")
            }
        }
    }
}

/// Decode one raw message into a game state.
///
/// # Errors
/// Returns a [`DecodeError`] for a mismatched discriminator, malformed JSON,
/// a short frame or a board of the wrong shape. No partial state is produced.
pub fn decode(raw: &str) -> Result<GameState, DecodeError> {
    match Frame::parse(raw) {
        Frame::Enveloped(envelope) => envelope.open(),
        Frame::LengthPrefixed(raw) => {
            let body = strip_prefix(raw)?;
            let value: Value = serde_json::from_str(body)?;
            Ok(GameState::from_value(&value)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enveloped_wrapped_board() {
        let raw = r#"{"type":"message","payload":"{\"board\":[[\"O\"]]}"}"#;
        assert_eq!(WireFormat::probe(raw), WireFormat::Enveloped);

        let state = decode(raw).unwrap();
        assert_eq!(state.board.dimensions(), (1, 1));
        assert_eq!(state.board.get(0, 0), Some("O"));
    }

    #[test]
    fn test_enveloped_bare_board() {
        let raw = r#"{"type":"message","payload":"[[\"X\",\"\"],[\"\",\"O\"]]"}"#;
        let state = decode(raw).unwrap();
        let cells: Vec<_> = state.board.cells().collect();
        assert_eq!(cells, ["X", "", "", "O"]);
    }

    #[test]
    fn test_enveloped_engine_state() {
        let payload = serde_json::json!({
            "type": "state",
            "board": [["X", null, null], [null, "O", null], [null, null, "X"]],
            "winner": null
        })
        .to_string();
        let raw = serde_json::json!({"type": "message", "payload": payload}).to_string();

        let state = decode(&raw).unwrap();
        assert_eq!(state.board.get(0, 0), Some("X"));
        assert_eq!(state.board.get(0, 1), Some(""));
        assert_eq!(state.winner, None);
    }

    #[test]
    fn test_envelope_without_discriminator() {
        let raw = r#"{"payload":"[[\"X\"]]"}"#;
        assert_eq!(decode(raw).unwrap().board.get(0, 0), Some("X"));
    }

    #[test]
    fn test_discriminator_mismatch() {
        let raw = r#"{"type":"close","payload":"[[\"X\"]]"}"#;
        match decode(raw) {
            Err(DecodeError::Protocol { found }) => assert_eq!(found, "close"),
            other => panic!("expected protocol error, got {other:?}"),
        }

        let raw = r#"{"type":7,"payload":"[[\"X\"]]"}"#;
        assert!(matches!(decode(raw), Err(DecodeError::Protocol { .. })));
    }

    #[test]
    fn test_bad_payloads() {
        assert!(matches!(
            decode(r#"{"type":"message"}"#),
            Err(DecodeError::MissingPayload)
        ));
        assert!(matches!(
            decode(r#"{"type":"message","payload":[["X"]]}"#),
            Err(DecodeError::PayloadNotString)
        ));
        assert!(matches!(
            decode(r#"{"type":"message","payload":"[[\"X\""}"#),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(
            decode(r#"{"type":"message","payload":"{\"board\":\"X\"}"}"#),
            Err(DecodeError::Shape(BoardError::NotRows))
        ));
    }

    #[test]
    fn test_length_prefixed() {
        let raw = r#"000037[["X","",""],["","O",""],["","","X"]]"#;
        assert_eq!(WireFormat::probe(raw), WireFormat::LengthPrefixed);

        let state = decode(raw).unwrap();
        assert_eq!(state.board.dimensions(), (3, 3));
        assert_eq!(state.board.get(2, 2), Some("X"));
    }

    #[test]
    fn test_prefix_counts_characters() {
        let raw = "ééééé1[[\"O\"]]";
        assert_eq!(decode(raw).unwrap().board.get(0, 0), Some("O"));
    }

    #[test]
    fn test_short_frame() {
        assert!(matches!(
            decode("00012"),
            Err(DecodeError::ShortFrame { len: 5 })
        ));
        assert!(matches!(decode(""), Err(DecodeError::ShortFrame { len: 0 })));
        // exactly the prefix leaves an empty body
        assert!(matches!(decode("000000"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_unprefixed_board_is_rejected() {
        // without the header the first six characters of the JSON are eaten
        assert!(decode(r#"[["X","O"]]"#).is_err());
    }

    #[test]
    fn test_decode_is_repeatable() {
        for raw in [
            r#"{"type":"message","payload":"{\"board\":[[\"X\",\"O\"]]}"}"#,
            r#"abcdef[["X","O"]]"#,
        ] {
            assert_eq!(decode(raw).unwrap(), decode(raw).unwrap());
        }
    }
}
