use serde_json::Value;
use thiserror::Error;

use crate::model::photo::Position;
use crate::utils::sanitize_message;

pub const MAX_ID_LEN: usize = 100;

pub const MIN_ROTATION: f64 = -180.0;
pub const MAX_ROTATION: f64 = 180.0;

/// Validated `photo` part of the upload form. Construction is the only way
/// in, so a value always carries a bounded id, a sanitized message and a
/// rotation inside [-180, 180].
#[derive(Debug, Clone, PartialEq)]
pub struct UploadMetadata {
    pub id: String,
    pub message: String,
    pub position: Position,
    pub rotation: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Invalid photo data format")]
    Format,
    #[error("Invalid photo ID")]
    Id,
    #[error("Invalid message")]
    Message,
    #[error("Invalid position data")]
    Position,
    #[error("Invalid rotation")]
    Rotation,
}

/// Ids become blob file names, so path separators and dot-segments are out.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && !id.contains(['/', '\\'])
        && !id.contains("..")
}

impl UploadMetadata {
    /// Field-by-field validation so each violated constraint reports its own
    /// error, in the same order the checks have always run: format, id,
    /// message, position, rotation.
    pub fn parse(raw: &str) -> Result<Self, MetadataError> {
        let value: Value = serde_json::from_str(raw).map_err(|_| MetadataError::Format)?;

        let id = match value.get("id") {
            Some(Value::String(id)) if is_valid_id(id) => id.clone(),
            _ => return Err(MetadataError::Id),
        };

        let message = match value.get("message") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(message)) => sanitize_message(message),
            Some(_) => return Err(MetadataError::Message),
        };

        let position = value.get("position").ok_or(MetadataError::Position)?;
        let (Some(x), Some(y)) = (
            position.get("x").and_then(Value::as_f64),
            position.get("y").and_then(Value::as_f64),
        ) else {
            return Err(MetadataError::Position);
        };

        let rotation = value
            .get("rotation")
            .and_then(Value::as_f64)
            .ok_or(MetadataError::Rotation)?;
        if !(MIN_ROTATION..=MAX_ROTATION).contains(&rotation) {
            return Err(MetadataError::Rotation);
        }

        Ok(Self {
            id,
            message,
            position: Position { x, y },
            rotation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json() -> serde_json::Value {
        serde_json::json!({
            "id": "card-42",
            "message": "Greetings!",
            "position": { "x": 12.0, "y": 34.5 },
            "rotation": -15.0,
        })
    }

    #[test]
    fn parses_a_valid_payload() {
        let metadata = UploadMetadata::parse(&valid_json().to_string()).unwrap();

        assert_eq!(metadata.id, "card-42");
        assert_eq!(metadata.message, "Greetings!");
        assert_eq!(metadata.position, Position { x: 12.0, y: 34.5 });
        assert_eq!(metadata.rotation, -15.0);
    }

    #[test]
    fn rejects_malformed_json() {
        assert_eq!(UploadMetadata::parse(""), Err(MetadataError::Format));
        assert_eq!(UploadMetadata::parse("{not json"), Err(MetadataError::Format));
    }

    #[test]
    fn rejects_bad_ids() {
        let mut payload = valid_json();

        payload["id"] = serde_json::json!(null);
        assert_eq!(UploadMetadata::parse(&payload.to_string()), Err(MetadataError::Id));

        payload["id"] = serde_json::json!(17);
        assert_eq!(UploadMetadata::parse(&payload.to_string()), Err(MetadataError::Id));

        payload["id"] = serde_json::json!("");
        assert_eq!(UploadMetadata::parse(&payload.to_string()), Err(MetadataError::Id));

        payload["id"] = serde_json::json!("x".repeat(MAX_ID_LEN + 1));
        assert_eq!(UploadMetadata::parse(&payload.to_string()), Err(MetadataError::Id));
    }

    #[test]
    fn rejects_ids_that_escape_the_storage_folder() {
        let mut payload = valid_json();

        for id in ["../secret", "a/b", "a\\b", "photos/.."] {
            payload["id"] = serde_json::json!(id);
            assert_eq!(
                UploadMetadata::parse(&payload.to_string()),
                Err(MetadataError::Id),
                "id: {id}"
            );
        }
    }

    #[test]
    fn message_is_optional_but_must_be_a_string() {
        let mut payload = valid_json();

        payload.as_object_mut().unwrap().remove("message");
        assert_eq!(UploadMetadata::parse(&payload.to_string()).unwrap().message, "");

        payload["message"] = serde_json::json!(42);
        assert_eq!(
            UploadMetadata::parse(&payload.to_string()),
            Err(MetadataError::Message)
        );
    }

    #[test]
    fn message_is_sanitized() {
        let mut payload = valid_json();
        payload["message"] = serde_json::json!("<script>alert(\"hi\")</script> 'quoted'");

        let metadata = UploadMetadata::parse(&payload.to_string()).unwrap();
        assert_eq!(metadata.message, "alert(hi) quoted");
    }

    #[test]
    fn rejects_bad_positions() {
        let mut payload = valid_json();

        payload.as_object_mut().unwrap().remove("position");
        assert_eq!(
            UploadMetadata::parse(&payload.to_string()),
            Err(MetadataError::Position)
        );

        payload["position"] = serde_json::json!({ "x": "12", "y": 3.0 });
        assert_eq!(
            UploadMetadata::parse(&payload.to_string()),
            Err(MetadataError::Position)
        );

        payload["position"] = serde_json::json!({ "x": 12.0 });
        assert_eq!(
            UploadMetadata::parse(&payload.to_string()),
            Err(MetadataError::Position)
        );
    }

    #[test]
    fn rejects_out_of_range_rotations() {
        let mut payload = valid_json();

        for rotation in [-180.1, 180.1, 720.0] {
            payload["rotation"] = serde_json::json!(rotation);
            assert_eq!(
                UploadMetadata::parse(&payload.to_string()),
                Err(MetadataError::Rotation)
            );
        }

        for rotation in [-180.0, 0.0, 180.0] {
            payload["rotation"] = serde_json::json!(rotation);
            assert!(UploadMetadata::parse(&payload.to_string()).is_ok());
        }

        payload.as_object_mut().unwrap().remove("rotation");
        assert_eq!(
            UploadMetadata::parse(&payload.to_string()),
            Err(MetadataError::Rotation)
        );
    }
}
