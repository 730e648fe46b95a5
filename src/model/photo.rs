use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use time::serde::timestamp;

/// Client-side pixel offset of the card on the wall, kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub image_url: String,
    pub message: String,
    pub position: Position,
    pub rotation: f64,
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_camel_case_wire_shape() {
        let photo = Photo {
            id: "abc123".to_string(),
            image_url: "http://localhost:8080/photos/abc123.jpg".to_string(),
            message: "hello".to_string(),
            position: Position { x: 10.5, y: -3.0 },
            rotation: 12.0,
            created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        };

        let value = serde_json::to_value(&photo).unwrap();
        assert_eq!(value["imageUrl"], "http://localhost:8080/photos/abc123.jpg");
        assert_eq!(value["position"]["x"], 10.5);
        assert_eq!(value["position"]["y"], -3.0);
        assert_eq!(value["createdAt"], 1_700_000_000);
    }
}
