//! Typed view over `/predict/` detection responses.
//!
//! The detector is lenient about field names and omissions, so every
//! field is optional with a display fallback.

use serde::Deserialize;
use serde_json::Value;

/// One detected object in a photo.
#[derive(Debug, Clone, Deserialize)]
pub struct Detection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub xmin: Option<f64>,
    #[serde(default)]
    pub ymin: Option<f64>,
    #[serde(default)]
    pub xmax: Option<f64>,
    #[serde(default)]
    pub ymax: Option<f64>,
    #[serde(default, rename = "class")]
    pub class_id: Option<i64>,
}

/// Axis-aligned box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Detection {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let xmin = self.xmin.unwrap_or(0.0);
        let ymin = self.ymin.unwrap_or(0.0);
        BoundingBox {
            x: xmin,
            y: ymin,
            width: self.xmax.unwrap_or(0.0) - xmin,
            height: self.ymax.unwrap_or(0.0) - ymin,
        }
    }
}

/// Pull the detection list out of a raw `/predict/` response.
///
/// Missing or malformed `detections` yields an empty list; individual
/// malformed entries are skipped.
pub fn detections_from_response(response: &Value) -> Vec<Detection> {
    let Some(entries) = response.get("detections").and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_full_detection() {
        let response = json!({
            "detections": [
                {"name": "apple", "confidence": 0.91, "xmin": 10.0, "ymin": 20.0, "xmax": 110.0, "ymax": 70.0, "class": 47}
            ]
        });
        let detections = detections_from_response(&response);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].display_name(), "apple");

        let bbox = detections[0].bounding_box();
        assert_eq!(bbox.width, 100.0);
        assert_eq!(bbox.height, 50.0);
    }

    #[test]
    fn missing_fields_get_fallbacks() {
        let response = json!({"detections": [{}]});
        let detections = detections_from_response(&response);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].display_name(), "Unknown");
        assert_eq!(detections[0].bounding_box().width, 0.0);
    }

    #[test]
    fn absent_detections_key_yields_empty() {
        assert!(detections_from_response(&json!({})).is_empty());
        assert!(detections_from_response(&json!({"detections": "nope"})).is_empty());
    }
}
