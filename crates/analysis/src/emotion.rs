use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lowest and highest intensity the service reports.
pub const INTENSITY_RANGE: (f64, f64) = (0.0, 100.0);

/// One emotion detected in a beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    /// Emotion label, e.g. `"betrayal"`
    #[serde(default)]
    pub emotion: String,

    /// Intensity in [0, 100]
    #[serde(default)]
    pub intensity: f64,

    /// primary / secondary / tertiary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Detector confidence in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EmotionReading {
    pub fn new(emotion: impl Into<String>, intensity: f64) -> Self {
        Self {
            emotion: emotion.into(),
            intensity,
            category: None,
            confidence: None,
            extra: Map::new(),
        }
    }

    pub fn intensity_in_range(&self) -> bool {
        self.intensity >= INTENSITY_RANGE.0 && self.intensity <= INTENSITY_RANGE.1
    }

    /// Badge text as shown in the timeline: `joy (80%)`.
    pub fn badge(&self) -> String {
        format!("{} ({}%)", self.emotion, self.intensity)
    }
}

/// Emotional profile of a beat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionalArc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_emotion: Option<EmotionReading>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_emotions: Vec<EmotionReading>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_intensity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixed_emotions: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EmotionalArc {
    pub fn with_primary(primary: EmotionReading) -> Self {
        Self {
            primary_emotion: Some(primary),
            ..Default::default()
        }
    }

    pub fn readings(&self) -> impl Iterator<Item = &EmotionReading> {
        self.primary_emotion
            .iter()
            .chain(self.secondary_emotions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_from_service_payload() {
        let reading: EmotionReading = serde_json::from_str(
            r#"{"emotion":"joy","category":"primary","confidence":0.9,"intensity":80}"#,
        )
        .unwrap();
        assert_eq!(reading.emotion, "joy");
        assert_eq!(reading.intensity, 80.0);
        assert_eq!(reading.category.as_deref(), Some("primary"));
        assert_eq!(reading.badge(), "joy (80%)");
        assert!(reading.intensity_in_range());
    }

    #[test]
    fn test_arc_keeps_unknown_fields() {
        let arc: EmotionalArc = serde_json::from_str(
            r#"{"scene_id":"1","segment_id":"1-1","primary_emotion":{"emotion":"fear","intensity":40}}"#,
        )
        .unwrap();
        assert_eq!(arc.extra.get("segment_id"), Some(&Value::from("1-1")));
        assert_eq!(arc.readings().count(), 1);

        let back = serde_json::to_value(&arc).unwrap();
        assert_eq!(back["scene_id"], "1");
    }
}
