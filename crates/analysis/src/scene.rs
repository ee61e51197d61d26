use crate::emotion::EmotionalArc;
use crate::values::Ident;
use crate::visual::VisualSignals;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pacing summary for a beat, a scene, or the whole screenplay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PacingMetadata {
    /// Numeric pace score (roughly 0-10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_pace: Option<f64>,

    /// Qualitative label, e.g. "Moderate"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_pacing: Option<String>,

    /// Suggested editing BPM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,

    /// very_slow .. very_fast
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhythm: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Scene heading details as parsed by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Smallest analyzed unit of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    pub beat_id: Ident,

    #[serde(default)]
    pub emotional_arc: EmotionalArc,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_signals: Option<VisualSignals>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pacing: Option<PacingMetadata>,

    /// dialogue, action, characters, timestamps...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Beat {
    pub fn new(beat_id: impl Into<Ident>) -> Self {
        Self {
            beat_id: beat_id.into(),
            emotional_arc: EmotionalArc::default(),
            visual_signals: None,
            pacing: None,
            extra: Map::new(),
        }
    }

    pub fn with_arc(mut self, arc: EmotionalArc) -> Self {
        self.emotional_arc = arc;
        self
    }

    pub fn with_visual_signals(mut self, signals: VisualSignals) -> Self {
        self.visual_signals = Some(signals);
        self
    }

    /// Primary emotion label, `neutral` when none was detected.
    pub fn primary_emotion_label(&self) -> &str {
        self.emotional_arc
            .primary_emotion
            .as_ref()
            .map(|p| p.emotion.as_str())
            .filter(|e| !e.is_empty())
            .unwrap_or("neutral")
    }

    /// Primary emotion intensity, 0 when none was detected.
    pub fn primary_intensity(&self) -> f64 {
        self.emotional_arc
            .primary_emotion
            .as_ref()
            .map(|p| p.intensity)
            .unwrap_or(0.0)
    }
}

/// Ordered group of beats sharing a location.
///
/// This is also the payload the service returns as `result` (and encodes
/// in a job's `result_json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<Ident>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_metadata: Option<ScriptMetadata>,

    #[serde(default)]
    pub beats: Vec<Beat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pacing_metadata: Option<PacingMetadata>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Scene {
    pub fn new(scene_id: impl Into<Ident>) -> Self {
        Self {
            scene_id: Some(scene_id.into()),
            ..Default::default()
        }
    }

    pub fn with_beats(mut self, beats: Vec<Beat>) -> Self {
        self.beats = beats;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Location label, falling back to the parsed scene heading.
    pub fn location_label(&self) -> Option<&str> {
        self.location
            .as_deref()
            .or_else(|| {
                self.script_metadata
                    .as_ref()
                    .and_then(|m| m.location.as_deref())
            })
            .filter(|l| !l.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_scene_round_trip() {
        let raw = r#"{"scene_id":1,"beats":[]}"#;
        let scene: Scene = serde_json::from_str(raw).unwrap();
        assert_eq!(scene.scene_id, Some(Ident::Int(1)));
        assert!(scene.beats.is_empty());
        assert!(scene.pacing_metadata.is_none());
        assert_eq!(serde_json::to_string(&scene).unwrap(), raw);
    }

    #[test]
    fn test_service_scene_payload() {
        let scene: Scene = serde_json::from_str(
            r#"{
                "analysis_id": "scene_001",
                "script_metadata": {"scene_number": "12", "location": "SARAH'S APARTMENT", "time_of_day": "INT. NIGHT"},
                "beats": [{
                    "beat_id": "beat_001",
                    "beat_number": 1,
                    "dialogue": ["Hello"],
                    "emotional_arc": {"primary_emotion": {"emotion": "betrayal", "intensity": 85}, "overall_intensity": 85}
                }],
                "pacing_metadata": {"average_pace": 6.5, "overall_pacing": "Brisk"}
            }"#,
        )
        .unwrap();

        assert!(scene.scene_id.is_none());
        assert_eq!(scene.location_label(), Some("SARAH'S APARTMENT"));
        assert_eq!(scene.beats[0].primary_emotion_label(), "betrayal");
        assert_eq!(scene.beats[0].primary_intensity(), 85.0);
        assert_eq!(scene.beats[0].extra["beat_number"], 1);
        assert_eq!(
            scene.pacing_metadata.as_ref().and_then(|p| p.average_pace),
            Some(6.5)
        );
    }

    #[test]
    fn test_beat_without_primary_emotion() {
        let beat: Beat = serde_json::from_str(r#"{"beat_id": 3}"#).unwrap();
        assert_eq!(beat.primary_emotion_label(), "neutral");
        assert_eq!(beat.primary_intensity(), 0.0);
    }
}
