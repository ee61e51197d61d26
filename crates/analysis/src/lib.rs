/// Screenplay analysis data model
///
/// Shapes of the scene/beat analysis produced by the remote analysis
/// service, plus the normalized view model the client works on.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

mod emotion;
mod scene;
mod values;
mod visual;

pub use emotion::*;
pub use scene::*;
pub use values::*;
pub use visual::*;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate scene id: {0}")]
    DuplicateSceneId(Ident),
    #[error("duplicate beat id: {0}")]
    DuplicateBeatId(Ident),
    #[error("unrecognized analysis document: {0}")]
    UnknownDocument(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Problems found by [`AnalysisResult::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ModelIssue {
    DuplicateSceneId(Ident),
    DuplicateBeatId(Ident),
    IntensityOutOfRange {
        beat_id: Ident,
        emotion: String,
        intensity: f64,
    },
    ConfidenceOutOfRange {
        beat_id: Ident,
        emotion: String,
        confidence: f64,
    },
    InvalidHexColor {
        beat_id: Ident,
        color: String,
    },
}

impl ModelIssue {
    /// Duplicate identifiers break selection; everything else is cosmetic.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ModelIssue::DuplicateSceneId(_) | ModelIssue::DuplicateBeatId(_)
        )
    }
}

impl std::fmt::Display for ModelIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelIssue::DuplicateSceneId(id) => write!(f, "duplicate scene id {id}"),
            ModelIssue::DuplicateBeatId(id) => write!(f, "duplicate beat id {id}"),
            ModelIssue::IntensityOutOfRange {
                beat_id,
                emotion,
                intensity,
            } => write!(
                f,
                "beat {beat_id}: {emotion} intensity {intensity} outside 0-100"
            ),
            ModelIssue::ConfidenceOutOfRange {
                beat_id,
                emotion,
                confidence,
            } => write!(
                f,
                "beat {beat_id}: {emotion} confidence {confidence} outside 0-1"
            ),
            ModelIssue::InvalidHexColor { beat_id, color } => {
                write!(f, "beat {beat_id}: invalid hex color {color:?}")
            }
        }
    }
}

/// Position of a beat inside an [`AnalysisResult`].
///
/// Selection is held as this index pair rather than a cloned beat, so it
/// always resolves against the result it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeatRef {
    pub scene: usize,
    pub beat: usize,
}

/// Normalized analysis for one screenplay: the view model shared by the
/// timeline and the inspector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scenes: Vec<Scene>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pacing: Option<PacingMetadata>,
}

impl AnalysisResult {
    /// Wraps a single scene payload the way the service result is shown:
    /// one scene, pacing lifted from the scene's `pacing_metadata`.
    pub fn from_scene(scene: Scene) -> Self {
        let pacing = scene.pacing_metadata.clone();
        Self {
            scenes: vec![scene],
            pacing,
        }
    }

    /// Parses the JSON-encoded scene carried in a job's `result_json`.
    pub fn from_result_json(raw: &str) -> Result<Self, ModelError> {
        let scene: Scene = serde_json::from_str(raw)?;
        Ok(Self::from_scene(scene))
    }

    /// Loads a saved document: a session export (`{"analysis": ...}`), a
    /// view model (`{"scenes": [...]}`) or a bare scene (`{"beats": [...]}`).
    pub fn from_document(doc: Value) -> Result<Self, ModelError> {
        let doc = match doc {
            Value::Object(mut map) if map.contains_key("analysis") => map
                .remove("analysis")
                .unwrap_or(Value::Null),
            other => other,
        };

        let (has_scenes, has_beats) = match doc.as_object() {
            Some(map) => (map.contains_key("scenes"), map.contains_key("beats")),
            None => {
                return Err(ModelError::UnknownDocument(format!(
                    "expected a JSON object, got {}",
                    json_kind(&doc)
                )))
            }
        };

        if has_scenes {
            Ok(serde_json::from_value(doc)?)
        } else if has_beats {
            Ok(Self::from_scene(serde_json::from_value(doc)?))
        } else {
            Err(ModelError::UnknownDocument(
                "expected `analysis`, `scenes` or `beats`".to_string(),
            ))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn beat_count(&self) -> usize {
        self.scenes.iter().map(|s| s.beats.len()).sum()
    }

    /// All beats in display order with their positions.
    pub fn beats(&self) -> impl Iterator<Item = (BeatRef, &Beat)> {
        self.scenes.iter().enumerate().flat_map(|(si, scene)| {
            scene
                .beats
                .iter()
                .enumerate()
                .map(move |(bi, beat)| (BeatRef { scene: si, beat: bi }, beat))
        })
    }

    pub fn beat(&self, at: BeatRef) -> Option<&Beat> {
        self.scenes.get(at.scene)?.beats.get(at.beat)
    }

    pub fn scene(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    /// First beat whose id matches.
    pub fn find_beat(&self, id: &Ident) -> Option<BeatRef> {
        self.beats()
            .find(|(_, beat)| &beat.beat_id == id)
            .map(|(at, _)| at)
    }

    /// Like [`find_beat`](Self::find_beat) but for an id typed by a user.
    pub fn find_beat_str(&self, raw: &str) -> Option<BeatRef> {
        self.beats()
            .find(|(_, beat)| beat.beat_id.matches(raw))
            .map(|(at, _)| at)
    }

    /// Reports every model problem; see [`ModelIssue::is_fatal`].
    pub fn validate(&self) -> Vec<ModelIssue> {
        let mut issues = Vec::new();
        let mut scene_ids = HashSet::new();
        let mut beat_ids = HashSet::new();

        for scene in &self.scenes {
            if let Some(id) = &scene.scene_id {
                if !scene_ids.insert(id) {
                    issues.push(ModelIssue::DuplicateSceneId(id.clone()));
                }
            }

            for beat in &scene.beats {
                if !beat_ids.insert(&beat.beat_id) {
                    issues.push(ModelIssue::DuplicateBeatId(beat.beat_id.clone()));
                }

                for reading in beat.emotional_arc.readings() {
                    if !reading.intensity_in_range() {
                        issues.push(ModelIssue::IntensityOutOfRange {
                            beat_id: beat.beat_id.clone(),
                            emotion: reading.emotion.clone(),
                            intensity: reading.intensity,
                        });
                    }
                    if let Some(confidence) = reading.confidence {
                        if !(0.0..=1.0).contains(&confidence) {
                            issues.push(ModelIssue::ConfidenceOutOfRange {
                                beat_id: beat.beat_id.clone(),
                                emotion: reading.emotion.clone(),
                                confidence,
                            });
                        }
                    }
                }

                let palette = beat
                    .visual_signals
                    .as_ref()
                    .and_then(|v| v.color_palette.as_ref());
                if let Some(palette) = palette {
                    for color in palette.colors().filter(|c| !c.is_valid()) {
                        issues.push(ModelIssue::InvalidHexColor {
                            beat_id: beat.beat_id.clone(),
                            color: color.to_string(),
                        });
                    }
                }
            }
        }

        issues
    }

    /// Fails on the first duplicate scene or beat id.
    pub fn ensure_unique_ids(&self) -> Result<(), ModelError> {
        match self.validate().into_iter().find(ModelIssue::is_fatal) {
            Some(ModelIssue::DuplicateSceneId(id)) => Err(ModelError::DuplicateSceneId(id)),
            Some(ModelIssue::DuplicateBeatId(id)) => Err(ModelError::DuplicateBeatId(id)),
            _ => Ok(()),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
