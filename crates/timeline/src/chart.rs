/// Emotional arc chart data
use analysis::{AnalysisResult, BeatRef, Ident};
use serde::Serialize;

/// Shown for emotions missing from [`EMOTION_COLORS`].
pub const DEFAULT_EMOTION_COLOR: &str = "#6b7280";

pub const EMOTION_COLORS: [(&str, &str); 10] = [
    ("joy", "#fbbf24"),
    ("happiness", "#fbbf24"),
    ("sadness", "#3b82f6"),
    ("melancholy", "#3b82f6"),
    ("anger", "#ef4444"),
    ("fear", "#8b5cf6"),
    ("anxiety", "#8b5cf6"),
    ("surprise", "#f59e0b"),
    ("tension", "#dc2626"),
    ("disgust", "#10b981"),
];

/// Display color for an emotion label (case-insensitive).
pub fn emotion_color(emotion: &str) -> &'static str {
    EMOTION_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(emotion.trim()))
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_EMOTION_COLOR)
}

/// One point on the emotional arc.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// `S1.B2`, or `Scene 3` for a scene without beats
    pub name: String,
    pub scene_id: Option<Ident>,
    pub beat_id: Option<Ident>,
    pub intensity: f64,
    pub emotion: String,
    /// Absent for placeholder points
    #[serde(skip)]
    pub beat: Option<BeatRef>,
}

impl ChartPoint {
    pub fn color(&self) -> &'static str {
        emotion_color(&self.emotion)
    }
}

/// One point per beat in display order; a scene without beats yields a
/// single neutral placeholder.
pub fn chart_points(result: &AnalysisResult) -> Vec<ChartPoint> {
    let mut points = Vec::with_capacity(result.beat_count() + result.scenes.len());

    for (si, scene) in result.scenes.iter().enumerate() {
        if scene.beats.is_empty() {
            points.push(ChartPoint {
                name: format!("Scene {}", si + 1),
                scene_id: scene.scene_id.clone(),
                beat_id: None,
                intensity: 0.0,
                emotion: "neutral".to_string(),
                beat: None,
            });
            continue;
        }

        for (bi, beat) in scene.beats.iter().enumerate() {
            points.push(ChartPoint {
                name: format!("S{}.B{}", si + 1, bi + 1),
                scene_id: scene.scene_id.clone(),
                beat_id: Some(beat.beat_id.clone()),
                intensity: beat.primary_intensity(),
                emotion: beat.primary_emotion_label().to_string(),
                beat: Some(BeatRef { scene: si, beat: bi }),
            });
        }
    }

    points
}
