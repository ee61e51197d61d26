/// Per-beat detail with display fallbacks
///
/// A section exists only when the service sent the matching sub-object;
/// inside a section every missing or blank field shows its fallback.
use analysis::{
    label_or, Beat, CameraAngles, CameraMovement, Cinematography, ColorPalette, EmotionReading,
    HexColor, Label, LensFocus, Lighting, ShotComposition,
};
use serde::Serialize;

pub const NO_PRIMARY_EMOTION: &str = "No primary emotion detected";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotDetail {
    pub shot_size: String,
    pub depth_staging: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleDetail {
    pub vertical: String,
    pub horizontal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementDetail {
    pub movement_type: String,
    pub speed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LensDetail {
    pub focal_length: String,
    pub depth_of_field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CinematographyDetail {
    pub shot_composition: Option<ShotDetail>,
    pub camera_angles: Option<AngleDetail>,
    pub camera_movement: Option<MovementDetail>,
    pub lens_focus: Option<LensDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightingDetail {
    pub quality: String,
    pub direction: String,
    pub temperature: String,
    /// Only shown when provided
    pub contrast_ratio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteDetail {
    pub primary_colors: Option<Vec<String>>,
    pub secondary_colors: Option<Vec<String>>,
    pub saturation: String,
    pub warmth: String,
}

/// Everything the inspector shows for one beat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeatDetail {
    pub beat_id: String,
    /// `BETRAYAL (85%)`, or `None` when no primary emotion was detected
    pub primary_emotion: Option<String>,
    /// `anger (60%)`
    pub secondary_emotions: Vec<String>,
    pub cinematography: Option<CinematographyDetail>,
    pub lighting: Option<LightingDetail>,
    pub color_palette: Option<PaletteDetail>,
}

impl BeatDetail {
    pub fn new(beat: &Beat) -> Self {
        let arc = &beat.emotional_arc;
        let signals = beat.visual_signals.as_ref();

        Self {
            beat_id: beat.beat_id.to_string(),
            primary_emotion: arc.primary_emotion.as_ref().map(primary_label),
            secondary_emotions: arc.secondary_emotions.iter().map(EmotionReading::badge).collect(),
            cinematography: signals
                .and_then(|s| s.cinematography.as_ref())
                .map(cinematography),
            lighting: signals.and_then(|s| s.lighting.as_ref()).map(lighting),
            color_palette: signals
                .and_then(|s| s.color_palette.as_ref())
                .map(palette),
        }
    }

    pub fn primary_emotion_text(&self) -> &str {
        self.primary_emotion.as_deref().unwrap_or(NO_PRIMARY_EMOTION)
    }
}

fn primary_label(reading: &EmotionReading) -> String {
    format!(
        "{} ({}%)",
        reading.emotion.to_uppercase(),
        reading.intensity
    )
}

fn shot(s: &ShotComposition) -> ShotDetail {
    let shot_size = match s.primary_shot_size.as_ref().filter(|l| !l.is_blank()) {
        Some(size) => size.to_string().to_uppercase(),
        None => "N/A".to_string(),
    };
    ShotDetail {
        shot_size,
        depth_staging: label_or(s.depth_staging.as_ref(), "N/A"),
    }
}

fn angles(a: &CameraAngles) -> AngleDetail {
    AngleDetail {
        vertical: label_or(a.vertical_angle.as_ref(), "Eye Level"),
        horizontal: label_or(a.horizontal_angle.as_ref(), "Frontal"),
    }
}

fn movement(m: &CameraMovement) -> MovementDetail {
    MovementDetail {
        movement_type: label_or(m.movement_type.as_ref(), "Static"),
        speed: label_or(m.speed.as_ref(), "Moderate"),
    }
}

fn lens(l: &LensFocus) -> LensDetail {
    LensDetail {
        focal_length: label_or(l.focal_length.as_ref(), "Standard"),
        depth_of_field: label_or(l.depth_of_field.as_ref(), "Normal"),
    }
}

fn cinematography(c: &Cinematography) -> CinematographyDetail {
    CinematographyDetail {
        shot_composition: c.shot_composition.as_ref().map(shot),
        camera_angles: c.camera_angles.as_ref().map(angles),
        camera_movement: c.camera_movement.as_ref().map(movement),
        lens_focus: c.lens_focus.as_ref().map(lens),
    }
}

fn lighting(l: &Lighting) -> LightingDetail {
    LightingDetail {
        quality: label_or(l.quality.as_ref(), "Soft"),
        direction: label_or(l.direction.as_ref(), "Three Point"),
        temperature: label_or(l.temperature.as_ref(), "5600K"),
        contrast_ratio: l
            .contrast_ratio
            .as_ref()
            .filter(|c| !c.is_blank())
            .map(Label::to_string),
    }
}

fn palette(p: &ColorPalette) -> PaletteDetail {
    let hex = |colors: &Vec<HexColor>| -> Vec<String> { colors.iter().map(|c| c.to_string()).collect() };
    PaletteDetail {
        primary_colors: p.primary_colors.as_ref().map(hex),
        secondary_colors: p.secondary_colors.as_ref().map(hex),
        saturation: label_or(p.saturation.as_ref(), "Normal"),
        warmth: label_or(p.warmth.as_ref(), "Neutral"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beat(json: &str) -> Beat {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_sections_use_defaults() {
        let beat = beat(
            r#"{
                "beat_id": "1-1",
                "visual_signals": {
                    "cinematography": {"shot_composition": {}, "camera_angles": {}, "camera_movement": {}, "lens_focus": {}},
                    "lighting": {},
                    "color_palette": {}
                }
            }"#,
        );
        let detail = BeatDetail::new(&beat);

        assert_eq!(detail.primary_emotion_text(), NO_PRIMARY_EMOTION);
        let cine = detail.cinematography.unwrap();
        assert_eq!(cine.shot_composition.unwrap().shot_size, "N/A");
        let angles = cine.camera_angles.unwrap();
        assert_eq!((angles.vertical.as_str(), angles.horizontal.as_str()), ("Eye Level", "Frontal"));
        let moves = cine.camera_movement.unwrap();
        assert_eq!((moves.movement_type.as_str(), moves.speed.as_str()), ("Static", "Moderate"));
        let lens = cine.lens_focus.unwrap();
        assert_eq!((lens.focal_length.as_str(), lens.depth_of_field.as_str()), ("Standard", "Normal"));

        let lighting = detail.lighting.unwrap();
        assert_eq!(lighting.quality, "Soft");
        assert_eq!(lighting.direction, "Three Point");
        assert_eq!(lighting.temperature, "5600K");
        assert!(lighting.contrast_ratio.is_none());

        let palette = detail.color_palette.unwrap();
        assert_eq!(palette.saturation, "Normal");
        assert_eq!(palette.warmth, "Neutral");
        assert!(palette.primary_colors.is_none());
    }

    #[test]
    fn test_absent_sections_are_hidden() {
        let detail = BeatDetail::new(&beat(r#"{"beat_id": 4, "visual_signals": {"lighting": {}}}"#));
        assert!(detail.cinematography.is_none());
        assert!(detail.color_palette.is_none());
        assert!(detail.lighting.is_some());

        let bare = BeatDetail::new(&beat(r#"{"beat_id": 5}"#));
        assert!(bare.cinematography.is_none() && bare.lighting.is_none());
    }

    #[test]
    fn test_provided_values_are_shown() {
        let detail = BeatDetail::new(&beat(
            r##"{
                "beat_id": "2-3",
                "emotional_arc": {
                    "primary_emotion": {"emotion": "betrayal", "intensity": 85},
                    "secondary_emotions": [{"emotion": "anger", "intensity": 60}]
                },
                "visual_signals": {
                    "cinematography": {"shot_composition": {"primary_shot_size": "closeup", "depth_staging": "shallow"}},
                    "lighting": {"quality": 90, "temperature": "", "contrast_ratio": "12:1"},
                    "color_palette": {"primary_colors": ["#991B1B"], "saturation": 75}
                }
            }"##,
        ));

        assert_eq!(detail.primary_emotion_text(), "BETRAYAL (85%)");
        assert_eq!(detail.secondary_emotions, ["anger (60%)"]);

        let shot = detail.cinematography.unwrap().shot_composition.unwrap();
        assert_eq!(shot.shot_size, "CLOSEUP");
        assert_eq!(shot.depth_staging, "shallow");

        let lighting = detail.lighting.unwrap();
        assert_eq!(lighting.quality, "90");
        assert_eq!(lighting.temperature, "5600K");
        assert_eq!(lighting.contrast_ratio.as_deref(), Some("12:1"));

        let palette = detail.color_palette.unwrap();
        assert_eq!(palette.primary_colors, Some(vec!["#991B1B".to_string()]));
        assert_eq!(palette.saturation, "75");
    }
}
