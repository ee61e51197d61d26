/// Beat inspector: cinematography, lighting and color detail for the
/// selected beat.
use analysis::{AnalysisResult, BeatRef};
use serde::Serialize;
use std::fmt::Write;

pub mod detail;

pub use detail::{
    AngleDetail, BeatDetail, CinematographyDetail, LensDetail, LightingDetail, MovementDetail,
    PaletteDetail, ShotDetail, NO_PRIMARY_EMOTION,
};

/// What the inspector panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "beat", rename_all = "snake_case")]
pub enum InspectorState {
    /// Nothing has been analyzed yet
    NoData,
    /// An analysis is loaded but no beat is selected
    NoSelection,
    Beat(Box<BeatDetail>),
}

impl InspectorState {
    /// A selection that no longer resolves is treated as no selection.
    pub fn new(result: Option<&AnalysisResult>, selected: Option<BeatRef>) -> Self {
        let Some(result) = result else {
            return InspectorState::NoData;
        };
        match selected.and_then(|at| result.beat(at)) {
            Some(beat) => InspectorState::Beat(Box::new(BeatDetail::new(beat))),
            None => InspectorState::NoSelection,
        }
    }
}

/// Plain text rendering of the inspector panel.
pub fn render_text(state: &InspectorState) -> String {
    let detail = match state {
        InspectorState::NoData => {
            return "No Data Available\n  Upload and analyze a screenplay to see detailed visual recommendations.\n".to_string()
        }
        InspectorState::NoSelection => {
            return "Select a Beat\n  Choose a beat from the timeline to see detailed cinematography and lighting recommendations.\n".to_string()
        }
        InspectorState::Beat(detail) => detail,
    };

    let mut out = String::new();
    let _ = writeln!(out, "Beat {}", detail.beat_id);
    let _ = writeln!(out, "\nPrimary Emotion\n  {}", detail.primary_emotion_text());
    if !detail.secondary_emotions.is_empty() {
        let _ = writeln!(out, "  Secondary: {}", detail.secondary_emotions.join(", "));
    }

    if let Some(cine) = &detail.cinematography {
        let _ = writeln!(out, "\nCinematography");
        if let Some(shot) = &cine.shot_composition {
            let _ = writeln!(out, "  Shot Composition");
            row(&mut out, "Shot Size", &shot.shot_size);
            row(&mut out, "Depth", &shot.depth_staging);
        }
        if let Some(angles) = &cine.camera_angles {
            let _ = writeln!(out, "  Camera Angles");
            row(&mut out, "Vertical", &angles.vertical);
            row(&mut out, "Horizontal", &angles.horizontal);
        }
        if let Some(movement) = &cine.camera_movement {
            let _ = writeln!(out, "  Camera Movement");
            row(&mut out, "Type", &movement.movement_type);
            row(&mut out, "Speed", &movement.speed);
        }
        if let Some(lens) = &cine.lens_focus {
            let _ = writeln!(out, "  Lens & Focus");
            row(&mut out, "Focal Length", &lens.focal_length);
            row(&mut out, "Depth of Field", &lens.depth_of_field);
        }
    }

    if let Some(lighting) = &detail.lighting {
        let _ = writeln!(out, "\nLighting");
        row(&mut out, "Quality", &lighting.quality);
        row(&mut out, "Direction", &lighting.direction);
        row(&mut out, "Temperature", &lighting.temperature);
        if let Some(ratio) = &lighting.contrast_ratio {
            row(&mut out, "Contrast Ratio", ratio);
        }
    }

    if let Some(palette) = &detail.color_palette {
        let _ = writeln!(out, "\nColor Palette");
        if let Some(colors) = &palette.primary_colors {
            row(&mut out, "Primary", &colors.join(" "));
        }
        if let Some(colors) = &palette.secondary_colors {
            row(&mut out, "Secondary", &colors.join(" "));
        }
        row(&mut out, "Saturation", &palette.saturation);
        row(&mut out, "Warmth", &palette.warmth);
    }

    out
}

fn row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "    {:<16}{}", format!("{}:", label), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis::{Beat, Scene};

    #[test]
    fn test_states() {
        assert_eq!(InspectorState::new(None, None), InspectorState::NoData);

        let result = AnalysisResult::from_scene(Scene::new(1).with_beats(vec![Beat::new("1-1")]));
        assert_eq!(
            InspectorState::new(Some(&result), None),
            InspectorState::NoSelection
        );
        assert_eq!(
            InspectorState::new(Some(&result), Some(BeatRef { scene: 0, beat: 7 })),
            InspectorState::NoSelection
        );

        match InspectorState::new(Some(&result), Some(BeatRef { scene: 0, beat: 0 })) {
            InspectorState::Beat(detail) => assert_eq!(detail.beat_id, "1-1"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_render_text() {
        assert!(render_text(&InspectorState::NoData).starts_with("No Data Available"));
        assert!(render_text(&InspectorState::NoSelection).starts_with("Select a Beat"));

        let beat: Beat = serde_json::from_str(
            r#"{"beat_id": "1-1", "visual_signals": {"lighting": {"contrast_ratio": "4:1"}}}"#,
        )
        .unwrap();
        let text = render_text(&InspectorState::Beat(Box::new(BeatDetail::new(&beat))));

        assert!(text.contains(NO_PRIMARY_EMOTION));
        assert!(text.contains("Temperature:    5600K"));
        assert!(text.contains("Contrast Ratio: 4:1"));
        assert!(!text.contains("Cinematography"));
    }
}
