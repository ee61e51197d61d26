/// Visual recommendations attached to a beat: camera, light and color.
use crate::values::{HexColor, Label};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualSignals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cinematography: Option<Cinematography>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<Lighting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<ColorPalette>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cinematography {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_composition: Option<ShotComposition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_angles: Option<CameraAngles>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_movement: Option<CameraMovement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens_focus: Option<LensFocus>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotComposition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_shot_size: Option<Label>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_staging: Option<Label>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraAngles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_angle: Option<Label>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_angle: Option<Label>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraMovement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_type: Option<Label>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<Label>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LensFocus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<Label>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_of_field: Option<Label>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    /// Hardness; text (`"soft"`) or 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Label>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Label>,

    /// Color temperature, e.g. `"3200K"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Label>,

    /// Key to fill ratio, e.g. `"8:1"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast_ratio: Option<Label>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_colors: Option<Vec<HexColor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_colors: Option<Vec<HexColor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<Label>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmth: Option<Label>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColorPalette {
    /// All colors in display order, primary first.
    pub fn colors(&self) -> impl Iterator<Item = &HexColor> {
        self.primary_colors
            .iter()
            .flatten()
            .chain(self.secondary_colors.iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_signals_parse() {
        let signals: VisualSignals = serde_json::from_str(
            r##"{
                "cinematography": {
                    "shot_composition": {"primary_shot_size": "closeup"},
                    "camera_movement": {"movement_type": "dolly_out", "speed": "slow"}
                },
                "lighting": {"quality": 90, "direction": "side", "contrast_ratio": "12:1"},
                "color_palette": {"primary_colors": ["#991B1B", "#6B21A8"], "saturation": 75},
                "reasoning": "Betrayal requires harsh split lighting"
            }"##,
        )
        .unwrap();

        let cine = signals.cinematography.as_ref().unwrap();
        assert_eq!(
            cine.shot_composition.as_ref().unwrap().primary_shot_size,
            Some(Label::from("closeup"))
        );
        assert!(cine.camera_angles.is_none());

        let lighting = signals.lighting.as_ref().unwrap();
        assert_eq!(lighting.quality.as_ref().unwrap().to_string(), "90");
        assert!(lighting.temperature.is_none());

        let palette = signals.color_palette.as_ref().unwrap();
        assert_eq!(palette.colors().count(), 2);
        assert!(signals.extra.contains_key("reasoning"));
    }
}
