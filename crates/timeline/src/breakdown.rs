/// Scene and beat listing with the selection highlight
use crate::chart::emotion_color;
use analysis::{AnalysisResult, BeatRef, Ident};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeatRow {
    /// `Beat 2`
    pub label: String,
    pub beat_id: Ident,
    #[serde(skip)]
    pub at: BeatRef,
    /// `joy (80%)`, only when a primary emotion was detected
    pub badge: Option<String>,
    pub color: Option<&'static str>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneRow {
    /// `Scene 1 - INT. KITCHEN`
    pub heading: String,
    pub scene_id: Option<Ident>,
    /// Empty renders as "No beats detected"
    pub beats: Vec<BeatRow>,
}

/// Builds the breakdown. A beat is marked selected when its id equals the
/// id of the beat at `selected`.
pub fn scene_breakdown(result: &AnalysisResult, selected: Option<BeatRef>) -> Vec<SceneRow> {
    let selected_id = selected
        .and_then(|at| result.beat(at))
        .map(|beat| &beat.beat_id);

    result
        .scenes
        .iter()
        .enumerate()
        .map(|(si, scene)| {
            let heading = match scene.location_label() {
                Some(location) => format!("Scene {} - {}", si + 1, location),
                None => format!("Scene {}", si + 1),
            };

            let beats = scene
                .beats
                .iter()
                .enumerate()
                .map(|(bi, beat)| {
                    let primary = beat.emotional_arc.primary_emotion.as_ref();
                    BeatRow {
                        label: format!("Beat {}", bi + 1),
                        beat_id: beat.beat_id.clone(),
                        at: BeatRef { scene: si, beat: bi },
                        badge: primary.map(|p| p.badge()),
                        color: primary.map(|p| emotion_color(&p.emotion)),
                        selected: selected_id == Some(&beat.beat_id),
                    }
                })
                .collect();

            SceneRow {
                heading,
                scene_id: scene.scene_id.clone(),
                beats,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis::{Beat, EmotionReading, EmotionalArc, Scene};

    fn result() -> AnalysisResult {
        let fearful = Beat::new("1-1").with_arc(EmotionalArc::with_primary(EmotionReading::new(
            "fear", 85.0,
        )));
        AnalysisResult {
            scenes: vec![
                Scene::new(1)
                    .with_location("INT. KITCHEN - NIGHT")
                    .with_beats(vec![fearful, Beat::new("1-2")]),
                Scene::new(2),
            ],
            pacing: None,
        }
    }

    #[test]
    fn test_rows() {
        let rows = scene_breakdown(&result(), None);
        assert_eq!(rows[0].heading, "Scene 1 - INT. KITCHEN - NIGHT");
        assert_eq!(rows[1].heading, "Scene 2");
        assert!(rows[1].beats.is_empty());

        let first = &rows[0].beats[0];
        assert_eq!(first.label, "Beat 1");
        assert_eq!(first.badge.as_deref(), Some("fear (85%)"));
        assert_eq!(first.color, Some("#8b5cf6"));
        assert!(rows[0].beats[1].badge.is_none());
        assert!(rows.iter().flat_map(|r| &r.beats).all(|b| !b.selected));
    }

    #[test]
    fn test_only_selected_beat_is_highlighted() {
        let result = result();
        let before = result.clone();
        let rows = scene_breakdown(&result, Some(BeatRef { scene: 0, beat: 1 }));

        let selected: Vec<_> = rows
            .iter()
            .flat_map(|r| &r.beats)
            .filter(|b| b.selected)
            .map(|b| b.beat_id.to_string())
            .collect();
        assert_eq!(selected, ["1-2"]);
        assert_eq!(result, before);
    }
}
