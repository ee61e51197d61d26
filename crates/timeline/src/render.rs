use crate::{chart_points, scene_breakdown, PacingSummary, SceneOverview};
use analysis::{AnalysisResult, BeatRef};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

fn bar(fill_percent: f64) -> String {
    let filled = ((fill_percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Plain text rendering of the whole timeline panel.
pub fn render_text(result: &AnalysisResult, selected: Option<BeatRef>) -> String {
    let mut out = String::new();

    let overview = SceneOverview::new(result);
    let _ = writeln!(out, "Scene Overview");
    let _ = writeln!(
        out,
        "  Scenes: {}   Beats: {}   Avg Pace: {}",
        overview.scenes,
        overview.beats,
        overview.average_pace_label()
    );

    let _ = writeln!(out, "\nEmotional Arc");
    for point in chart_points(result) {
        let _ = writeln!(
            out,
            "  {:<10} {} {:>5} {} ({})",
            point.name,
            bar(point.intensity),
            point.intensity,
            point.emotion,
            point.color()
        );
    }

    if let Some(pacing) = PacingSummary::new(result.pacing.as_ref()) {
        let _ = writeln!(out, "\nPacing Analysis");
        let _ = writeln!(out, "  Rhythm: {}", pacing.rhythm);
        let _ = writeln!(out, "  {} {}%", bar(pacing.fill_percent), pacing.fill_percent);
        let _ = writeln!(out, "  {}", pacing.advice);
    }

    let _ = writeln!(out, "\nScene Breakdown");
    for scene in scene_breakdown(result, selected) {
        let _ = writeln!(out, "  {}", scene.heading);
        if scene.beats.is_empty() {
            let _ = writeln!(out, "      No beats detected");
        }
        for beat in scene.beats {
            let marker = if beat.selected { ">" } else { " " };
            match beat.badge {
                Some(badge) => {
                    let _ = writeln!(out, "    {} {:<8} {}", marker, beat.label, badge);
                }
                None => {
                    let _ = writeln!(out, "    {} {}", marker, beat.label);
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis::{Beat, EmotionReading, EmotionalArc, PacingMetadata, Scene};

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(bar(50.0), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(bar(250.0), format!("[{}]", "#".repeat(20)));
    }

    #[test]
    fn test_render_text() {
        let mut scene = Scene::new(1).with_location("EXT. PIER").with_beats(vec![
            Beat::new("1-1").with_arc(EmotionalArc::with_primary(EmotionReading::new(
                "sadness", 60.0,
            ))),
            Beat::new("1-2"),
        ]);
        scene.pacing_metadata = Some(PacingMetadata {
            average_pace: Some(2.5),
            ..Default::default()
        });
        let result = AnalysisResult::from_scene(scene);

        let text = render_text(&result, Some(BeatRef { scene: 0, beat: 0 }));
        assert!(text.contains("Avg Pace: 2.5"));
        assert!(text.contains("S1.B1"));
        assert!(text.contains("Scene 1 - EXT. PIER"));
        assert!(text.contains("> Beat 1"));
        assert!(text.contains("sadness (60%)"));
        assert!(text.contains("Slow, contemplative pacing."));
        assert!(!text.contains("No beats detected"));
    }
}
