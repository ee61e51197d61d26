use analysis::{AnalysisResult, PacingMetadata};
use serde::Serialize;

/// Scene / beat counts and the average pace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneOverview {
    pub scenes: usize,
    pub beats: usize,
    pub average_pace: Option<f64>,
}

impl SceneOverview {
    pub fn new(result: &AnalysisResult) -> Self {
        Self {
            scenes: result.scenes.len(),
            beats: result.beat_count(),
            average_pace: result.pacing.as_ref().and_then(|p| p.average_pace),
        }
    }

    /// One decimal, or `N/A`.
    pub fn average_pace_label(&self) -> String {
        match self.average_pace {
            Some(pace) => format!("{:.1}", pace),
            None => "N/A".to_string(),
        }
    }
}

pub const SLOW_PACE_ADVICE: &str = "Slow, contemplative pacing. Static shots recommended.";
pub const FAST_PACE_ADVICE: &str = "Fast, intense pacing. Handheld camera recommended.";
pub const MODERATE_PACE_ADVICE: &str = "Moderate pacing. Balanced camera work.";

/// Pacing panel content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacingSummary {
    /// `overall_pacing`, `Moderate` when missing
    pub rhythm: String,
    /// Bar fill in percent, 0-100
    pub fill_percent: f64,
    pub advice: &'static str,
}

impl PacingSummary {
    /// `None` when the analysis carries no pacing at all.
    pub fn new(pacing: Option<&PacingMetadata>) -> Option<Self> {
        let pacing = pacing?;

        let rhythm = pacing
            .overall_pacing
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or("Moderate")
            .to_string();

        // A zero pace counts as unset for the bar, not for the advice.
        let bar_pace = pacing.average_pace.filter(|p| *p != 0.0).unwrap_or(5.0);
        let fill_percent = (bar_pace * 10.0).min(100.0);

        let advice = match pacing.average_pace {
            Some(pace) if pace < 3.0 => SLOW_PACE_ADVICE,
            Some(pace) if pace > 7.0 => FAST_PACE_ADVICE,
            _ => MODERATE_PACE_ADVICE,
        };

        Some(Self {
            rhythm,
            fill_percent,
            advice,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis::{Beat, Scene};

    fn pacing(pace: Option<f64>, label: Option<&str>) -> PacingMetadata {
        PacingMetadata {
            average_pace: pace,
            overall_pacing: label.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_overview() {
        let mut result = AnalysisResult::from_scene(
            Scene::new(1).with_beats(vec![Beat::new("a"), Beat::new("b")]),
        );
        let overview = SceneOverview::new(&result);
        assert_eq!((overview.scenes, overview.beats), (1, 2));
        assert_eq!(overview.average_pace_label(), "N/A");

        result.pacing = Some(pacing(Some(6.24), None));
        assert_eq!(SceneOverview::new(&result).average_pace_label(), "6.2");
        result.pacing = Some(pacing(Some(4.0), None));
        assert_eq!(SceneOverview::new(&result).average_pace_label(), "4.0");
    }

    #[test]
    fn test_pacing_summary() {
        assert!(PacingSummary::new(None).is_none());

        let slow = PacingSummary::new(Some(&pacing(Some(2.0), Some("Languid")))).unwrap();
        assert_eq!(slow.rhythm, "Languid");
        assert_eq!(slow.fill_percent, 20.0);
        assert_eq!(slow.advice, SLOW_PACE_ADVICE);

        let fast = PacingSummary::new(Some(&pacing(Some(12.0), None))).unwrap();
        assert_eq!(fast.rhythm, "Moderate");
        assert_eq!(fast.fill_percent, 100.0);
        assert_eq!(fast.advice, FAST_PACE_ADVICE);

        let unset = PacingSummary::new(Some(&pacing(None, Some("")))).unwrap();
        assert_eq!(unset.rhythm, "Moderate");
        assert_eq!(unset.fill_percent, 50.0);
        assert_eq!(unset.advice, MODERATE_PACE_ADVICE);

        let zero = PacingSummary::new(Some(&pacing(Some(0.0), None))).unwrap();
        assert_eq!(zero.fill_percent, 50.0);
        assert_eq!(zero.advice, SLOW_PACE_ADVICE);

        let edge = PacingSummary::new(Some(&pacing(Some(7.0), None))).unwrap();
        assert_eq!(edge.advice, MODERATE_PACE_ADVICE);
    }
}
