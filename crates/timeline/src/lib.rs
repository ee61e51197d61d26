/// Timeline view over an analysis: emotional arc points, overview, pacing
/// panel and the scene/beat breakdown.
pub mod breakdown;
pub mod chart;
pub mod overview;
pub mod render;

pub use breakdown::{scene_breakdown, BeatRow, SceneRow};
pub use chart::{chart_points, emotion_color, ChartPoint, DEFAULT_EMOTION_COLOR, EMOTION_COLORS};
pub use overview::{PacingSummary, SceneOverview};
pub use render::render_text;
