/// Single beat JSON export
use crate::{beat_file_name, resolve_target, write_json, ExportError};
use analysis::{AnalysisResult, BeatRef, EmotionalArc, Ident, PacingMetadata, Scene, VisualSignals};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatExport {
    pub beat_id: Ident,
    pub timestamp: String,
    pub emotional_arc: EmotionalArc,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_signals: Option<VisualSignals>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pacing: Option<PacingMetadata>,

    /// First scene of the analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_scene_context: Option<Scene>,
}

impl BeatExport {
    pub fn new(
        analysis: &AnalysisResult,
        at_ref: BeatRef,
        at: DateTime<Utc>,
    ) -> Result<Self, ExportError> {
        let beat = analysis.beat(at_ref).ok_or(ExportError::MissingBeat {
            scene: at_ref.scene,
            beat: at_ref.beat,
        })?;

        let context = analysis.scenes.first().cloned();

        Ok(Self {
            beat_id: beat.beat_id.clone(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            emotional_arc: beat.emotional_arc.clone(),
            visual_signals: beat.visual_signals.clone(),
            pacing: beat.pacing.clone(),
            full_scene_context: context,
        })
    }
}

/// Writes one beat to `dest` (a file, or a directory that receives
/// `beat_{id}_analysis.json`) and returns the written path.
pub fn export_beat(
    analysis: &AnalysisResult,
    at_ref: BeatRef,
    dest: &Path,
) -> Result<PathBuf, ExportError> {
    let export = BeatExport::new(analysis, at_ref, Utc::now())?;
    let path = resolve_target(dest, &beat_file_name(&export.beat_id));

    write_json(&path, &export)?;
    info!("Exported beat {} to {}", export.beat_id, path.display());
    Ok(path)
}
