/// Full session JSON export
use crate::{resolve_target, session_file_name, write_json, ExportError};
use analysis::AnalysisResult;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub app_version: String,
    pub export_format: String,
}

impl ExportMetadata {
    pub fn json() -> Self {
        Self {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            export_format: "json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    /// RFC 3339, UTC
    pub timestamp: String,
    /// Characters of script text submitted (0 for PDF uploads)
    pub script_length: usize,
    pub analysis: AnalysisResult,
    pub metadata: ExportMetadata,
}

impl SessionExport {
    pub fn new(analysis: &AnalysisResult, script_length: usize, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            script_length,
            analysis: analysis.clone(),
            metadata: ExportMetadata::json(),
        }
    }
}

/// Writes the session to `dest` (a file, or a directory that receives
/// `analysis_{timestamp}.json`) and returns the written path.
pub fn export_session(
    analysis: &AnalysisResult,
    script_length: usize,
    dest: &Path,
) -> Result<PathBuf, ExportError> {
    let now = Utc::now();
    let export = SessionExport::new(analysis, script_length, now);
    let path = resolve_target(dest, &session_file_name(now));

    write_json(&path, &export)?;
    info!(
        "Exported analysis ({} scenes) to {}",
        analysis.scenes.len(),
        path.display()
    );
    Ok(path)
}
