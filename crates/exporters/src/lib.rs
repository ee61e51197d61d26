use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub mod beat;
pub mod pdf;
pub mod session;

pub use beat::{export_beat, BeatExport};
pub use pdf::save_pdf;
pub use session::{export_session, ExportMetadata, SessionExport};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
    #[error("No beat at scene {scene}, beat {beat}")]
    MissingBeat { scene: usize, beat: usize },
    #[error("Empty PDF received")]
    EmptyPdf,
}

/// `analysis_20260119T101500Z.json`
pub fn session_file_name(at: DateTime<Utc>) -> String {
    format!("analysis_{}.json", at.format("%Y%m%dT%H%M%SZ"))
}

/// `beat_1-1_analysis.json`
pub fn beat_file_name(beat_id: &analysis::Ident) -> String {
    format!("beat_{}_analysis.json", beat_id.slug())
}

/// `{title}_analysis.pdf`, `screenplay` when there is no usable title.
pub fn pdf_file_name(title: Option<&str>) -> String {
    let title: String = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("screenplay")
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("{}_analysis.pdf", title)
}

/// A destination that is an existing directory gets `default_name`
/// appended; anything else is used as the file path.
pub fn resolve_target(dest: &Path, default_name: &str) -> PathBuf {
    if dest.is_dir() {
        dest.join(default_name)
    } else {
        dest.to_path_buf()
    }
}

/// Writes `bytes` to `path` through a temporary file in the same
/// directory. The temporary is removed if anything fails before the
/// final rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| ExportError::Io(e.error))?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub(crate) fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, json.as_bytes())
}
