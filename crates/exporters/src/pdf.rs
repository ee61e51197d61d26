use crate::{pdf_file_name, resolve_target, write_atomic, ExportError};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Saves a PDF downloaded from the service. `dest` may be a directory, in
/// which case the file is named after `title`.
pub fn save_pdf(bytes: &[u8], title: Option<&str>, dest: &Path) -> Result<PathBuf, ExportError> {
    if bytes.is_empty() {
        return Err(ExportError::EmptyPdf);
    }
    if !bytes.starts_with(b"%PDF") {
        warn!("Downloaded document does not start with a PDF header");
    }

    let path = resolve_target(dest, &pdf_file_name(title));
    write_atomic(&path, bytes)?;

    info!("Saved PDF report to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_pdf_named_after_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_pdf(b"%PDF-1.4 report", Some("pilot"), dir.path()).unwrap();

        assert_eq!(path, dir.path().join("pilot_analysis.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 report");
    }

    #[test]
    fn test_empty_pdf_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            save_pdf(b"", None, dir.path()),
            Err(ExportError::EmptyPdf)
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
