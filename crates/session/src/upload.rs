/// Script upload intake
///
/// Exactly one file per submission. PDFs are forwarded unread; every other
/// file is decoded as UTF-8 text.
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("expected exactly one script file, got {0}")]
    FileCount(usize),
    #[error("{path} is not valid UTF-8 text: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    Fountain,
    PlainText,
    Pdf,
    /// Anything else; still read as text
    Other,
}

impl ScriptFormat {
    pub const ACCEPTED_EXTENSIONS: [&'static str; 3] = ["fountain", "txt", "pdf"];

    /// Classifies by the file name suffix, case-insensitively. A file
    /// named just `.pdf` is still a PDF.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ends_with = |suffix: &str| strip_suffix_ignore_case(&name, suffix).is_some();

        if ends_with(".pdf") {
            ScriptFormat::Pdf
        } else if ends_with(".fountain") {
            ScriptFormat::Fountain
        } else if ends_with(".txt") {
            ScriptFormat::PlainText
        } else {
            ScriptFormat::Other
        }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, ScriptFormat::Pdf)
    }
}

/// A script ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Upload {
    Text { text: String, title: String },
    Pdf { path: PathBuf, title: String },
}

impl Upload {
    pub fn title(&self) -> &str {
        match self {
            Upload::Text { title, .. } | Upload::Pdf { title, .. } => title,
        }
    }

    /// Characters of script text; PDFs are never read locally.
    pub fn script_length(&self) -> usize {
        match self {
            Upload::Text { text, .. } => text.chars().count(),
            Upload::Pdf { .. } => 0,
        }
    }

    pub fn script_text(&self) -> Option<&str> {
        match self {
            Upload::Text { text, .. } => Some(text),
            Upload::Pdf { .. } => None,
        }
    }
}

/// Title shown for an uploaded file: the file name minus `.pdf` for PDFs,
/// minus `.fountain`/`.txt` for everything else. Case-insensitive; other
/// extensions are left in place.
pub fn derive_title(file_name: &str, format: ScriptFormat) -> String {
    let suffixes: &[&str] = if format.is_pdf() {
        &[".pdf"]
    } else {
        &[".fountain", ".txt"]
    };

    suffixes
        .iter()
        .find_map(|suffix| strip_suffix_ignore_case(file_name, suffix))
        .unwrap_or(file_name)
        .to_string()
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    let tail = name.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &name[..split])
}

/// Turns one selected file into an [`Upload`].
pub async fn prepare_upload(paths: &[PathBuf]) -> Result<Upload, UploadError> {
    let path = match paths {
        [path] => path,
        other => return Err(UploadError::FileCount(other.len())),
    };

    let format = ScriptFormat::from_path(path);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let title = derive_title(&file_name, format);

    if format.is_pdf() {
        debug!("Forwarding PDF {} unread", path.display());
        return Ok(Upload::Pdf {
            path: path.clone(),
            title,
        });
    }

    if format == ScriptFormat::Other {
        warn!(
            "{} is not one of .{}; reading it as text",
            path.display(),
            ScriptFormat::ACCEPTED_EXTENSIONS.join(", .")
        );
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
        path: path.clone(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| UploadError::Decode {
        path: path.clone(),
        source,
    })?;

    debug!("Read {} characters from {}", text.chars().count(), path.display());
    Ok(Upload::Text { text, title })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title() {
        assert_eq!(derive_title("draft.PDF", ScriptFormat::Pdf), "draft");
        assert_eq!(derive_title("draft.fountain", ScriptFormat::Fountain), "draft");
        assert_eq!(derive_title("Draft.TXT", ScriptFormat::PlainText), "Draft");
        assert_eq!(derive_title("notes.md", ScriptFormat::Other), "notes.md");
        assert_eq!(derive_title("a.txt.pdf", ScriptFormat::Pdf), "a.txt");
        assert_eq!(derive_title("ünïcode.txt", ScriptFormat::PlainText), "ünïcode");
        assert_eq!(derive_title("pdf", ScriptFormat::Other), "pdf");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ScriptFormat::from_path(Path::new("x.Pdf")), ScriptFormat::Pdf);
        assert_eq!(
            ScriptFormat::from_path(Path::new("x.fountain")),
            ScriptFormat::Fountain
        );
        assert_eq!(ScriptFormat::from_path(Path::new("x")), ScriptFormat::Other);
        assert_eq!(ScriptFormat::from_path(Path::new(".PDF")), ScriptFormat::Pdf);
        assert_eq!(ScriptFormat::from_path(Path::new("dir/.txt")), ScriptFormat::PlainText);
        assert_eq!(ScriptFormat::from_path(Path::new("x.pdf.md")), ScriptFormat::Other);
    }

    #[tokio::test]
    async fn test_pdf_is_never_read() {
        // The file does not exist: a PDF path must not be opened.
        let path = PathBuf::from("/nonexistent/draft.PDF");
        let upload = prepare_upload(&[path.clone()]).await.unwrap();
        assert_eq!(
            upload,
            Upload::Pdf {
                path,
                title: "draft".to_string()
            }
        );
        assert_eq!(upload.script_length(), 0);
    }

    #[tokio::test]
    async fn test_bare_pdf_name_is_forwarded_unread() {
        let path = PathBuf::from("/nonexistent/.PDF");
        let upload = prepare_upload(&[path.clone()]).await.unwrap();
        assert_eq!(
            upload,
            Upload::Pdf {
                path,
                title: String::new()
            }
        );
    }

    #[tokio::test]
    async fn test_text_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.fountain");
        std::fs::write(&path, "INT. ROOM\n").unwrap();

        let upload = prepare_upload(&[path]).await.unwrap();
        assert_eq!(
            upload,
            Upload::Text {
                text: "INT. ROOM\n".to_string(),
                title: "draft".to_string()
            }
        );
        assert_eq!(upload.script_length(), 10);
    }

    #[tokio::test]
    async fn test_rejects_file_count() {
        assert!(matches!(
            prepare_upload(&[]).await,
            Err(UploadError::FileCount(0))
        ));
        let two = [PathBuf::from("a.txt"), PathBuf::from("b.txt")];
        assert!(matches!(
            prepare_upload(&two).await,
            Err(UploadError::FileCount(2))
        ));
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(
            prepare_upload(&[path]).await,
            Err(UploadError::Decode { .. })
        ));
    }
}
