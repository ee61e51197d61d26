/// Client session: upload intake, response reconciliation and the state
/// the timeline and inspector render from.
use thiserror::Error;

pub mod reconcile;
pub mod state;
pub mod upload;
pub mod workbench;

pub use reconcile::{analyze_upload, resolve, submit, Resolved};
pub use state::{Applied, Generation, ScriptInfo, Session};
pub use upload::{derive_title, prepare_upload, ScriptFormat, Upload, UploadError};
pub use workbench::{PdfExportError, Workbench};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("{}", .0.user_message())]
    Client(#[from] api_client::ClientError),
    #[error("Export failed: {0}")]
    Export(#[from] exporters::ExportError),
    #[error("No analysis loaded")]
    NoResult,
    #[error("No beat selected")]
    NoSelection,
    #[error("No beat with id {0}")]
    UnknownBeat(String),
}
