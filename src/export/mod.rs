pub mod row;
pub mod store;

pub use row::{encode_row, header_line, RESULT_COLUMNS};
pub use store::{SubmissionStore, SubmittedRow};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("results file is locked by another exporter at {path}")]
    LockBusy { path: String },
    #[error("submission row encode failed: {0}")]
    Encode(String),
}
