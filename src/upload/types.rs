use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// A flat record returned by the server; the first record's keys define the
/// preview table schema.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// One user-supplied file, as picked or dropped.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Wire shape of the server's JSON reply. Both endpoints share it: `/upload`
/// includes `message` and `csv_file`, `/player-info` reports failures through
/// `error`.
#[derive(Debug, Deserialize)]
pub struct ExtractionResponse {
    pub message: Option<String>,
    pub error: Option<String>,
    pub data: Option<Vec<Record>>,
    pub excel_file: Option<String>,
    pub csv_file: Option<String>,
}

/// A handled, successful extraction.
#[derive(Debug, Clone)]
pub struct ExtractionSuccess {
    pub message: Option<String>,
    pub records: Vec<Record>,
    pub excel_file: Option<String>,
    pub csv_file: Option<String>,
}

/// What the user sees and the log records per failed submission.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no files selected")]
    EmptySelection,

    #[error("could not read {name}: {source}")]
    FileRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("worker runtime: {0}")]
    Runtime(std::io::Error),

    #[error("worker thread exited before reporting a result")]
    WorkerExited,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("{0}")]
    Server(String),
}

impl UploadError {
    /// Application-level failures carry a message meant for the user; every
    /// other variant is a transport problem reported generically.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Server(msg) => msg.clone(),
            UploadError::EmptySelection => "Please choose a file first.".to_string(),
            _ => "Something went wrong while extracting. Please try again.".to_string(),
        }
    }

    pub fn is_application(&self) -> bool {
        matches!(self, UploadError::Server(_))
    }
}

/// Terminal result of one submission, sent back from the worker thread.
pub type ExtractionOutcome = Result<ExtractionSuccess, UploadError>;
