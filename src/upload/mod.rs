mod client;
mod job;
mod types;

pub use client::{resolve_url, ExtractionClient};
pub use job::{JobConfig, JOBS};
pub use types::{ExtractionOutcome, ExtractionSuccess, PickedFile, Record, UploadError};
