use std::path::PathBuf;

use reqwest::multipart::{Form, Part};

use crate::upload::job::{FieldMode, JobConfig};
use crate::upload::types::{
    ExtractionResponse, ExtractionSuccess, PickedFile, UploadError,
};

/// One entry of a planned multipart body. Planning is split from building so
/// the field layout can be checked without touching the filesystem or network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEntry {
    File {
        field: &'static str,
        name: String,
        path: PathBuf,
    },
    Text {
        field: &'static str,
        value: &'static str,
    },
}

/// Lay out the multipart body for a job: a single `file` field (plus the
/// `extraction_type` selector) or every file repeated under `screenshots`.
pub fn plan_entries(
    job: &JobConfig,
    files: &[PickedFile],
) -> Result<Vec<FormEntry>, UploadError> {
    if files.is_empty() {
        return Err(UploadError::EmptySelection);
    }

    let mut entries = Vec::new();
    match job.mode {
        FieldMode::Single => {
            // The single-file pages only ever send the first selection.
            let file = &files[0];
            entries.push(FormEntry::File {
                field: job.field,
                name: file.name.clone(),
                path: file.path.clone(),
            });
            if let Some(kind) = job.extraction_type {
                entries.push(FormEntry::Text {
                    field: "extraction_type",
                    value: kind,
                });
            }
        }
        FieldMode::Repeated => {
            for file in files {
                entries.push(FormEntry::File {
                    field: job.field,
                    name: file.name.clone(),
                    path: file.path.clone(),
                });
            }
        }
    }
    Ok(entries)
}

/// Classify a 2xx response body: an `error` field is an application failure
/// even though the transport succeeded; otherwise the records and artifact
/// links are adopted as-is.
pub fn parse_body(body: &str) -> Result<ExtractionSuccess, UploadError> {
    let response: ExtractionResponse = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        return Err(UploadError::Server(error));
    }
    Ok(ExtractionSuccess {
        message: response.message,
        records: response.data.unwrap_or_default(),
        excel_file: response.excel_file,
        csv_file: response.csv_file,
    })
}

/// Resolve a server-relative artifact path against the base URL.
pub fn resolve_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// Issues extraction requests. One instance per app; each submission is a
/// single POST with no timeout and no retry.
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    base_url: String,
}

impl ExtractionClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn submit(
        &self,
        job: &JobConfig,
        files: Vec<PickedFile>,
    ) -> Result<ExtractionSuccess, UploadError> {
        let entries = plan_entries(job, &files)?;
        let form = build_form(entries).await?;

        let url = format!("{}{}", self.base_url, job.endpoint);
        log::debug!("POST {} ({} file(s))", url, files.len());

        let response = reqwest::Client::new()
            .post(&url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The body is not inspected on a transport-level failure.
            return Err(UploadError::Status(status));
        }

        let body = response.text().await?;
        parse_body(&body)
    }
}

async fn build_form(entries: Vec<FormEntry>) -> Result<Form, UploadError> {
    let mut form = Form::new();
    for entry in entries {
        form = match entry {
            FormEntry::File { field, name, path } => {
                let bytes = tokio::fs::read(&path).await.map_err(|source| {
                    UploadError::FileRead {
                        name: name.clone(),
                        source,
                    }
                })?;
                form.part(field, Part::bytes(bytes).file_name(name))
            }
            FormEntry::Text { field, value } => form.text(field, value),
        };
    }
    Ok(form)
}
