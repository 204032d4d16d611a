/// How a job's files are laid out in the multipart body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// One file under a single field.
    Single,
    /// Every file repeated under the same field.
    Repeated,
}

/// One extraction job the server knows how to run. A job fixes the endpoint,
/// the multipart field layout and the kind of file it accepts; the rest of
/// the workflow is identical across jobs.
#[derive(Debug)]
pub struct JobConfig {
    pub label: &'static str,
    /// Path under the server base URL.
    pub endpoint: &'static str,
    /// Multipart field name for the file part(s).
    pub field: &'static str,
    pub mode: FieldMode,
    /// Extra text field the `/upload` endpoint uses to pick its extractor.
    pub extraction_type: Option<&'static str>,
    /// Accepted file extensions, for the picker filter.
    pub accept: &'static [&'static str],
    /// Noun used in status text: "3 screenshot(s) loaded."
    pub noun: &'static str,
}

pub const JOBS: &[JobConfig] = &[
    JobConfig {
        label: "Player info (chat log)",
        endpoint: "/upload",
        field: "file",
        mode: FieldMode::Single,
        extraction_type: Some("player-info"),
        accept: &["txt"],
        noun: "file",
    },
    JobConfig {
        label: "Alliance duel points (chat log)",
        endpoint: "/upload",
        field: "file",
        mode: FieldMode::Single,
        extraction_type: Some("alliance-duel-points"),
        accept: &["txt"],
        noun: "file",
    },
    JobConfig {
        label: "Zone passes count (chat database)",
        endpoint: "/upload",
        field: "file",
        mode: FieldMode::Single,
        extraction_type: Some("zone-passes-count"),
        accept: &["db", "sqlite"],
        noun: "file",
    },
    JobConfig {
        label: "Player info (screenshots)",
        endpoint: "/player-info",
        field: "screenshots",
        mode: FieldMode::Repeated,
        extraction_type: None,
        accept: &["png", "jpg", "jpeg"],
        noun: "screenshot",
    },
];

impl JobConfig {
    pub fn multi_file(&self) -> bool {
        self.mode == FieldMode::Repeated
    }
}
