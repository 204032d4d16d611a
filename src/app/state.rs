use std::sync::mpsc::Receiver;

use crate::app::table::PreviewTable;
use crate::progress::ProgressTicker;
use crate::upload::{ExtractionOutcome, PickedFile};

/// Display mode of the session. Transitions are event-driven: file selection,
/// submit, and the single completion message from the worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    FileSelected,
    Submitting,
    PreviewReady,
    Failed,
}

/// The user's currently active selection. Replaced wholesale on every drop or
/// pick; never merged.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: Vec<PickedFile>,
}

impl FileSet {
    pub fn replace(&mut self, files: Vec<PickedFile>) {
        self.files = files;
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PickedFile> {
        self.files.iter()
    }

    pub fn to_vec(&self) -> Vec<PickedFile> {
        self.files.clone()
    }
}

/// Links to the artifacts generated server-side for the last success.
#[derive(Debug, Clone, Default)]
pub struct DownloadLinks {
    pub excel: Option<String>,
    pub csv: Option<String>,
}

/// Everything one session owns. All mutation happens on the GUI thread; the
/// worker only ever sends a single outcome through `outcome_receiver`.
#[derive(Default)]
pub struct SessionState {
    pub phase: Phase,
    pub files: FileSet,
    pub status_line: Option<String>,
    pub error_banner: Option<String>,
    pub success_message: Option<String>,
    pub preview: Option<PreviewTable>,
    pub downloads: DownloadLinks,
    pub ticker: Option<ProgressTicker>,
    pub outcome_receiver: Option<Receiver<ExtractionOutcome>>,
}

impl SessionState {
    /// Adopt a new selection from either the drop zone or the picker. An
    /// empty set warns and leaves everything unchanged.
    pub fn select_files(&mut self, files: Vec<PickedFile>, noun: &str) {
        if files.is_empty() {
            self.error_banner = Some("No files detected. Please try again.".to_string());
            log::warn!("selection event carried no usable files");
            return;
        }
        self.status_line = Some(format!("{} {}(s) loaded.", files.len(), noun));
        self.files.replace(files);
        self.error_banner = None;
        if self.phase != Phase::Submitting {
            self.phase = Phase::FileSelected;
        }
    }

    /// Validate and enter `Submitting`. Returns false without touching
    /// anything but the warning banner when the selection is empty, so the
    /// caller never spawns a request for an empty FileSet.
    pub fn try_begin_submit(&mut self) -> bool {
        if self.files.is_empty() {
            self.error_banner = Some("Please choose a file first.".to_string());
            log::warn!("submit refused: empty file selection");
            return false;
        }
        self.phase = Phase::Submitting;
        self.error_banner = None;
        self.success_message = None;
        self.ticker = Some(ProgressTicker::start());
        true
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// The progress bar is visible while a request is pending and after a
    /// success (parked at 100). A failure hides it; the error banner is the
    /// only failure channel.
    pub fn show_progress(&self) -> bool {
        self.ticker.is_some()
            && matches!(self.phase, Phase::Submitting | Phase::PreviewReady)
    }

    /// Handle the worker's single completion message. The ticker is resolved
    /// first, then the preview or error banner is updated, so progress can
    /// never tick after the result is visible.
    pub fn apply_outcome(&mut self, outcome: ExtractionOutcome) {
        self.outcome_receiver = None;
        match outcome {
            Ok(success) => {
                if let Some(ticker) = &mut self.ticker {
                    ticker.finish();
                }
                log::info!("extraction succeeded: {} record(s)", success.records.len());
                self.preview = Some(PreviewTable::from_records(&success.records));
                self.downloads = DownloadLinks {
                    excel: success.excel_file,
                    csv: success.csv_file,
                };
                self.success_message = success.message;
                self.phase = Phase::PreviewReady;
            }
            Err(error) => {
                if let Some(ticker) = &mut self.ticker {
                    ticker.cancel();
                }
                // A previously rendered preview stays visible unchanged.
                log::error!("extraction failed: {}", error);
                self.error_banner = Some(error.user_message());
                self.phase = Phase::Failed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{ExtractionSuccess, UploadError};
    use std::path::PathBuf;

    fn picked(name: &str) -> PickedFile {
        PickedFile {
            name: name.to_string(),
            path: PathBuf::from(name),
            size: 10,
        }
    }

    fn success_with(rows: serde_json::Value, excel: &str) -> ExtractionOutcome {
        let records = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect();
        Ok(ExtractionSuccess {
            message: None,
            records,
            excel_file: Some(excel.to_string()),
            csv_file: None,
        })
    }

    #[test]
    fn drop_replaces_the_selection_wholesale() {
        let mut state = SessionState::default();
        state.select_files(vec![picked("a.png"), picked("b.png")], "screenshot");
        state.select_files(vec![picked("c.png")], "screenshot");
        assert_eq!(state.files.len(), 1);
        assert_eq!(state.status_line.as_deref(), Some("1 screenshot(s) loaded."));
        assert_eq!(state.phase, Phase::FileSelected);
    }

    #[test]
    fn empty_drop_warns_and_changes_nothing() {
        let mut state = SessionState::default();
        state.select_files(vec![picked("a.png")], "screenshot");
        state.select_files(Vec::new(), "screenshot");
        assert_eq!(state.files.len(), 1);
        assert!(state.error_banner.is_some());
        assert_eq!(state.phase, Phase::FileSelected);
    }

    #[test]
    fn empty_submit_is_refused_before_any_request() {
        let mut state = SessionState::default();
        assert!(!state.try_begin_submit());
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.ticker.is_none());
        assert!(state.error_banner.is_some());
    }

    #[test]
    fn submit_starts_the_ticker_and_enters_submitting() {
        let mut state = SessionState::default();
        state.select_files(vec![picked("log.txt")], "file");
        assert!(state.try_begin_submit());
        assert!(state.is_submitting());
        assert_eq!(state.ticker.as_ref().map(ProgressTicker::percent), Some(0));
    }

    #[test]
    fn success_renders_preview_and_drives_progress_to_100() {
        let mut state = SessionState::default();
        state.select_files(vec![picked("a.png")], "screenshot");
        state.try_begin_submit();
        state.apply_outcome(success_with(
            serde_json::json!([{"a": 1, "b": 2}]),
            "/f.xlsx",
        ));

        assert_eq!(state.phase, Phase::PreviewReady);
        let preview = state.preview.as_ref().unwrap();
        assert_eq!(preview.column_count(), 2);
        assert_eq!(preview.row_count(), 1);
        assert_eq!(state.downloads.excel.as_deref(), Some("/f.xlsx"));
        assert_eq!(state.ticker.as_ref().unwrap().percent(), 100);
    }

    #[test]
    fn application_error_keeps_the_prior_preview() {
        let mut state = SessionState::default();
        state.select_files(vec![picked("a.png")], "screenshot");
        state.try_begin_submit();
        state.apply_outcome(success_with(serde_json::json!([{"a": 1}]), "/f.xlsx"));

        state.try_begin_submit();
        state.apply_outcome(Err(UploadError::Server("bad file".to_string())));

        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(state.error_banner.as_deref(), Some("bad file"));
        let preview = state.preview.as_ref().unwrap();
        assert_eq!(preview.row_count(), 1);
        let ticker = state.ticker.as_ref().unwrap();
        assert!(ticker.is_resolved());
        assert!(ticker.percent() < 100);
    }

    #[test]
    fn progress_bar_hides_after_a_failure() {
        let mut state = SessionState::default();
        state.select_files(vec![picked("a.txt")], "file");
        state.try_begin_submit();
        assert!(state.show_progress());

        state.apply_outcome(Err(UploadError::Server("bad file".to_string())));
        assert!(!state.show_progress());

        // A later success shows it again, parked at 100.
        state.try_begin_submit();
        state.apply_outcome(success_with(serde_json::json!([{"a": 1}]), "/f.xlsx"));
        assert!(state.show_progress());
        assert_eq!(state.ticker.as_ref().unwrap().percent(), 100);
    }

    #[test]
    fn transport_error_shows_the_generic_message() {
        let mut state = SessionState::default();
        state.select_files(vec![picked("a.txt")], "file");
        state.try_begin_submit();
        state.apply_outcome(Err(UploadError::Status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        )));
        assert_eq!(
            state.error_banner.as_deref(),
            Some("Something went wrong while extracting. Please try again.")
        );
        assert!(state.preview.is_none());
    }
}
