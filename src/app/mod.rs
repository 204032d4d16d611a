mod state;
mod table;
mod ui;

use std::sync::mpsc as std_mpsc;
use std::time::Instant;

use eframe::{egui, App};

pub use state::{Phase, SessionState};

use crate::progress::ProgressTicker;
use crate::upload::{ExtractionClient, JobConfig, PickedFile, UploadError, JOBS};

pub struct Statdrop {
    client: ExtractionClient,
    job_index: usize,
    state: SessionState,
}

impl Statdrop {
    pub fn new(_cc: &eframe::CreationContext<'_>, server: String) -> Self {
        Self {
            client: ExtractionClient::new(server),
            job_index: 0,
            state: SessionState::default(),
        }
    }

    pub fn job(&self) -> &'static JobConfig {
        &JOBS[self.job_index]
    }

    /// Switching jobs changes the accepted file kind, so the selection is
    /// dropped. Blocked while a request is pending.
    pub fn select_job(&mut self, index: usize) {
        if index == self.job_index || self.state.is_submitting() {
            return;
        }
        self.job_index = index;
        self.state.files.clear();
        self.state.status_line = None;
        if self.state.phase == Phase::FileSelected {
            self.state.phase = Phase::Idle;
        }
    }

    /// Adopt files dropped anywhere on the window. Drops without a usable
    /// path (or with zero files) warn and change nothing.
    fn handle_dropped(&mut self, dropped: Vec<egui::DroppedFile>) {
        let files: Vec<PickedFile> = dropped
            .into_iter()
            .filter_map(|file| {
                let path = file.path?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.name.clone());
                let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                Some(PickedFile { name, path, size })
            })
            .collect();
        self.state.select_files(files, self.job().noun);
    }

    /// Native picker path; converges on the same FileSet as the drop zone.
    fn browse(&mut self) {
        let job = self.job();
        let dialog = rfd::FileDialog::new().add_filter(job.label, job.accept);
        let paths = if job.multi_file() {
            dialog.pick_files().unwrap_or_default()
        } else {
            dialog.pick_file().into_iter().collect()
        };
        if paths.is_empty() {
            // Picker dismissed; not a selection event.
            return;
        }
        let files = paths
            .into_iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                PickedFile { name, path, size }
            })
            .collect();
        self.state.select_files(files, job.noun);
    }

    /// Exactly one POST per click: validation, then ticker start, then the
    /// worker thread. The submit button is disabled while a request is
    /// pending, so outcomes can never interleave.
    fn start_submit(&mut self) {
        if !self.state.try_begin_submit() {
            return;
        }

        let job = self.job();
        let files = self.state.files.to_vec();
        let client = self.client.clone();
        log::info!(
            "submitting {} file(s) to {}{}",
            files.len(),
            client.base_url(),
            job.endpoint
        );

        let (sender, receiver) = std_mpsc::channel();
        self.state.outcome_receiver = Some(receiver);

        std::thread::spawn(move || {
            let outcome = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(client.submit(job, files)),
                Err(e) => Err(UploadError::Runtime(e)),
            };
            let _ = sender.send(outcome);
        });
    }

    /// Drain the worker channel and advance the simulated progress. Both run
    /// inside one `update` turn, so the ticker is always resolved before the
    /// preview or error for the same request becomes visible.
    fn pump(&mut self, ctx: &egui::Context) {
        if let Some(receiver) = self.state.outcome_receiver.take() {
            match receiver.try_recv() {
                Ok(outcome) => {
                    self.state.apply_outcome(outcome);
                    ctx.request_repaint();
                }
                Err(std_mpsc::TryRecvError::Empty) => {
                    self.state.outcome_receiver = Some(receiver);
                }
                Err(std_mpsc::TryRecvError::Disconnected) => {
                    self.state.apply_outcome(Err(UploadError::WorkerExited));
                    ctx.request_repaint();
                }
            }
        }

        if self.state.is_submitting() {
            if let Some(ticker) = &mut self.state.ticker {
                ticker.tick(Instant::now());
            }
            ctx.request_repaint_after(ProgressTicker::period());
        }
    }

    /// Open a generated artifact in the browser, resolved against the server.
    fn open_download(&self, path: &str) {
        let url = crate::upload::resolve_url(self.client.base_url(), path);
        log::info!("opening {}", url);
        if let Err(e) = open::that(&url) {
            log::warn!("failed to open {}: {}", url, e);
        }
    }
}

impl App for Statdrop {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if !dropped.is_empty() {
            self.handle_dropped(dropped);
        }
        self.pump(ctx);
        self.render(ctx);
    }
}
