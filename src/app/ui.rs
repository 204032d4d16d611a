use eframe::egui::{self, Align, Color32, RichText, Stroke};

use super::{Phase, Statdrop};
use crate::upload::JOBS;
use crate::utils::file_size::format_size;

const ACCENT: Color32 = Color32::from_rgb(86, 156, 214);
const OK_GREEN: Color32 = Color32::from_rgb(0, 180, 0);
const ERR_RED: Color32 = Color32::from_rgb(220, 50, 50);

impl Statdrop {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(16.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Statdrop");
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new("Upload a game log or screenshots, preview the extracted data")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });
                ui.add_space(16.0);

                self.render_job_selector(ui);
                ui.add_space(12.0);
                self.render_drop_zone(ctx, ui);
                ui.add_space(12.0);
                self.render_submit(ui);
                ui.add_space(12.0);
                self.render_progress(ui);
                self.render_banners(ui);
                self.render_preview(ui);
                ui.add_space(16.0);
            });
        });
    }

    fn render_job_selector(&mut self, ui: &mut egui::Ui) {
        let mut selected = None;
        ui.add_enabled_ui(!self.state.is_submitting(), |ui| {
            ui.horizontal(|ui| {
                ui.label("Extraction:");
                egui::ComboBox::from_id_source("job_selector")
                    .selected_text(self.job().label)
                    .show_ui(ui, |ui| {
                        for (i, job) in JOBS.iter().enumerate() {
                            if ui
                                .selectable_label(i == self.job_index, job.label)
                                .clicked()
                            {
                                selected = Some(i);
                            }
                        }
                    });
            });
        });
        if let Some(index) = selected {
            self.select_job(index);
        }
    }

    fn render_drop_zone(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        // Highlight while files hover over the window; cosmetic only.
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let stroke = if hovering {
            Stroke::new(2.0, ACCENT)
        } else {
            Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
        };

        let mut browse_clicked = false;
        egui::Frame::none()
            .stroke(stroke)
            .rounding(6.0)
            .inner_margin(18.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    match &self.state.status_line {
                        Some(line) => {
                            ui.label(RichText::new(line).color(OK_GREEN));
                            for file in self.state.files.iter() {
                                ui.label(
                                    RichText::new(format!(
                                        "{} ({})",
                                        file.name,
                                        format_size(file.size)
                                    ))
                                    .small(),
                                );
                            }
                        }
                        None => {
                            ui.label(format!(
                                "Drag & drop your {}(s) here",
                                self.job().noun
                            ));
                        }
                    }
                    ui.add_space(8.0);
                    ui.add_enabled_ui(!self.state.is_submitting(), |ui| {
                        if ui.button("📁 Browse…").clicked() {
                            browse_clicked = true;
                        }
                    });
                });
            });
        if browse_clicked {
            self.browse();
        }
    }

    fn render_submit(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            // In-flight guard: one submission at a time.
            let can_submit = !self.state.files.is_empty() && !self.state.is_submitting();
            ui.add_enabled_ui(can_submit, |ui| {
                let label = if self.state.is_submitting() {
                    "⏳ Extracting…"
                } else {
                    "📤 Extract Data"
                };
                let button = egui::Button::new(label).min_size(egui::vec2(180.0, 36.0));
                if ui.add(button).clicked() {
                    self.start_submit();
                }
            });
        });
    }

    fn render_progress(&mut self, ui: &mut egui::Ui) {
        if !self.state.show_progress() {
            return;
        }
        let Some(ticker) = &self.state.ticker else {
            return;
        };
        ui.group(|ui| {
            let caption = if self.state.is_submitting() {
                "Processing, please wait…".to_string()
            } else {
                format!("Processing {}%", ticker.percent())
            };
            ui.label(caption);
            let bar = egui::ProgressBar::new(ticker.fraction())
                .show_percentage()
                .fill(ACCENT);
            ui.add(bar);
        });
        ui.add_space(8.0);
    }

    fn render_banners(&mut self, ui: &mut egui::Ui) {
        if let Some(error) = &self.state.error_banner {
            ui.vertical_centered(|ui| {
                ui.colored_label(ERR_RED, error);
            });
            ui.add_space(8.0);
        }
        if self.state.phase == Phase::PreviewReady {
            if let Some(message) = &self.state.success_message {
                ui.vertical_centered(|ui| {
                    ui.colored_label(OK_GREEN, message);
                });
                ui.add_space(8.0);
            }
        }
    }

    fn render_preview(&mut self, ui: &mut egui::Ui) {
        let excel = self.state.downloads.excel.clone();
        let csv = self.state.downloads.csv.clone();

        if self.state.preview.is_some() {
            ui.separator();
            ui.add_space(8.0);
            ui.with_layout(egui::Layout::left_to_right(Align::Center), |ui| {
                if let Some(path) = &excel {
                    if ui.button("⬇ Download spreadsheet (Excel)").clicked() {
                        self.open_download(path);
                    }
                }
                if let Some(path) = &csv {
                    if ui.button("⬇ Download CSV").clicked() {
                        self.open_download(path);
                    }
                }
            });
            ui.add_space(8.0);
        }

        if let Some(preview) = &mut self.state.preview {
            preview.show(ui);
        }
    }
}
