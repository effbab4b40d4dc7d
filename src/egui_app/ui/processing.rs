use eframe::egui::{self, Frame, RichText};

use super::EguiApp;
use super::style;
use crate::pipeline::{FAILURE_HINT, PipelineState, StageIcon, StageStatus};

impl EguiApp {
    pub(super) fn render_processing(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let processing = self.controller.ui.processing.clone();
        ui.vertical_centered(|ui| {
            ui.heading(RichText::new("Processing pipeline").strong());
            ui.label(RichText::new(&processing.project_name).color(palette.text_muted));
        });
        ui.add_space(16.0);

        for stage in processing.board.stages() {
            let color = style::stage_color(stage.status);
            Frame::new()
                .fill(palette.bg_card)
                .stroke(egui::Stroke::new(
                    1.0,
                    if stage.status == StageStatus::Pending {
                        palette.outline
                    } else {
                        color
                    },
                ))
                .corner_radius(8.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(status_glyph(stage.status, stage.definition.icon)).color(color));
                        ui.vertical(|ui| {
                            ui.label(
                                RichText::new(format!(
                                    "{}. {}",
                                    stage.definition.id, stage.definition.name
                                ))
                                .strong()
                                .color(palette.text_primary),
                            );
                            ui.label(
                                RichText::new(stage.definition.description)
                                    .small()
                                    .color(palette.text_faint),
                            );
                        });
                        if stage.status == StageStatus::Active {
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.add(egui::Spinner::new().color(palette.accent));
                            });
                        }
                    });
                });
            ui.add_space(4.0);
        }

        ui.add_space(12.0);
        ui.label(
            RichText::new(format!("> {}", processing.current_log()))
                .monospace()
                .color(palette.accent),
        );

        match &processing.state {
            PipelineState::Failed(message) => {
                ui.add_space(12.0);
                Frame::new()
                    .fill(palette.danger.gamma_multiply(0.12))
                    .stroke(egui::Stroke::new(1.0, palette.danger))
                    .corner_radius(8.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new("Pipeline Error").strong().color(palette.danger));
                        ui.label(RichText::new(message).color(palette.text_primary));
                        ui.label(RichText::new(FAILURE_HINT).small().color(palette.text_muted));
                        ui.add_space(8.0);
                        if ui.button("Back to upload").clicked() {
                            self.controller.back_to_upload();
                        }
                    });
            }
            PipelineState::Done => {
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Intelligence Center ready").color(palette.success));
                    if ui.button("Open now").clicked() {
                        self.controller.navigate(crate::router::Route::Dashboard);
                    }
                });
            }
            PipelineState::Idle | PipelineState::Running => {}
        }
    }
}

fn status_glyph(status: StageStatus, icon: StageIcon) -> &'static str {
    match status {
        StageStatus::Complete => "✔",
        StageStatus::Error => "✖",
        StageStatus::Active => "●",
        StageStatus::Pending => match icon {
            StageIcon::Database => "🗄",
            StageIcon::Zap => "⚡",
            StageIcon::Shield => "🛡",
            StageIcon::GitBranch => "⎇",
            StageIcon::AlertTriangle => "⚠",
            StageIcon::Brain => "🧠",
            StageIcon::Sparkles => "✨",
        },
    }
}
