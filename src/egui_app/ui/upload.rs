use eframe::egui::{self, Frame, RichText};

use super::EguiApp;
use super::style;
use crate::api::UploadCategory;
use crate::pipeline::DEFAULT_PROJECT_NAME;

impl EguiApp {
    pub(super) fn render_upload(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.heading(RichText::new("New analysis").strong());
        ui.label(
            RichText::new("Upload emails, meeting transcripts and chat exports to generate a BRD.")
                .color(palette.text_muted),
        );
        ui.add_space(16.0);

        ui.label(RichText::new("Project name").color(palette.text_muted));
        ui.add(
            egui::TextEdit::singleline(&mut self.controller.ui.upload.project_name)
                .hint_text(DEFAULT_PROJECT_NAME)
                .desired_width(420.0),
        );
        ui.add_space(16.0);

        for category in UploadCategory::ALL {
            self.render_upload_slot(ui, category);
            ui.add_space(8.0);
        }

        if let Some(error) = &self.controller.ui.upload.error {
            ui.label(RichText::new(error).color(palette.danger));
        }
        ui.add_space(12.0);
        let attached = self.controller.ui.upload.files.parts().count();
        ui.horizontal(|ui| {
            if ui
                .button(RichText::new("Run pipeline").strong().color(palette.accent))
                .clicked()
            {
                self.controller.start_processing();
            }
            ui.label(
                RichText::new(format!("{attached} of 3 sources attached"))
                    .small()
                    .color(palette.text_faint),
            );
        });
    }

    fn render_upload_slot(&mut self, ui: &mut egui::Ui, category: UploadCategory) {
        let palette = style::palette();
        let attached = self
            .controller
            .ui
            .upload
            .files
            .get(category)
            .map(|blob| (blob.file_name.clone(), blob.bytes.len()));
        Frame::new()
            .fill(palette.bg_card)
            .stroke(style::card_stroke())
            .corner_radius(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(420.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new(category.label()).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if attached.is_some() && ui.button("Remove").clicked() {
                            self.controller.clear_upload_file(category);
                        }
                        if ui.button("Choose file…").clicked() {
                            self.controller.pick_upload_file(category);
                        }
                    });
                });
                match &attached {
                    Some((name, size)) => ui.label(
                        RichText::new(format!("{name} ({size} bytes)")).color(palette.success),
                    ),
                    None => ui.label(RichText::new("No file selected").color(palette.text_faint)),
                };
            });
    }
}
