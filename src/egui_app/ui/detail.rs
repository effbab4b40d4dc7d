use eframe::egui::{self, RichText};

use super::EguiApp;
use super::style;
use crate::api::AnalysisPayload;
use crate::dashboard::{ConflictRow, RequirementKind, RequirementRow};
use crate::router::Route;

/// Payload keys tried, in order, for each raw-data view.
fn section_keys(route: Route) -> &'static [&'static str] {
    match route {
        Route::Stakeholders => &["stakeholders", "stakeholder_map"],
        Route::Traceability => &["traceability", "traceability_matrix", "provenance"],
        Route::Agents => &["agents", "agent_trace"],
        _ => &[],
    }
}

impl EguiApp {
    /// Current payload, or a prompt to run an analysis first.
    fn with_payload(&mut self, ui: &mut egui::Ui, route: Route) -> Option<std::sync::Arc<AnalysisPayload>> {
        let palette = style::palette();
        ui.heading(RichText::new(route.title()).strong());
        ui.add_space(12.0);
        match self.controller.session().current() {
            Some(stored) => Some(stored.payload),
            None => {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("No analysis loaded.").color(palette.text_faint));
                    if ui.link("Upload documents →").clicked() {
                        self.controller.navigate(Route::Upload);
                    }
                });
                None
            }
        }
    }

    pub(super) fn render_brd_viewer(&mut self, ui: &mut egui::Ui) {
        let Some(payload) = self.with_payload(ui, Route::BrdViewer) else {
            return;
        };
        let palette = style::palette();
        let result = &payload.result;
        if let Some(name) = &result.project_name {
            ui.label(RichText::new(name).color(palette.text_muted));
        }
        ui.label(
            RichText::new(format!("{} requirements", result.requirements.len()))
                .small()
                .color(palette.text_faint),
        );
        ui.add_space(8.0);
        egui::ScrollArea::vertical()
            .id_salt("brd_requirements_scroll")
            .show(ui, |ui| {
                for requirement in &result.requirements {
                    let row = RequirementRow::from_requirement(requirement, usize::MAX);
                    let accent = match row.kind {
                        RequirementKind::Hard => palette.accent,
                        RequirementKind::Soft => palette.text_faint,
                    };
                    ui.horizontal_wrapped(|ui| {
                        ui.label(RichText::new(format!("[{}]", row.id)).small().color(accent));
                        ui.label(&row.text);
                    });
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(row.kind.badge()).small().strong().color(accent));
                        if let Some(priority) = &row.priority {
                            ui.label(RichText::new(priority).small().color(palette.text_faint));
                        }
                        ui.label(RichText::new(&row.sources).small().color(palette.text_faint));
                    });
                    ui.separator();
                }
            });
    }

    pub(super) fn render_conflict_report(&mut self, ui: &mut egui::Ui) {
        let Some(payload) = self.with_payload(ui, Route::ConflictReport) else {
            return;
        };
        let palette = style::palette();
        let conflicts = &payload.result.conflicts;
        if conflicts.is_empty() {
            ui.label(RichText::new("No conflicts detected.").color(palette.success));
            return;
        }
        egui::ScrollArea::vertical()
            .id_salt("conflict_report_scroll")
            .show(ui, |ui| {
                egui::Grid::new("conflict_report_grid")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for conflict in conflicts {
                            let row = ConflictRow::from_conflict(conflict, usize::MAX);
                            ui.label(
                                RichText::new(row.conflict_type.to_uppercase())
                                    .small()
                                    .strong()
                                    .color(palette.warning),
                            );
                            ui.label(row.topic);
                            ui.end_row();
                        }
                    });
            });
    }

    pub(super) fn render_raw_section(&mut self, ui: &mut egui::Ui, route: Route) {
        let Some(payload) = self.with_payload(ui, route) else {
            return;
        };
        let palette = style::palette();
        let section = section_keys(route)
            .iter()
            .find_map(|key| payload.section(key));
        let Some(section) = section else {
            ui.label(
                RichText::new("The backend did not return this section for the current analysis.")
                    .color(palette.text_faint),
            );
            return;
        };
        let text = serde_json::to_string_pretty(section).unwrap_or_else(|err| err.to_string());
        egui::ScrollArea::both()
            .id_salt(("raw_section_scroll", route.segment()))
            .show(ui, |ui| {
                ui.label(RichText::new(text).monospace().color(palette.text_primary));
            });
    }

    pub(super) fn render_export(&mut self, ui: &mut egui::Ui) {
        let Some(payload) = self.with_payload(ui, Route::Export) else {
            return;
        };
        let palette = style::palette();
        let result = &payload.result;
        ui.label(
            RichText::new(format!(
                "{} · {} requirements · {} conflicts",
                result.project_name.as_deref().unwrap_or("Untitled"),
                result.requirements.len(),
                result.conflicts.len()
            ))
            .color(palette.text_muted),
        );
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("Save JSON…").clicked() {
                self.controller.export_via_dialog();
            }
            ui.label(
                RichText::new(self.controller.export_file_name())
                    .small()
                    .color(palette.text_faint),
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_views_have_section_keys() {
        for route in [Route::Stakeholders, Route::Traceability, Route::Agents] {
            assert!(!section_keys(route).is_empty());
        }
        assert!(section_keys(Route::Dashboard).is_empty());
    }
}
