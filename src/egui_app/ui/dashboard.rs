use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, Frame, Pos2, RichText, Stroke};

use super::EguiApp;
use super::style;
use crate::dashboard::{DashboardAction, DashboardView, HealthRing, RequirementKind};
use crate::router::Route;

const RING_SIZE: f32 = 100.0;
const RING_WIDTH: f32 = 8.0;
const ARC_SEGMENTS: usize = 96;

impl EguiApp {
    pub(super) fn render_dashboard(&mut self, ui: &mut egui::Ui) {
        let view = self.controller.dashboard_view();
        egui::ScrollArea::vertical()
            .id_salt("dashboard_scroll")
            .show(ui, |ui| {
                self.render_dashboard_header(ui, &view);
                ui.add_space(16.0);
                render_tiles(ui, &view);
                ui.add_space(16.0);
                ui.columns(2, |columns| {
                    render_health_card(&mut columns[0], &view.health);
                    self.render_requirement_card(&mut columns[1], &view);
                });
                if !view.conflicts.is_empty() {
                    ui.add_space(16.0);
                    self.render_conflict_card(ui, &view);
                }
                if !view.history.is_empty() {
                    ui.add_space(16.0);
                    render_history_card(ui, &view);
                }
            });
    }

    fn render_dashboard_header(&mut self, ui: &mut egui::Ui, view: &DashboardView) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    RichText::new("Intelligence Center")
                        .size(28.0)
                        .strong()
                        .italics(),
                );
                ui.label(RichText::new(&view.header).color(palette.text_muted));
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                for action in view.actions.iter().rev() {
                    let text = match action {
                        DashboardAction::Conflicts(_) => {
                            RichText::new(action.label()).color(palette.warning)
                        }
                        DashboardAction::ViewBrd | DashboardAction::Export => {
                            RichText::new(action.label())
                        }
                    };
                    if ui.button(text).clicked() {
                        let route = match action {
                            DashboardAction::ViewBrd => Route::BrdViewer,
                            DashboardAction::Conflicts(_) => Route::ConflictReport,
                            DashboardAction::Export => Route::Export,
                        };
                        self.controller.navigate(route);
                    }
                }
            });
        });
    }

    fn render_requirement_card(&mut self, ui: &mut egui::Ui, view: &DashboardView) {
        let palette = style::palette();
        card(ui, palette.bg_card, style::card_stroke(), |ui| {
            ui.horizontal(|ui| {
                ui.label(section_title("Extracted Requirements"));
                if !view.requirements.is_empty() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("View all →").clicked() {
                            self.controller.navigate(Route::BrdViewer);
                        }
                    });
                }
            });
            ui.add_space(8.0);
            if view.requirements.is_empty() {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("No analysis loaded.").color(palette.text_faint));
                    if ui.link("Upload documents →").clicked() {
                        self.controller.navigate(Route::Upload);
                    }
                });
                return;
            }
            for row in &view.requirements {
                let accent = match row.kind {
                    RequirementKind::Hard => palette.accent,
                    RequirementKind::Soft => palette.text_faint,
                };
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(format!("[{}]", row.id)).small().color(accent));
                    ui.label(RichText::new(&row.text).color(palette.text_primary));
                });
                ui.horizontal(|ui| {
                    ui.label(RichText::new(row.kind.badge()).small().strong().color(accent));
                    if let Some(priority) = &row.priority {
                        ui.label(RichText::new(priority).small().color(palette.text_faint));
                    }
                    ui.label(RichText::new(&row.sources).small().color(palette.text_faint));
                });
                ui.add_space(6.0);
            }
        });
    }

    fn render_conflict_card(&mut self, ui: &mut egui::Ui, view: &DashboardView) {
        let palette = style::palette();
        card(
            ui,
            palette.warning.gamma_multiply(0.08),
            Stroke::new(1.0, palette.warning.gamma_multiply(0.4)),
            |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⚠ Active Conflicts").small().strong().color(palette.warning));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("View all →").clicked() {
                            self.controller.navigate(Route::ConflictReport);
                        }
                    });
                });
                ui.add_space(6.0);
                for row in &view.conflicts {
                    ui.horizontal(|ui| {
                        ui.add_sized(
                            [80.0, 18.0],
                            egui::Label::new(
                                RichText::new(row.conflict_type.to_uppercase())
                                    .small()
                                    .strong()
                                    .color(palette.warning),
                            ),
                        );
                        ui.label(RichText::new(&row.topic).color(palette.text_primary));
                    });
                }
            },
        );
    }
}

fn section_title(text: &str) -> RichText {
    RichText::new(text.to_uppercase())
        .small()
        .strong()
        .color(style::palette().text_faint)
}

fn card(ui: &mut egui::Ui, fill: Color32, stroke: Stroke, add_contents: impl FnOnce(&mut egui::Ui)) {
    Frame::new()
        .fill(fill)
        .stroke(stroke)
        .corner_radius(12.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}

fn render_tiles(ui: &mut egui::Ui, view: &DashboardView) {
    let palette = style::palette();
    ui.columns(view.tiles.len(), |columns| {
        for (column, tile) in columns.iter_mut().zip(view.tiles.iter()) {
            let (fill, stroke, value_color) = if tile.warning {
                (
                    palette.warning.gamma_multiply(0.08),
                    Stroke::new(1.0, palette.warning.gamma_multiply(0.4)),
                    palette.warning,
                )
            } else {
                (palette.bg_card, style::card_stroke(), palette.text_primary)
            };
            card(column, fill, stroke, |ui| {
                ui.label(
                    RichText::new(tile.value.to_string())
                        .size(30.0)
                        .strong()
                        .color(value_color),
                );
                ui.label(section_title(tile.label()));
            });
        }
    });
}

fn render_health_card(ui: &mut egui::Ui, ring: &HealthRing) {
    let palette = style::palette();
    card(ui, palette.bg_card, style::card_stroke(), |ui| {
        ui.vertical_centered(|ui| {
            ui.label(section_title("BRD Health Score"));
            ui.add_space(8.0);
            let (rect, _) = ui.allocate_exact_size(egui::vec2(RING_SIZE, RING_SIZE), egui::Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = ring_radius(rect.width());
            painter.circle_stroke(center, radius, Stroke::new(RING_WIDTH, palette.ring_track));
            if let Some(tier) = ring.tier {
                let points = arc_points(center, radius, ring.fraction() as f32);
                if points.len() > 1 {
                    painter.add(egui::Shape::line(
                        points,
                        Stroke::new(RING_WIDTH, style::color(tier.color())),
                    ));
                }
            }
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                &ring.value_text,
                egui::FontId::proportional(24.0),
                palette.text_primary,
            );
            if ring.score.is_some() {
                painter.text(
                    center + egui::vec2(0.0, 18.0),
                    egui::Align2::CENTER_CENTER,
                    "/100",
                    egui::FontId::proportional(9.0),
                    palette.text_faint,
                );
            }
            ui.add_space(8.0);
            ui.label(RichText::new(ring.caption).small().color(palette.text_muted));
        });
    });
}

fn render_history_card(ui: &mut egui::Ui, view: &DashboardView) {
    let palette = style::palette();
    card(ui, palette.bg_secondary, style::card_stroke(), |ui| {
        ui.label(section_title("Project History"));
        ui.add_space(6.0);
        egui::Grid::new("project_history_grid")
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                for row in &view.history {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&row.name).strong());
                        ui.label(RichText::new(&row.date).small().color(palette.text_faint));
                    });
                    let (dot, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(dot.center(), 4.0, style::color(row.tier.color()));
                    ui.label(RichText::new(&row.score).strong().color(palette.text_muted));
                    ui.end_row();
                }
            });
    });
}

/// Ring radius scaled from the 100-unit gauge box.
fn ring_radius(box_size: f32) -> f32 {
    crate::dashboard::RING_RADIUS as f32 * box_size / RING_SIZE
}

/// Points along a clockwise arc starting at twelve o'clock.
fn arc_points(center: Pos2, radius: f32, fraction: f32) -> Vec<Pos2> {
    let fraction = fraction.clamp(0.0, 1.0);
    let steps = ((ARC_SEGMENTS as f32 * fraction).ceil() as usize).max(1);
    (0..=steps)
        .map(|step| {
            let angle = -FRAC_PI_2 + TAU * fraction * step as f32 / steps as f32;
            center + radius * egui::vec2(angle.cos(), angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_starts_at_top_and_spans_fraction() {
        let center = Pos2::new(50.0, 50.0);
        let points = arc_points(center, 36.0, 0.25);
        let first = points[0];
        let last = points[points.len() - 1];
        assert!((first.x - 50.0).abs() < 1e-3 && (first.y - 14.0).abs() < 1e-3);
        assert!((last.x - 86.0).abs() < 1e-3 && (last.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn ring_radius_matches_gauge_geometry() {
        assert!((ring_radius(100.0) - 36.0).abs() < f32::EPSILON);
    }
}
