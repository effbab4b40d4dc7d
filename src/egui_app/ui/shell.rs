use eframe::egui::{self, Frame, Margin, RichText};

use super::EguiApp;
use super::style;
use crate::router::Route;

/// Entries in the navigation bar, in display order.
const NAV_ROUTES: [Route; 8] = [
    Route::Upload,
    Route::Dashboard,
    Route::BrdViewer,
    Route::ConflictReport,
    Route::Stakeholders,
    Route::Traceability,
    Route::Agents,
    Route::Export,
];

impl EguiApp {
    pub(super) fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_secondary)
                    .stroke(style::card_stroke())
                    .inner_margin(Margin::symmetric(16, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("BRDGen").strong().size(18.0).color(palette.accent));
                    ui.separator();
                    let current = self.controller.ui.route;
                    for route in NAV_ROUTES {
                        let selected = current == route
                            || (route == Route::Upload && current == Route::Processing);
                        if ui.selectable_label(selected, route.title()).clicked() {
                            self.controller.navigate(route);
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Sign out").clicked() {
                            self.controller.sign_out();
                        }
                        if let Some(identity) = &self.controller.ui.identity {
                            let badge = if identity.is_demo() { " · demo" } else { "" };
                            ui.label(
                                RichText::new(format!("{} · {}{badge}", identity.name, identity.role))
                                    .color(palette.text_muted),
                            )
                            .on_hover_text(&identity.email);
                        }
                    });
                });
            });
    }

    pub(super) fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_secondary)
                    .stroke(style::card_stroke())
                    .inner_margin(Margin::symmetric(12, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    let (dot, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(dot.center(), 4.0, style::status_color(status.tone));
                    ui.label(RichText::new(&status.text).color(palette.text_muted));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(self.controller.config().api_base.as_str())
                                .small()
                                .color(palette.text_faint),
                        );
                        if self.controller.demo_mode() {
                            ui.label(RichText::new("demo mode").small().color(palette.warning));
                        }
                    });
                });
            });
    }
}
