//! egui renderer for the application UI.

mod dashboard;
mod detail;
mod login;
mod processing;
mod shell;
pub mod style;
mod upload;

use std::time::Duration;

use eframe::egui::{self, Align2, Frame, Margin, RichText};

use crate::config::AppConfig;
use crate::egui_app::controller::{EguiController, Services};
use crate::router::Route;

/// Smallest usable window.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(960.0, 640.0);

const BACKGROUND_POLL: Duration = Duration::from_millis(100);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create the app with production services.
    pub fn new(config: AppConfig) -> Result<Self, String> {
        let services = Services::from_config(&config)?;
        Ok(Self::with_controller(EguiController::new(config, services)))
    }

    pub fn with_controller(controller: EguiController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_route(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::CentralPanel::default()
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .inner_margin(Margin::symmetric(24, 16)),
            )
            .show(ctx, |ui| match self.controller.ui.route {
                Route::Login => self.render_login(ui),
                Route::Upload => self.render_upload(ui),
                Route::Processing => self.render_processing(ui),
                Route::Dashboard => self.render_dashboard(ui),
                Route::BrdViewer => self.render_brd_viewer(ui),
                Route::ConflictReport => self.render_conflict_report(ui),
                Route::Stakeholders | Route::Traceability | Route::Agents => {
                    let route = self.controller.ui.route;
                    self.render_raw_section(ui, route);
                }
                Route::Export => self.render_export(ui),
            });
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.controller.ui.alert.clone() else {
            return;
        };
        let palette = style::palette();
        let mut dismissed = false;
        egui::Window::new("Something went wrong")
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.label(RichText::new(message).color(palette.text_primary));
                ui.add_space(12.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.controller.dismiss_alert();
        }
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();
        if self.controller.ui.route.in_shell() {
            self.render_top_bar(ctx);
        }
        self.render_status(ctx);
        self.render_route(ctx);
        self.render_alert(ctx);
        if self.controller.has_pending_work() {
            ctx.request_repaint_after(BACKGROUND_POLL);
        }
    }
}
