#![deny(missing_docs)]

//! Entry point for the egui-based BRDGen client.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use brdgen::config::AppConfig;
use brdgen::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use brdgen::logging;
use eframe::egui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let viewport = egui::ViewportBuilder::default()
        .with_title("BRDGen")
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_inner_size(egui::vec2(1280.0, 860.0));
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "BRDGen",
        native_options,
        Box::new(|_cc| {
            let app = AppConfig::load()
                .map_err(|err| format!("Failed to load config: {err}"))
                .and_then(|config| {
                    tracing::info!(
                        api_base = %config.api_base,
                        demo_mode = config.demo_mode,
                        "Starting BRDGen"
                    );
                    EguiApp::new(config)
                });
            match app {
                Ok(app) => Ok(Box::new(app)),
                Err(message) => {
                    tracing::error!(%message, "Startup failed");
                    Ok(Box::new(LaunchError { message }))
                }
            }
        }),
    )?;
    Ok(())
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start BRDGen");
                ui.label(&self.message);
            });
        });
    }
}
