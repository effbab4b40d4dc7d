use eframe::egui::{self, Frame, RichText};

use super::EguiApp;
use super::style;

impl EguiApp {
    pub(super) fn render_login(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.18);
            ui.label(RichText::new("BRDGen").size(34.0).strong().color(palette.accent));
            ui.label(
                RichText::new("Document intelligence for business requirements")
                    .color(palette.text_muted),
            );
            ui.add_space(24.0);
            Frame::new()
                .fill(palette.bg_card)
                .stroke(style::card_stroke())
                .corner_radius(12.0)
                .inner_margin(24.0)
                .show(ui, |ui| {
                    ui.set_width(360.0);
                    self.render_login_form(ui);
                });
        });
    }

    fn render_login_form(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let busy = self.controller.ui.login.busy;
        let mut submit = false;
        {
            let form = &mut self.controller.ui.login;
            ui.label(RichText::new("Email").color(palette.text_muted));
            let email = ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(&mut form.email)
                    .hint_text("you@company.com")
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(8.0);
            ui.label(RichText::new("Password").color(palette.text_muted));
            let password = ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(&mut form.password)
                    .password(true)
                    .desired_width(f32::INFINITY),
            );
            let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
            if enter && (email.lost_focus() || password.lost_focus()) {
                submit = true;
            }
            if let Some(error) = &form.error {
                ui.add_space(6.0);
                ui.label(RichText::new(error).color(palette.danger));
            }
        }
        ui.add_space(16.0);
        ui.horizontal(|ui| {
            let label = if busy { "Signing in…" } else { "Sign in" };
            if ui
                .add_enabled(!busy, egui::Button::new(RichText::new(label).strong()))
                .clicked()
            {
                submit = true;
            }
            if busy {
                ui.add(egui::Spinner::new());
            }
        });
        if self.controller.demo_mode() {
            ui.add_space(10.0);
            ui.label(
                RichText::new("Offline demo mode: failed sign-ins continue with a local identity.")
                    .small()
                    .color(palette.warning),
            );
        }
        if submit {
            self.controller.submit_login();
        }
    }
}
