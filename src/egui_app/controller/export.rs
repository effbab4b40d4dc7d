use std::path::{Path, PathBuf};

use rfd::FileDialog;

use super::EguiController;
use crate::egui_app::state::StatusTone;

impl EguiController {
    /// File name offered when exporting the current result.
    pub fn export_file_name(&self) -> String {
        let project = self
            .session
            .current()
            .and_then(|stored| stored.payload.result.project_name.clone())
            .unwrap_or_else(|| "brd".to_string());
        let slug: String = project
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_lowercase() } else { '-' })
            .collect();
        let slug = slug.trim_matches('-');
        if slug.is_empty() {
            "brd.json".to_string()
        } else {
            format!("{slug}-brd.json")
        }
    }

    pub fn export_via_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .set_title("Export BRD data")
            .add_filter("JSON", &["json"])
            .set_file_name(self.export_file_name())
            .save_file()
        else {
            return;
        };
        self.export_to(&path);
    }

    /// Write the raw session payload as pretty JSON.
    pub fn export_to(&mut self, path: &Path) -> Option<PathBuf> {
        let Some(stored) = self.session.current() else {
            self.set_status("Nothing to export yet", StatusTone::Warning);
            return None;
        };
        let written = serde_json::to_vec_pretty(&stored.payload.raw)
            .map_err(|err| err.to_string())
            .and_then(|bytes| std::fs::write(path, bytes).map_err(|err| err.to_string()));
        match written {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Exported BRD data");
                self.set_status(format!("Exported to {}", path.display()), StatusTone::Info);
                Some(path.to_path_buf())
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Export failed");
                self.ui.alert = Some(format!("Export failed: {err}"));
                None
            }
        }
    }
}
