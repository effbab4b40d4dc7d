use std::path::Path;

use rfd::FileDialog;

use super::EguiController;
use crate::api::{FileBlob, UploadCategory};
use crate::egui_app::state::StatusTone;

impl EguiController {
    /// Ask for a file for `category` and attach it.
    pub fn pick_upload_file(&mut self, category: UploadCategory) {
        let Some(path) = FileDialog::new()
            .set_title(format!("Select {}", category.label()))
            .pick_file()
        else {
            return;
        };
        self.attach_upload_file(category, &path);
    }

    pub fn attach_upload_file(&mut self, category: UploadCategory, path: &Path) {
        match FileBlob::read(path) {
            Ok(blob) => {
                tracing::info!(
                    category = category.field_name(),
                    file = %blob.file_name,
                    bytes = blob.bytes.len(),
                    "Attached upload"
                );
                self.ui.upload.error = None;
                self.ui.upload.files.set(category, Some(blob));
            }
            Err(err) => {
                let message = format!("Could not read {}: {err}", path.display());
                tracing::warn!(path = %path.display(), error = %err, "Upload read failed");
                self.ui.upload.error = Some(message);
            }
        }
    }

    pub fn clear_upload_file(&mut self, category: UploadCategory) {
        self.ui.upload.files.set(category, None);
    }

    pub(super) fn reset_upload_form(&mut self) {
        self.ui.upload = Default::default();
        self.set_status("Ready", StatusTone::Info);
    }
}
