use std::thread;

use super::EguiController;
use super::jobs::JobMessage;
use crate::api::{ProjectHistoryEntry, fetch_history};
use crate::dashboard::DashboardView;
use crate::router::{Resolution, Route};

impl EguiController {
    /// Switch views, applying the identity guard.
    pub fn navigate(&mut self, route: Route) {
        let signed_in = self.ui.identity.is_some();
        let target = match self.router.guard(route, signed_in) {
            Resolution::Render(allowed) => allowed,
            Resolution::Redirect(fallback) => {
                tracing::info!(requested = ?route, "Sign in required");
                fallback
            }
        };
        if target == Route::Dashboard && self.ui.route != Route::Dashboard {
            self.refresh_history();
        }
        self.ui.route = target;
    }

    /// Navigate by path, e.g. from a command-line deep link.
    pub fn navigate_path(&mut self, path: &str) {
        let route = self.router.resolve(path).route();
        self.navigate(route);
    }

    /// Projection of the session result and fetched history.
    pub fn dashboard_view(&self) -> DashboardView {
        let stored = self.session.current();
        DashboardView::project(
            stored.as_ref().map(|stored| &stored.payload.result),
            &self.ui.dashboard.history,
        )
    }

    pub fn refresh_history(&mut self) {
        if self.jobs.history_in_progress {
            return;
        }
        self.jobs.history_in_progress = true;
        self.ui.dashboard.history_loading = true;
        let backend = std::sync::Arc::clone(&self.backend);
        let tx = self.jobs.message_sender();
        thread::spawn(move || {
            let history = fetch_history(backend.as_ref());
            let _ = tx.send(JobMessage::HistoryLoaded(history));
        });
    }

    pub(super) fn finish_history(&mut self, history: Vec<ProjectHistoryEntry>) {
        self.jobs.history_in_progress = false;
        self.ui.dashboard.history_loading = false;
        self.ui.dashboard.history = history;
    }
}
