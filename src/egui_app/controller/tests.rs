use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tempfile::{TempDir, tempdir};

use super::jobs::{JobMessage, LoginResult};
use super::{EguiController, Services};
use crate::api::{
    AnalysisBackend, AnalysisPayload, ApiError, GenerateRequest, ProjectHistoryEntry,
    UploadCategory,
};
use crate::auth::{AuthError, Credentials, IdentityProvider, RemoteAccount};
use crate::config::AppConfig;
use crate::pipeline::{InstantClock, PipelineEvent, PipelineState, StageStatus};
use crate::router::Route;
use crate::storage::IdentityStore;

struct CannedBackend {
    fail: bool,
}

impl AnalysisBackend for CannedBackend {
    fn generate(&self, request: &GenerateRequest) -> Result<AnalysisPayload, ApiError> {
        if self.fail {
            return Err(ApiError::Status {
                code: 500,
                detail: "backend down".into(),
            });
        }
        Ok(AnalysisPayload::from_value(json!({
            "project_name": request.project_name,
            "requirements": [{ "id": 1, "text": "Must export" }],
            "conflicts": [],
            "health_score": 64
        }))
        .unwrap())
    }

    fn projects(&self) -> Result<Vec<ProjectHistoryEntry>, ApiError> {
        Ok(vec![ProjectHistoryEntry {
            name: "Earlier".into(),
            created_at: Some("2024-01-02T03:04:05Z".into()),
            health_score: Some(91.0),
        }])
    }
}

struct RejectingProvider;

impl IdentityProvider for RejectingProvider {
    fn sign_in(&self, _credentials: &Credentials) -> Result<RemoteAccount, AuthError> {
        Err(AuthError::Remote("INVALID_PASSWORD".into()))
    }
}

fn controller(fail: bool, demo_mode: bool) -> (EguiController, TempDir) {
    let dir = tempdir().unwrap();
    let config = AppConfig {
        demo_mode,
        ..Default::default()
    };
    let services = Services {
        backend: Arc::new(CannedBackend { fail }),
        provider: Arc::new(RejectingProvider),
        identities: IdentityStore::at(dir.path().join("user.json")),
        credentials: None,
        clock: Arc::new(InstantClock::new()),
    };
    (EguiController::new(config, services), dir)
}

fn pump_until(controller: &mut EguiController, done: impl Fn(&EguiController) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(controller) {
        assert!(Instant::now() < deadline, "timed out waiting for background work");
        controller.poll_background_jobs();
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn sign_in_demo(controller: &mut EguiController) {
    controller.ui.login.email = "ada@example.com".into();
    controller.ui.login.password = "pw".into();
    controller.submit_login();
    pump_until(controller, |c| c.ui.identity.is_some());
}

#[test]
fn protected_routes_redirect_without_identity() {
    let (mut controller, _dir) = controller(false, false);
    controller.navigate(Route::Dashboard);
    assert_eq!(controller.ui.route, Route::Login);
    controller.navigate_path("/BRDGen-Report/export");
    assert_eq!(controller.ui.route, Route::Login);
}

#[test]
fn demo_login_lands_on_upload() {
    let (mut controller, _dir) = controller(false, true);
    sign_in_demo(&mut controller);
    assert_eq!(controller.ui.route, Route::Upload);
    assert_eq!(
        controller.ui.identity.as_ref().map(|identity| identity.uid.as_str()),
        Some("demo-YWRhQGV4")
    );
    assert!(controller.ui.login.password.is_empty());
}

#[test]
fn rejected_login_without_demo_mode_raises_alert() {
    let (mut controller, _dir) = controller(false, false);
    controller.ui.login.email = "ada@example.com".into();
    controller.ui.login.password = "pw".into();
    controller.submit_login();
    pump_until(&mut controller, |c| !c.ui.login.busy);
    assert_eq!(controller.ui.route, Route::Login);
    assert!(controller.ui.alert.as_deref().unwrap_or_default().contains("INVALID_PASSWORD"));
}

#[test]
fn invalid_form_is_reported_inline() {
    let (mut controller, _dir) = controller(false, true);
    controller.ui.login.email = "nope".into();
    controller.submit_login();
    assert!(!controller.ui.login.busy);
    assert!(controller.ui.login.error.is_some());
    controller.finish_login(LoginResult {
        result: Err(super::jobs::LoginFailure::Invalid("bad".into())),
    });
    assert_eq!(controller.ui.login.error.as_deref(), Some("bad"));
}

#[test]
fn successful_run_redirects_to_dashboard() {
    let (mut controller, dir) = controller(false, true);
    sign_in_demo(&mut controller);
    let notes = dir.path().join("notes.eml");
    std::fs::write(&notes, b"Subject: hi").unwrap();
    controller.attach_upload_file(UploadCategory::Emails, &notes);
    controller.ui.upload.project_name = "Apollo".into();
    controller.start_processing();
    assert_eq!(controller.ui.route, Route::Processing);

    pump_until(&mut controller, |c| c.ui.route == Route::Dashboard);
    assert_eq!(controller.ui.processing.state, PipelineState::Done);
    assert!(controller.ui.processing.board.all_complete());
    let view = controller.dashboard_view();
    assert_eq!(view.header, "Apollo");
    pump_until(&mut controller, |c| !c.ui.dashboard.history_loading);
    assert_eq!(controller.dashboard_view().history.len(), 1);

    let out = dir.path().join("export.json");
    assert_eq!(controller.export_to(&out), Some(out.clone()));
    let exported: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
    assert_eq!(exported["project_name"], "Apollo");
    assert_eq!(controller.export_file_name(), "apollo-brd.json");
}

#[test]
fn failed_run_stays_on_processing_with_error() {
    let (mut controller, _dir) = controller(true, true);
    sign_in_demo(&mut controller);
    controller.start_processing();
    pump_until(&mut controller, |c| c.ui.processing.state.is_terminal());
    assert_eq!(
        controller.ui.processing.state,
        PipelineState::Failed("Pipeline error: backend down".into())
    );
    assert_eq!(controller.ui.processing.board.count(StageStatus::Error), 1);
    assert_eq!(controller.ui.processing.board.count(StageStatus::Active), 0);
    assert!(controller.session().current().is_none());
    assert_eq!(controller.ui.route, Route::Processing);

    controller.back_to_upload();
    assert_eq!(controller.ui.route, Route::Upload);
    assert_eq!(controller.ui.processing.state, PipelineState::Idle);
}

#[test]
fn finished_worker_with_unread_events_is_still_pending() {
    let (mut controller, _dir) = controller(true, true);
    sign_in_demo(&mut controller);
    controller.start_processing();
    let deadline = Instant::now() + Duration::from_secs(5);
    while !controller
        .jobs
        .pipeline
        .as_ref()
        .is_some_and(|handle| handle.is_finished())
    {
        assert!(Instant::now() < deadline, "pipeline worker did not finish");
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(controller.ui.processing.state, PipelineState::Running);
    assert!(controller.has_pending_work());

    pump_until(&mut controller, |c| c.ui.processing.state.is_terminal());
    pump_until(&mut controller, |c| !c.has_pending_work());
}

#[test]
fn terminal_event_ends_pending_work() {
    let (mut controller, _dir) = controller(false, false);
    assert!(!controller.has_pending_work());
    controller.ui.processing.state = PipelineState::Running;
    assert!(controller.has_pending_work());
    controller.apply_pipeline_event(PipelineEvent::Failed {
        message: "Pipeline error: HTTP 500".into(),
    });
    assert!(!controller.has_pending_work());
}

#[test]
fn history_message_updates_dashboard_state() {
    let (mut controller, _dir) = controller(false, false);
    controller.handle_job_message(JobMessage::HistoryLoaded(Vec::new()));
    assert!(controller.ui.dashboard.history.is_empty());
    assert!(!controller.ui.dashboard.history_loading);
}
