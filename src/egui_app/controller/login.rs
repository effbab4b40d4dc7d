use std::sync::Arc;
use std::thread;

use super::EguiController;
use super::jobs::{JobMessage, LoginFailure, LoginResult};
use crate::auth::{AuthError, Credentials, LoginOrigin};
use crate::egui_app::state::StatusTone;
use crate::router::Route;

impl EguiController {
    /// Submit the login form on a worker thread.
    pub fn submit_login(&mut self) {
        if self.jobs.login_in_progress {
            return;
        }
        let credentials = Credentials::new(&self.ui.login.email, &self.ui.login.password);
        if let Err(err) = credentials.validate() {
            self.ui.login.error = Some(err.to_string());
            return;
        }
        self.ui.login.error = None;
        self.ui.login.busy = true;
        self.jobs.login_in_progress = true;
        self.set_status("Signing in…", StatusTone::Busy);

        let auth = Arc::clone(&self.auth);
        let tx = self.jobs.message_sender();
        thread::spawn(move || {
            let result = auth.login(&credentials).map_err(classify_failure);
            let _ = tx.send(JobMessage::LoginFinished(LoginResult { result }));
        });
    }

    pub(super) fn finish_login(&mut self, message: LoginResult) {
        self.jobs.login_in_progress = false;
        self.ui.login.busy = false;
        match message.result {
            Ok(outcome) => {
                self.ui.login.password.clear();
                let status = match outcome.origin {
                    LoginOrigin::Remote => format!("Signed in as {}", outcome.identity.name),
                    LoginOrigin::Demo => {
                        format!("Offline demo identity for {}", outcome.identity.name)
                    }
                };
                let tone = match outcome.origin {
                    LoginOrigin::Remote => StatusTone::Info,
                    LoginOrigin::Demo => StatusTone::Warning,
                };
                self.ui.identity = Some(outcome.identity);
                self.set_status(status, tone);
                self.navigate(Route::Upload);
            }
            Err(LoginFailure::Invalid(message)) => {
                self.ui.login.error = Some(message);
                self.set_status("Sign-in failed", StatusTone::Warning);
            }
            Err(LoginFailure::Blocking(message)) => {
                self.ui.alert = Some(message);
                self.set_status("Sign-in failed", StatusTone::Warning);
            }
        }
    }

    /// Forget the identity and return to the login page.
    pub fn sign_out(&mut self) {
        if let Err(err) = self.auth.sign_out() {
            tracing::warn!(error = %err, "Sign-out could not clear stored identity");
            self.ui.alert = Some(err.to_string());
        }
        self.ui.identity = None;
        self.set_status("Signed out", StatusTone::Info);
        self.navigate(Route::Login);
    }
}

fn classify_failure(err: AuthError) -> LoginFailure {
    match err {
        AuthError::MissingEmail | AuthError::InvalidEmail | AuthError::MissingPassword => {
            LoginFailure::Invalid(err.to_string())
        }
        AuthError::Remote(_)
        | AuthError::Unconfigured
        | AuthError::UnencodableEmail
        | AuthError::Store(_) => LoginFailure::Blocking(err.to_string()),
    }
}
