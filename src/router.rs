//! Path to view mapping, with an identity guard on everything but login.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Upload,
    Processing,
    Dashboard,
    BrdViewer,
    ConflictReport,
    Stakeholders,
    Traceability,
    Agents,
    Export,
}

impl Route {
    pub const ALL: [Route; 10] = [
        Route::Login,
        Route::Upload,
        Route::Processing,
        Route::Dashboard,
        Route::BrdViewer,
        Route::ConflictReport,
        Route::Stakeholders,
        Route::Traceability,
        Route::Agents,
        Route::Export,
    ];

    /// Path segment below the base path.
    pub fn segment(self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Upload => "upload",
            Route::Processing => "processing",
            Route::Dashboard => "dashboard",
            Route::BrdViewer => "brd-viewer",
            Route::ConflictReport => "conflict-report",
            Route::Stakeholders => "stakeholders",
            Route::Traceability => "traceability",
            Route::Agents => "agents",
            Route::Export => "export",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Upload => "Upload",
            Route::Processing => "Processing",
            Route::Dashboard => "Intelligence Center",
            Route::BrdViewer => "BRD Viewer",
            Route::ConflictReport => "Conflict Report",
            Route::Stakeholders => "Stakeholders",
            Route::Traceability => "Traceability Matrix",
            Route::Agents => "Agents",
            Route::Export => "Export",
        }
    }

    /// Rendered inside the navigation shell.
    pub fn in_shell(self) -> bool {
        self != Route::Login
    }

    pub fn requires_identity(self) -> bool {
        self.in_shell()
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|route| route.segment() == segment)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Outcome of resolving a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    /// Replace the current location with `Route`.
    Redirect(Route),
}

impl Resolution {
    pub fn route(self) -> Route {
        match self {
            Resolution::Render(route) | Resolution::Redirect(route) => route,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Router {
    base_path: String,
}

impl Router {
    /// `base_path` is normalized to start and end with `/`.
    pub fn new(base_path: &str) -> Self {
        let trimmed = base_path.trim().trim_matches('/');
        let base_path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn href(&self, route: Route) -> String {
        format!("{}{}", self.base_path, route.segment())
    }

    /// Map a path to a route without looking at identity.
    pub fn resolve(&self, path: &str) -> Resolution {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let bare_base = self.base_path.trim_end_matches('/');
        let relative = path
            .strip_prefix(self.base_path.as_str())
            .or_else(|| {
                path.strip_prefix(bare_base)
                    .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            })
            .unwrap_or(path);
        let segment = relative.trim_matches('/');
        if segment.is_empty() {
            return Resolution::Redirect(Route::Login);
        }
        match Route::from_segment(segment) {
            Some(route) => Resolution::Render(route),
            None => {
                tracing::debug!(path, "Unknown path; redirecting to login");
                Resolution::Redirect(Route::Login)
            }
        }
    }

    /// Apply the identity guard to a resolved route.
    pub fn guard(&self, route: Route, signed_in: bool) -> Resolution {
        if route.requires_identity() && !signed_in {
            tracing::debug!(?route, "No identity; redirecting to login");
            Resolution::Redirect(Route::Login)
        } else {
            Resolution::Render(route)
        }
    }

    /// Resolve then guard.
    pub fn navigate(&self, path: &str, signed_in: bool) -> Resolution {
        match self.resolve(path) {
            Resolution::Render(route) => self.guard(route, signed_in),
            redirect => redirect,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BASE_PATH)
    }
}
