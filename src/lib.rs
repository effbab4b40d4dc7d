//! BRDGen desktop client.
//!
//! Signs users in, uploads their documents to the analysis backend, presents
//! the processing pipeline and projects the result into the Intelligence
//! Center views.

/// Backend client and wire types.
pub mod api;
/// Application directory resolution.
pub mod app_dirs;
/// Sign-in, demo identities and credential storage.
pub mod auth;
/// Client configuration.
pub mod config;
/// Dashboard projections.
pub mod dashboard;
/// egui front end.
pub mod egui_app;
pub(crate) mod http_client;
/// Tracing setup.
pub mod logging;
/// Processing pipeline sequencer.
pub mod pipeline;
/// Path routing.
pub mod router;
/// Identity and session storage.
pub mod storage;
