//! Process-wide state handed between views: the durable identity file and
//! the in-memory session slot for the current analysis result.

mod identity_store;
mod session;

pub use identity_store::{IDENTITY_FILE_NAME, IdentityStore, IdentityStoreError};
pub use session::{SessionStore, StoredAnalysis};
