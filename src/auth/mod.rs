//! Login: remote sign-in, the offline demo fallback, and identity persistence.

mod credential_store;
mod gate;
mod identity;
mod provider;

pub use credential_store::{CredentialStore, CredentialStoreError};
pub use gate::{AuthGate, LoginOrigin, LoginOutcome};
pub use identity::{DEFAULT_ROLE, SessionIdentity, demo_uid, display_name};
pub use provider::{
    IdentityProvider, PasswordIdentityProvider, RemoteAccount, UnconfiguredProvider,
    provider_from_config,
};

use crate::storage::IdentityStoreError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email address is required")]
    MissingEmail,
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Password is required")]
    MissingPassword,
    #[error("Remote sign-in failed: {0}")]
    Remote(String),
    #[error("Identity provider is not configured")]
    Unconfigured,
    #[error("Email contains characters that cannot be used for an offline identity")]
    UnencodableEmail,
    #[error("Failed to store identity: {0}")]
    Store(#[from] IdentityStoreError),
}

/// Email and password as typed into the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Both fields required; the email needs a local part and a domain.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.email.is_empty() {
            return Err(AuthError::MissingEmail);
        }
        match self.email.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !self.email.chars().any(char::is_whitespace) => {}
            _ => return Err(AuthError::InvalidEmail),
        }
        if self.password.is_empty() {
            return Err(AuthError::MissingPassword);
        }
        Ok(())
    }
}
