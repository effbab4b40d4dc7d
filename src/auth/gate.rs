use std::sync::Arc;

use super::credential_store::CredentialStore;
use super::identity::SessionIdentity;
use super::provider::IdentityProvider;
use super::{AuthError, Credentials};
use crate::storage::IdentityStore;

/// How the identity of a successful login was established.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginOrigin {
    /// The identity provider accepted the credentials.
    Remote,
    /// Remote sign-in failed and offline demo mode synthesized an identity.
    Demo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginOutcome {
    pub identity: SessionIdentity,
    pub origin: LoginOrigin,
}

/// Login flow: remote sign-in, optional demo fallback, durable persistence.
pub struct AuthGate {
    provider: Arc<dyn IdentityProvider>,
    identities: IdentityStore,
    credentials: Option<CredentialStore>,
    demo_mode: bool,
}

impl AuthGate {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        identities: IdentityStore,
        demo_mode: bool,
    ) -> Self {
        Self {
            provider,
            identities,
            credentials: None,
            demo_mode,
        }
    }

    /// Keep remote ID tokens in `store`.
    pub fn with_credential_store(mut self, store: CredentialStore) -> Self {
        self.credentials = Some(store);
        self
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    pub fn identities(&self) -> &IdentityStore {
        &self.identities
    }

    /// Sign in and persist the resulting identity.
    ///
    /// With demo mode on, a failed remote sign-in is replaced by an identity
    /// derived from the email; the failure is logged, not returned. Errors
    /// that remain (bad input, unencodable email, storage) stop the login.
    pub fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, AuthError> {
        credentials.validate()?;
        let (identity, origin, id_token) = match self.provider.sign_in(credentials) {
            Ok(account) => (
                SessionIdentity::for_account(account.uid, &account.email),
                LoginOrigin::Remote,
                account.id_token,
            ),
            Err(err) if self.demo_mode => {
                tracing::warn!(
                    error = %err,
                    email = %credentials.email,
                    "Remote sign-in failed; continuing in offline demo mode"
                );
                let identity = SessionIdentity::for_demo(&credentials.email)?;
                (identity, LoginOrigin::Demo, None)
            }
            Err(err) => {
                tracing::info!(error = %err, "Remote sign-in rejected");
                return Err(err);
            }
        };

        self.identities.save(&identity)?;
        if let Some(store) = &self.credentials {
            let stored = match id_token.as_deref() {
                Some(token) => store.set(token),
                None => {
                    store.delete();
                    Ok(())
                }
            };
            if let Err(err) = stored {
                tracing::warn!(error = %err, "Could not keep identity token");
            }
        }
        tracing::info!(uid = %identity.uid, ?origin, "Signed in");
        Ok(LoginOutcome { identity, origin })
    }

    /// Forget the stored identity and any kept token.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.identities.clear()?;
        if let Some(store) = &self.credentials {
            store.delete();
        }
        tracing::info!("Signed out");
        Ok(())
    }

    pub fn current_identity(&self) -> Option<SessionIdentity> {
        match self.identities.load() {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(error = %err, "Stored identity unreadable");
                None
            }
        }
    }
}
