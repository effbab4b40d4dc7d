use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Role assigned to every signed-in user.
pub const DEFAULT_ROLE: &str = "Intelligence Lead";

const DEMO_UID_PREFIX: &str = "demo-";
const DEMO_UID_CHARS: usize = 8;

/// Who is signed in, as shown in the shell and persisted to `user.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: String,
    /// Set only for identities synthesized by the offline fallback.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub demo: bool,
}

impl SessionIdentity {
    /// Identity for an account the provider accepted.
    pub fn for_account(uid: impl Into<String>, email: &str) -> Self {
        Self {
            uid: uid.into(),
            name: display_name(email),
            email: email.to_string(),
            role: DEFAULT_ROLE.to_string(),
            demo: false,
        }
    }

    /// Offline identity keyed by [`demo_uid`].
    pub fn for_demo(email: &str) -> Result<Self, AuthError> {
        Ok(Self {
            demo: true,
            ..Self::for_account(demo_uid(email)?, email)
        })
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }
}

/// Upper-cased local part of the address.
pub fn display_name(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_uppercase()
}

/// Offline identifier derived only from the email address.
///
/// The address is encoded as Latin-1 then base64; the first eight characters
/// follow the `demo-` prefix. Addresses with characters beyond U+00FF have no
/// Latin-1 form and are rejected.
pub fn demo_uid(email: &str) -> Result<String, AuthError> {
    let bytes = email
        .chars()
        .map(|ch| u8::try_from(u32::from(ch)).map_err(|_| AuthError::UnencodableEmail))
        .collect::<Result<Vec<u8>, _>>()?;
    let encoded = STANDARD.encode(bytes);
    let prefix: String = encoded.chars().take(DEMO_UID_CHARS).collect();
    Ok(format!("{DEMO_UID_PREFIX}{prefix}"))
}
