//! Remote identity providers.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{AppConfig, HttpSettings, IdentitySettings};
use crate::http_client;

use super::{AuthError, Credentials};

const MAX_SIGN_IN_RESPONSE_BYTES: usize = 64 * 1024;

/// Account returned by a successful remote sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteAccount {
    pub uid: String,
    pub email: String,
    pub id_token: Option<String>,
}

/// Something that can verify an email/password pair.
pub trait IdentityProvider: Send + Sync {
    fn sign_in(&self, credentials: &Credentials) -> Result<RemoteAccount, AuthError>;
}

/// Provider used when no API key is configured; every attempt fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnconfiguredProvider;

impl IdentityProvider for UnconfiguredProvider {
    fn sign_in(&self, _credentials: &Credentials) -> Result<RemoteAccount, AuthError> {
        Err(AuthError::Unconfigured)
    }
}

/// Email/password sign-in against the identity toolkit REST API.
#[derive(Clone, Debug)]
pub struct PasswordIdentityProvider {
    endpoint: String,
    api_key: String,
    agent: ureq::Agent,
}

impl PasswordIdentityProvider {
    pub fn new(settings: &IdentitySettings, api_key: &str, http: &HttpSettings) -> Self {
        Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            agent: http_client::agent(http),
        }
    }

    fn sign_in_url(&self) -> Result<String, AuthError> {
        let mut url = Url::parse(&format!("{}/v1/accounts:signInWithPassword", self.endpoint))
            .map_err(|err| AuthError::Remote(format!("Invalid identity endpoint: {err}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url.into())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    id_token: Option<String>,
}

impl IdentityProvider for PasswordIdentityProvider {
    fn sign_in(&self, credentials: &Credentials) -> Result<RemoteAccount, AuthError> {
        let request = SignInRequest {
            email: &credentials.email,
            password: &credentials.password,
            return_secure_token: true,
        };
        let response = match self.agent.post(&self.sign_in_url()?).send_json(&request) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = http_client::read_response_text(response, MAX_SIGN_IN_RESPONSE_BYTES)
                    .unwrap_or_default();
                return Err(AuthError::Remote(provider_error_message(code, &body)));
            }
            Err(ureq::Error::Transport(err)) => return Err(AuthError::Remote(err.to_string())),
        };
        let body = http_client::read_response_text(response, MAX_SIGN_IN_RESPONSE_BYTES)
            .map_err(|err| AuthError::Remote(err.to_string()))?;
        let parsed: SignInResponse =
            serde_json::from_str(&body).map_err(|err| AuthError::Remote(err.to_string()))?;
        Ok(RemoteAccount {
            uid: parsed.local_id,
            email: parsed.email.unwrap_or_else(|| credentials.email.clone()),
            id_token: parsed.id_token,
        })
    }
}

/// Choose the provider the configuration allows.
pub fn provider_from_config(config: &AppConfig) -> Box<dyn IdentityProvider> {
    match config.identity.api_key.as_deref() {
        Some(key) => Box::new(PasswordIdentityProvider::new(
            &config.identity,
            key,
            &config.http,
        )),
        None => Box::new(UnconfiguredProvider),
    }
}

/// Provider errors arrive as `{"error": {"message": "INVALID_PASSWORD"}}`.
fn provider_error_message(code: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {code}"))
}
