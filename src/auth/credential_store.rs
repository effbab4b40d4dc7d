//! Keeps the identity provider's ID token between launches.
//!
//! The OS keyring is preferred. When it is unavailable (or disabled with
//! `BRDGEN_DISABLE_KEYRING=1`) the token is sealed with ChaCha20-Poly1305 in
//! the app's `secrets` directory, next to a per-install random key.

use std::path::{Path, PathBuf};

use crate::app_dirs;

const KEYRING_SERVICE: &str = "brdgen";
const KEYRING_ACCOUNT: &str = "brdgen_identity_token";
const DISABLE_KEYRING_ENV: &str = "BRDGEN_DISABLE_KEYRING";
const SEALED_TOKEN_FILE: &str = "identity_token.bin";
const SEALING_KEY_FILE: &str = "identity_token.key";
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Crypto error: {0}")]
    Crypto(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("App dir error: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
}

#[derive(Clone, Debug)]
pub struct CredentialStore {
    sealed: SealedFile,
    use_keyring: bool,
}

impl CredentialStore {
    /// Store rooted in the app's `secrets` directory.
    pub fn open_default() -> Result<Self, CredentialStoreError> {
        Ok(Self {
            sealed: SealedFile::new(app_dirs::secrets_dir()?),
            use_keyring: !keyring_disabled(),
        })
    }

    /// File-only store in `dir`; never touches the OS keyring.
    pub fn file_only(dir: impl Into<PathBuf>) -> Self {
        Self {
            sealed: SealedFile::new(dir.into()),
            use_keyring: false,
        }
    }

    pub fn get(&self) -> Result<Option<String>, CredentialStoreError> {
        if self.use_keyring {
            if let Some(token) = keyring_get() {
                return Ok(Some(token));
            }
        }
        self.sealed.read()
    }

    pub fn set(&self, token: &str) -> Result<(), CredentialStoreError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(());
        }
        if self.use_keyring && keyring_set(token).is_ok() {
            self.sealed.remove();
            return Ok(());
        }
        self.sealed.write(token)
    }

    pub fn delete(&self) {
        if self.use_keyring {
            keyring_delete();
        }
        self.sealed.remove();
    }
}

fn keyring_disabled() -> bool {
    std::env::var(DISABLE_KEYRING_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn keyring_entry() -> Result<keyring::Entry, CredentialStoreError> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)
        .map_err(|err| CredentialStoreError::Unavailable(err.to_string()))
}

fn keyring_get() -> Option<String> {
    keyring_entry().ok()?.get_password().ok()
}

fn keyring_set(token: &str) -> Result<(), CredentialStoreError> {
    keyring_entry()?
        .set_password(token)
        .map_err(|err| CredentialStoreError::Unavailable(err.to_string()))
}

fn keyring_delete() {
    if let Ok(entry) = keyring_entry() {
        let _ = entry.delete_credential();
    }
}

/// Token sealed on disk as `nonce || ciphertext`.
#[derive(Clone, Debug)]
struct SealedFile {
    dir: PathBuf,
}

impl SealedFile {
    fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(SEALED_TOKEN_FILE)
    }

    fn key_path(&self) -> PathBuf {
        self.dir.join(SEALING_KEY_FILE)
    }

    fn read(&self) -> Result<Option<String>, CredentialStoreError> {
        let token_path = self.token_path();
        if !token_path.exists() {
            return Ok(None);
        }
        let data = std::fs::read(token_path)?;
        if data.len() < NONCE_LEN {
            return Err(CredentialStoreError::Decode("token file too short".into()));
        }
        let (nonce, ciphertext) = data.split_at(NONCE_LEN);
        let key = std::fs::read(self.key_path())?;
        let plaintext = crypt(&key, nonce, ciphertext, Direction::Open)?;
        String::from_utf8(plaintext)
            .map(Some)
            .map_err(|err| CredentialStoreError::Decode(err.to_string()))
    }

    fn write(&self, token: &str) -> Result<(), CredentialStoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let key_path = self.key_path();
        let key = if key_path.exists() {
            std::fs::read(&key_path)?
        } else {
            let key = random_bytes(KEY_LEN)?;
            write_private_file(&key_path, &key)?;
            key
        };
        let nonce = random_bytes(NONCE_LEN)?;
        let mut payload = nonce.clone();
        payload.extend(crypt(&key, &nonce, token.as_bytes(), Direction::Seal)?);
        write_private_file(&self.token_path(), &payload)
    }

    fn remove(&self) {
        let _ = std::fs::remove_file(self.token_path());
        let _ = std::fs::remove_file(self.key_path());
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Seal,
    Open,
}

fn crypt(
    key: &[u8],
    nonce: &[u8],
    input: &[u8],
    direction: Direction,
) -> Result<Vec<u8>, CredentialStoreError> {
    use chacha20poly1305::aead::{Aead, KeyInit};
    if key.len() != KEY_LEN {
        return Err(CredentialStoreError::Decode("sealing key invalid".into()));
    }
    let cipher = chacha20poly1305::ChaCha20Poly1305::new_from_slice(key)
        .map_err(|err| CredentialStoreError::Crypto(err.to_string()))?;
    let nonce = chacha20poly1305::Nonce::from_slice(nonce);
    let output = match direction {
        Direction::Seal => cipher.encrypt(nonce, input),
        Direction::Open => cipher.decrypt(nonce, input),
    };
    output.map_err(|err| CredentialStoreError::Crypto(err.to_string()))
}

fn random_bytes(len: usize) -> Result<Vec<u8>, CredentialStoreError> {
    use rand::TryRngCore;
    let mut out = vec![0u8; len];
    rand::rngs::OsRng
        .try_fill_bytes(&mut out)
        .map_err(|err| CredentialStoreError::Unavailable(err.to_string()))?;
    Ok(out)
}

fn write_private_file(path: &Path, bytes: &[u8]) -> Result<(), CredentialStoreError> {
    std::fs::write(path, bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    Ok(())
}
