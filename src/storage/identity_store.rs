use std::path::{Path, PathBuf};

use crate::app_dirs;
use crate::auth::SessionIdentity;

/// File holding the signed-in identity.
pub const IDENTITY_FILE_NAME: &str = "user.json";

#[derive(Debug, thiserror::Error)]
pub enum IdentityStoreError {
    #[error("App dir error: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid identity file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to encode identity: {0}")]
    Encode(serde_json::Error),
}

/// Durable store for the last signed-in identity.
///
/// Each login overwrites the file; there is no expiry.
#[derive(Clone, Debug)]
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    /// Store inside the application directory.
    pub fn open_default() -> Result<Self, IdentityStoreError> {
        Ok(Self::at(app_dirs::app_root_dir()?.join(IDENTITY_FILE_NAME)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<SessionIdentity>, IdentityStoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(IdentityStoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| IdentityStoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    pub fn save(&self, identity: &SessionIdentity) -> Result<(), IdentityStoreError> {
        let bytes = serde_json::to_vec_pretty(identity).map_err(IdentityStoreError::Encode)?;
        let write_err = |source| IdentityStoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, bytes).map_err(write_err)?;
        std::fs::rename(&staging, &self.path).map_err(write_err)
    }

    pub fn clear(&self) -> Result<(), IdentityStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(IdentityStoreError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
