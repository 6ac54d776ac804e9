use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Demo payload served by `/dummydata.json`, relative to the static directory.
pub const DEMO_FILE_NAME: &str = "dummydata.json";

/// Page credentials, as stored in `facebook_settings.json`
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct FacebookSettings {
    #[serde(default)]
    pub page_id: String,
    #[serde(default)]
    pub page_access_token: String,
}

impl fmt::Debug for FacebookSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacebookSettings")
            .field("page_id", &self.page_id)
            .field("page_access_token", &"<redacted>")
            .finish()
    }
}

impl FacebookSettings {
    /// Read the settings file; a missing file is `Ok(None)`.
    pub fn load(path: &Path) -> StorageResult<Option<Self>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StorageError::Json {
                path: path.display().to_string(),
                source,
            })
    }

    /// Write the settings file (pretty JSON)
    pub fn save(&self, path: &Path) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| StorageError::Json {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// On-disk report output and the canned demo payload.
///
/// Writes are not locked: concurrent cycles overwrite each other and the
/// last writer wins.
#[derive(Debug, Clone)]
pub struct ReportStore {
    output_path: PathBuf,
    demo_path: PathBuf,
}

impl ReportStore {
    /// Create a store writing to `output_path` and reading the demo payload
    /// from `static_dir`.
    pub fn new(output_path: impl Into<PathBuf>, static_dir: impl AsRef<Path>) -> Self {
        Self {
            output_path: output_path.into(),
            demo_path: static_dir.as_ref().join(DEMO_FILE_NAME),
        }
    }

    /// Report file location
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Serialize `report` as pretty JSON and replace the output file.
    pub async fn write_report<T: Serialize>(&self, report: &T) -> StorageResult<()> {
        let path = self.output_path.display().to_string();
        let json = serde_json::to_string_pretty(report).map_err(|source| StorageError::Json {
            path: path.clone(),
            source,
        })?;

        tokio::fs::write(&self.output_path, json)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;

        info!(path = %path, "Report written");
        Ok(())
    }

    /// Demo payload exactly as stored on disk, after checking it is JSON.
    pub async fn read_demo(&self) -> StorageResult<String> {
        let path = self.demo_path.display().to_string();
        let contents = match tokio::fs::read_to_string(&self.demo_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound { path })
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        serde_json::from_str::<serde::de::IgnoredAny>(&contents)
            .map_err(|source| StorageError::Json {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path, bytes = contents.len(), "Demo payload read");
        Ok(contents)
    }
}
