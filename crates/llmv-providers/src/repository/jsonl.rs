//! JSON lines result repository
//!
//! Each saved result is appended as one line. Lookups replay the file and
//! keep the most recently completed record per (provider, model); lines
//! that fail to parse are skipped with a warning so that one torn write
//! does not hide the rest of the history.

use super::{is_requested, recorded_at};
use async_trait::async_trait;
use llmv_domain::error::{Error, Result};
use llmv_domain::ports::VerificationResultRepository;
use llmv_domain::{ModelRef, VerificationResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

/// Append-only JSON lines repository
#[derive(Debug)]
pub struct JsonlVerificationRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlVerificationRepository {
    /// Repository backed by `path`; the file is created on first save
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl VerificationResultRepository for JsonlVerificationRepository {
    async fn save(&self, result: &VerificationResult) -> Result<()> {
        let mut line = serde_json::to_string(result)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::repository_with_source(format!("cannot create {}", parent.display()), e)
            })?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                Error::repository_with_source(format!("cannot open {}", self.path.display()), e)
            })?;
        file.write_all(line.as_bytes()).await.map_err(|e| {
            Error::repository_with_source(format!("cannot append to {}", self.path.display()), e)
        })?;
        file.flush().await?;
        Ok(())
    }

    async fn latest(&self, model_ids: &[String]) -> Result<Vec<VerificationResult>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::repository_with_source(
                    format!("cannot read {}", self.path.display()),
                    e,
                ));
            }
        };

        let mut latest: BTreeMap<ModelRef, VerificationResult> = BTreeMap::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let result: VerificationResult = match serde_json::from_str(line) {
                Ok(result) => result,
                Err(e) => {
                    warn!(line = index + 1, error = %e, "Skipping unreadable verification record");
                    continue;
                }
            };
            if !is_requested(&result, model_ids) {
                continue;
            }
            match latest.get(&result.target) {
                Some(stored) if recorded_at(stored) > recorded_at(&result) => {}
                _ => {
                    latest.insert(result.target.clone(), result);
                }
            }
        }
        Ok(latest.into_values().collect())
    }
}
