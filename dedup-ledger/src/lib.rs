pub mod filter;

pub use filter::PostingFilter;

use jobdigest_core::{AppConfig, CoreError, LedgerError, Storage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Persistent set of previously-seen posting ids. A marker is an empty file
/// (or empty object) named after the posting id; markers are never deleted.
pub enum Ledger {
    Local { dir: PathBuf },
    Object {
        storage: Arc<Storage>,
        bucket: String,
        prefix: String,
    },
    /// `--ignore_job_id`: every posting counts as new, nothing is written.
    Bypass,
}

impl Ledger {
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Ledger::Local { dir: dir.into() }
    }

    pub fn object(storage: Arc<Storage>, bucket: String, prefix: String) -> Self {
        Ledger::Object {
            storage,
            bucket,
            prefix,
        }
    }

    pub fn bypass() -> Self {
        Ledger::Bypass
    }

    pub fn from_config(storage: Arc<Storage>, config: &AppConfig, ignore_seen: bool) -> Self {
        if ignore_seen {
            return Ledger::Bypass;
        }
        match &config.ledger_bucket {
            Some(bucket) if !bucket.is_empty() => Ledger::object(
                storage,
                bucket.clone(),
                config.ledger_dir.trim_matches('/').to_string(),
            ),
            _ => Ledger::local(config.ledger_dir.clone()),
        }
    }

    /// Returns true when the posting has not been seen before, creating its
    /// marker as a side effect.
    pub async fn check_and_mark(&self, posting_id: &str) -> Result<bool, CoreError> {
        match self {
            Ledger::Bypass => Ok(true),
            Ledger::Local { dir } => {
                let path = dir.join(posting_id);
                if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                    debug!("Posting {} already in ledger", posting_id);
                    return Ok(false);
                }
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    CoreError::Ledger(LedgerError::MarkerWriteFailed {
                        posting_id: posting_id.to_string(),
                        reason: e.to_string(),
                    })
                })?;
                tokio::fs::write(&path, b"").await.map_err(|e| {
                    CoreError::Ledger(LedgerError::MarkerWriteFailed {
                        posting_id: posting_id.to_string(),
                        reason: e.to_string(),
                    })
                })?;
                Ok(true)
            }
            Ledger::Object {
                storage,
                bucket,
                prefix,
            } => {
                let key = if prefix.is_empty() {
                    posting_id.to_string()
                } else {
                    format!("{}/{}", prefix, posting_id)
                };
                if storage.object_exists(bucket, &key).await? {
                    debug!("Posting {} already in ledger", posting_id);
                    return Ok(false);
                }
                storage.put_empty_object(bucket, &key).await?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_ledger_marks_and_suppresses() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::local(dir.path());

        assert!(ledger.check_and_mark("job-1").await.unwrap());
        // Second sighting is suppressed
        assert!(!ledger.check_and_mark("job-1").await.unwrap());
        // Other ids are unaffected
        assert!(ledger.check_and_mark("job-2").await.unwrap());

        assert!(dir.path().join("job-1").exists());
        assert!(dir.path().join("job-2").exists());
    }

    #[tokio::test]
    async fn test_local_ledger_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("seen").join("jobs");
        let ledger = Ledger::local(&nested);

        assert!(ledger.check_and_mark("job-1").await.unwrap());
        assert!(nested.join("job-1").exists());
    }

    #[tokio::test]
    async fn test_bypass_never_suppresses_and_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::bypass();

        assert!(ledger.check_and_mark("job-1").await.unwrap());
        assert!(ledger.check_and_mark("job-1").await.unwrap());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
