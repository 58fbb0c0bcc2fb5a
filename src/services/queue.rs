//! File based queue: one pretty-printed JSON document per entry

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::errors::{Result, SiteGlueError};

/// 同一微秒内的重名尝试次数上限
const MAX_NAME_ATTEMPTS: u32 = 100;

pub struct PostQueue {
    dir: PathBuf,
}

impl PostQueue {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<unix seconds>.<microseconds>.json`
    pub fn file_name(at: DateTime<Utc>) -> String {
        format!("{}.{:06}.json", at.timestamp(), at.timestamp_subsec_micros())
    }

    /// `<unix seconds>.<microseconds>-<n>.json` for the n-th clash
    fn numbered_name(at: DateTime<Utc>, attempt: u32) -> String {
        if attempt == 0 {
            return Self::file_name(at);
        }
        format!(
            "{}.{:06}-{}.json",
            at.timestamp(),
            at.timestamp_subsec_micros(),
            attempt
        )
    }

    /// Write `entry` into the queue directory, creating it when needed
    ///
    /// Existing entries are never overwritten; a name clash gets a numeric
    /// suffix.
    pub async fn push<T: Serialize>(&self, entry: &T) -> Result<PathBuf> {
        self.push_at(entry, Utc::now()).await
    }

    async fn push_at<T: Serialize>(&self, entry: &T, at: DateTime<Utc>) -> Result<PathBuf> {
        let content = serde_json::to_string_pretty(entry)?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            error!("Failed to create queue dir {}: {}", self.dir.display(), e);
            SiteGlueError::file_operation(format!(
                "cannot create queue directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(Self::numbered_name(at, attempt));
            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            let mut file = match opened {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    debug!("Queue entry {} exists, trying next name", path.display());
                    continue;
                }
                Err(e) => {
                    error!("Failed to create queue entry {}: {}", path.display(), e);
                    return Err(SiteGlueError::file_operation(format!(
                        "cannot write {}: {}",
                        path.display(),
                        e
                    )));
                }
            };

            let written = async {
                file.write_all(content.as_bytes()).await?;
                file.flush().await
            }
            .await;
            written.map_err(|e| {
                error!("Failed to write queue entry {}: {}", path.display(), e);
                SiteGlueError::file_operation(format!("cannot write {}: {}", path.display(), e))
            })?;

            debug!("Queued {}", path.display());
            return Ok(path);
        }

        Err(SiteGlueError::file_operation(format!(
            "no free queue file name in {} for {}",
            self.dir.display(),
            Self::file_name(at)
        )))
    }
}
