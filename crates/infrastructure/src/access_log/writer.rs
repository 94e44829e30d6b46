use hoopoe_domain::{AccessLogEntry, DomainError};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const MAX_BATCH_SIZE: usize = 100;

/// Appends access-log entries to a file as JSON lines.
pub struct AccessLogWriter {
    path: PathBuf,
    file: File,
}

impl AccessLogWriter {
    /// Opens `path` for appending, creating it and its directory if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::IoError(format!("{}: {}", parent.display(), e)))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| DomainError::IoError(format!("{}: {}", path.display(), e)))?;

        Ok(Self { path, file })
    }

    /// Drains `rx` in batches until every emitter is dropped.
    pub fn start(
        mut self,
        mut rx: mpsc::UnboundedReceiver<AccessLogEntry>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            debug!(path = %self.path.display(), "Access log writer started");

            let mut batch = Vec::with_capacity(MAX_BATCH_SIZE);
            let mut total_entries = 0u64;

            while let Some(entry) = rx.recv().await {
                batch.push(entry);

                while batch.len() < MAX_BATCH_SIZE {
                    match rx.try_recv() {
                        Ok(entry) => batch.push(entry),
                        Err(_) => break,
                    }
                }

                total_entries += batch.len() as u64;
                if let Err(e) = self.write_batch(&batch).await {
                    warn!(
                        error = %e,
                        dropped = batch.len(),
                        "Failed to write access log batch (non-critical)"
                    );
                }
                batch.clear();
            }

            debug!(total_entries, "Access log writer shutting down");
        })
    }

    async fn write_batch(&mut self, entries: &[AccessLogEntry]) -> Result<(), DomainError> {
        let mut buf = Vec::with_capacity(entries.len() * 192);
        for entry in entries {
            serde_json::to_writer(&mut buf, entry)
                .map_err(|e| DomainError::IoError(format!("serialize access log entry: {}", e)))?;
            buf.push(b'\n');
        }

        self.file
            .write_all(&buf)
            .await
            .map_err(|e| DomainError::IoError(format!("{}: {}", self.path.display(), e)))?;
        self.file
            .flush()
            .await
            .map_err(|e| DomainError::IoError(format!("{}: {}", self.path.display(), e)))
    }
}
