//! File-backed repository storing one JSON record per line.
//!
//! ```text
//! {"signal_id":1,"peak_hours":["08:00-09:00","17:00-18:30"]}
//! {"signal_id":2,"peak_hours":[]}
//! ```
//!
//! Writes go to a sibling temporary file which is then renamed over the
//! target, so a reader sees either the previous content or the new content.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::db::repository::*;
use crate::models::PeakWindowEntry;

/// JSON-lines peak window store.
#[derive(Debug, Clone)]
pub struct FileRepository {
    path: PathBuf,
}

impl FileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn context(&self, operation: &str) -> ErrorContext {
        ErrorContext::new(operation).with_resource(self.path.display().to_string())
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

/// Decode JSON-lines content. Blank lines are ignored.
pub fn decode_records(content: &str) -> RepositoryResult<Vec<PeakWindowEntry>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<PeakWindowEntry>(line).map_err(|e| {
                RepositoryError::validation_with_context(
                    format!("Invalid peak window record: {}", e),
                    ErrorContext::default().with_record(idx + 1),
                )
            })
        })
        .collect()
}

/// Encode records as JSON lines, one per record, newline-terminated.
pub fn encode_records(records: &[PeakWindowEntry]) -> RepositoryResult<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

fn with_resource(err: RepositoryError, ctx: ErrorContext) -> RepositoryError {
    let record = err.context().record;
    let mut ctx = ctx;
    ctx.record = record;
    match err {
        RepositoryError::ConnectionError { message, .. } => {
            RepositoryError::connection_with_context(message, ctx)
        }
        RepositoryError::QueryError { message, context } => {
            ctx.retryable = context.retryable;
            RepositoryError::query_with_context(message, ctx)
        }
        RepositoryError::ValidationError { message, .. } => {
            RepositoryError::validation_with_context(message, ctx)
        }
        RepositoryError::ConfigurationError { message, .. } => {
            RepositoryError::ConfigurationError { message, context: ctx }
        }
        RepositoryError::InternalError { message, .. } => {
            RepositoryError::InternalError { message, context: ctx }
        }
    }
}

#[async_trait]
impl PeakWindowRepository for FileRepository {
    async fn load_all(&self) -> RepositoryResult<Vec<PeakWindowEntry>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No peak window file at {}, starting empty",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(with_resource(e.into(), self.context("load_all"))),
        };

        decode_records(&content).map_err(|e| with_resource(e, self.context("load_all")))
    }

    async fn replace_all(&self, records: &[PeakWindowEntry]) -> RepositoryResult<()> {
        let ctx = || self.context("replace_all");
        let body = encode_records(records).map_err(|e| with_resource(e, ctx()))?;
        let tmp = self.temp_path();

        let write = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(body.as_bytes()).await?;
            file.sync_all().await?;
            tokio::fs::rename(&tmp, &self.path).await
        };

        if let Err(e) = write.await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(with_resource(e.into(), ctx()));
        }

        log::debug!(
            "Wrote {} peak window records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        match tokio::fs::metadata(self.parent_dir()).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(with_resource(e.into(), self.context("health_check"))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
