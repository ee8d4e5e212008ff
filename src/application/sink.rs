use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;

use crate::{domain::AppError, utils::sanitize_filename};

/// Where a finished transfer ends up.
///
/// Implementations take ownership of the payload and must not keep it
/// around once `materialize` has returned.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn materialize(
        &self,
        bytes: Bytes,
        filename: &str,
        mime: Option<&str>,
    ) -> Result<PathBuf, AppError>;
}

/// Saves downloads into a fixed directory, like a browser's download folder.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn materialize(
        &self,
        bytes: Bytes,
        filename: &str,
        mime: Option<&str>,
    ) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Io(format!("Failed to create {}: {}", self.dir.display(), e)))?;

        let (file, path) = create_unique(&self.dir, filename).await?;
        tracing::debug!(
            "Writing {} bytes ({}) to {}",
            bytes.len(),
            mime.unwrap_or("unknown type"),
            path.display()
        );
        write_file(file, bytes).await?;
        Ok(path)
    }
}

/// Asks the user where to save, pre-filling the decoded filename.
#[derive(Debug, Clone, Default)]
pub struct SaveDialogSink;

#[async_trait]
impl DownloadSink for SaveDialogSink {
    async fn materialize(
        &self,
        bytes: Bytes,
        filename: &str,
        mime: Option<&str>,
    ) -> Result<PathBuf, AppError> {
        let path = rfd::AsyncFileDialog::new()
            .set_file_name(sanitize_filename(filename))
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
            .ok_or(AppError::Cancelled)?;

        tracing::debug!(
            "Writing {} bytes ({}) to {}",
            bytes.len(),
            mime.unwrap_or("unknown type"),
            path.display()
        );
        // The dialog already confirmed replacing an existing file.
        let file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to create file: {}", e)))?;
        write_file(file, bytes).await?;
        Ok(path)
    }
}

async fn write_file(mut file: tokio::fs::File, bytes: Bytes) -> Result<(), AppError> {
    file.write_all(&bytes)
        .await
        .map_err(|e| AppError::Io(format!("Write error: {}", e)))?;
    file.sync_all()
        .await
        .map_err(|e| AppError::Io(format!("Failed to sync file: {}", e)))?;
    Ok(())
}

const MAX_NUMBERED_NAMES: u32 = 10_000;

/// Create the first free file for `filename` in `dir`: `name.ext`,
/// `name (1).ext`, ... Existing files are never opened.
async fn create_unique(dir: &Path, filename: &str) -> Result<(tokio::fs::File, PathBuf), AppError> {
    for name in candidate_names(filename) {
        let path = dir.join(name);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(AppError::Io(format!(
                    "Failed to create {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }

    Err(AppError::Io(format!(
        "No free name for {} in {}",
        filename,
        dir.display()
    )))
}

fn candidate_names(filename: &str) -> impl Iterator<Item = String> {
    let sanitized = sanitize_filename(filename);
    let sanitized = sanitized.trim_matches('.');
    let name = if sanitized.is_empty() {
        crate::domain::DEFAULT_FILENAME.to_string()
    } else {
        sanitized.to_string()
    };

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), Some(ext.to_string())),
        _ => (name.clone(), None),
    };

    std::iter::once(name).chain((1..=MAX_NUMBERED_NAMES).map(move |n| match &ext {
        Some(ext) => format!("{} ({}).{}", stem, n, ext),
        None => format!("{} ({})", stem, n),
    }))
}
