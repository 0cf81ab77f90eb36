//! src/services/file_service.rs
//!
//! FileService: flat on-disk storage for poster images. Files live directly
//! under a caller-supplied directory and are addressed by their original
//! filename, so names are validated before they ever touch a path.

use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::debug;

const MAX_FILENAME_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("file `{0}` not found")]
    NotFound(String),
    #[error("file `{0}` already exists")]
    AlreadyExists(String),
    #[error("invalid file name `{0}`")]
    InvalidFileName(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type FileResult<T> = Result<T, FileError>;

/// Stateless file store. Every call names the directory it works in.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileService;

impl FileService {
    pub fn new() -> Self {
        Self
    }

    /// Reject names that could leave `dir` or that the filesystem would
    /// mangle: empty, overlong, separators, `..`, NUL and control bytes.
    pub fn ensure_filename_safe(&self, filename: &str) -> FileResult<()> {
        let invalid = filename.is_empty()
            || filename.len() > MAX_FILENAME_LEN
            || filename == "."
            || filename.contains("..")
            || filename
                .bytes()
                .any(|b| b == b'/' || b == b'\\' || b.is_ascii_control());
        if invalid {
            return Err(FileError::InvalidFileName(filename.to_string()));
        }
        Ok(())
    }

    fn file_path(&self, dir: &Path, filename: &str) -> FileResult<PathBuf> {
        self.ensure_filename_safe(filename)?;
        Ok(dir.join(filename))
    }

    /// Whether `dir/filename` currently exists.
    pub async fn exists(&self, dir: &Path, filename: &str) -> FileResult<bool> {
        let path = self.file_path(dir, filename)?;
        Ok(fs::try_exists(&path).await?)
    }

    /// Write `bytes` to `dir/filename` and return the stored filename.
    ///
    /// Creates `dir` if needed. Never overwrites: an existing file yields
    /// `AlreadyExists`. A partially written file is removed on error.
    pub async fn upload(&self, dir: &Path, filename: &str, bytes: &[u8]) -> FileResult<String> {
        let path = self.file_path(dir, filename)?;
        fs::create_dir_all(dir).await?;

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(FileError::AlreadyExists(filename.to_string()));
            }
            Err(err) => return Err(FileError::Io(err)),
        };

        if let Err(err) = write_all_synced(&mut file, bytes).await {
            let _ = fs::remove_file(&path).await;
            return Err(FileError::Io(err));
        }

        debug!("stored {} bytes at {}", bytes.len(), path.display());
        Ok(filename.to_string())
    }

    /// Open `dir/filename` for streaming. Returns the handle and its length.
    pub async fn open_for_read(&self, dir: &Path, filename: &str) -> FileResult<(File, u64)> {
        let path = self.file_path(dir, filename)?;
        let file = File::open(&path).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                FileError::NotFound(filename.to_string())
            } else {
                FileError::Io(err)
            }
        })?;
        let len = file.metadata().await?.len();
        Ok((file, len))
    }

    /// Remove `dir/filename`. A missing file is not an error; returns whether
    /// anything was removed.
    pub async fn delete_if_exists(&self, dir: &Path, filename: &str) -> FileResult<bool> {
        let path = self.file_path(dir, filename)?;
        match fs::remove_file(&path).await {
            Ok(_) => {
                debug!("removed file {}", path.display());
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("file {} already missing", path.display());
                Ok(false)
            }
            Err(err) => Err(FileError::Io(err)),
        }
    }
}

async fn write_all_synced(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}
