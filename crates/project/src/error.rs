use std::io;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

use crate::theorems::TheoremIndexError;

/// Errors surfaced by filesystem-facing operations (tree scans and file
/// mutations).
/// 檔案樹掃描與檔案操作對外回報的錯誤。
#[derive(Debug, Error)]
pub enum FsError {
    #[error("path not found: {0}")]
    NotFound(PathBuf),
    #[error("path already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("filesystem error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Index(#[from] TheoremIndexError),
}

impl FsError {
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            ErrorKind::NotFound => Self::NotFound(path),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}
