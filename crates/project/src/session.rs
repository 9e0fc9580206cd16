use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::theorems::PROJECT_STORAGE_DIR;
use crate::util::{lock_for, write_atomic};

const SESSION_FILE: &str = "session.json";

/// Errors raised by session persistence.
/// 工作階段持久化時可能出現的錯誤。
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("project root is empty")]
    InvalidRoot,
    #[error("session IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session file at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize session: {0}")]
    Serialize(serde_json::Error),
}

/// Resolves `<root>/.theorem-note/session.json`; empty roots are rejected.
/// 解析工作階段檔案路徑；根目錄為空時回報錯誤。
pub fn session_file_path(root: &Path) -> Result<PathBuf, SessionError> {
    if root.as_os_str().is_empty() {
        return Err(SessionError::InvalidRoot);
    }
    Ok(root.join(PROJECT_STORAGE_DIR).join(SESSION_FILE))
}

/// Persists the ordered list of open file paths for a project, replacing any
/// previous session wholesale. Caller order is preserved verbatim: no
/// deduplication, no sorting.
/// 儲存專案中已開啟檔案的有序清單，整份覆寫先前的工作階段；完全保留呼叫端
/// 順序，不去重也不排序。
pub fn save_session(root: &Path, paths: &[PathBuf]) -> Result<(), SessionError> {
    let path = session_file_path(root)?;
    let payload = serde_json::to_vec(paths).map_err(SessionError::Serialize)?;
    let lock = lock_for(&path);
    let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    write_atomic(&path, &payload).map_err(|source| SessionError::Io { path, source })
}

/// Loads the previously saved session. An empty root or an absent file yields
/// an empty list without error; a file of the wrong shape surfaces a
/// corruption error (strict policy).
/// 載入先前儲存的工作階段；根目錄為空或檔案不存在時回傳空清單，格式錯誤
/// 則回報毀損錯誤（嚴格策略）。
pub fn load_session(root: &Path) -> Result<Vec<PathBuf>, SessionError> {
    if root.as_os_str().is_empty() {
        return Ok(Vec::new());
    }
    let path = session_file_path(root)?;
    match fs::read_to_string(&path) {
        Ok(contents) => {
            serde_json::from_str(&contents).map_err(|source| SessionError::Corrupt { path, source })
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(SessionError::Io { path, source }),
    }
}
