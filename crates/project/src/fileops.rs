use std::fs;
use std::path::Path;

use crate::error::FsError;
use crate::theorems::TheoremIndexStore;

/// Reads the full text content of a file.
/// 讀取檔案的完整文字內容。
pub fn read_file(path: &Path) -> Result<String, FsError> {
    fs::read_to_string(path).map_err(|err| FsError::from_io(path, err))
}

/// Writes `content` to `path`, then refreshes the project's theorem index.
/// Passing no project root (or an empty one) skips index maintenance as an
/// error-free no-op. An index failure surfaces to the caller, but the content
/// write is not rolled back: the two stages are a known non-atomic boundary.
/// 寫入檔案內容後更新專案的定理索引；未提供專案根目錄（或為空）時跳過索引
/// 且不報錯。索引失敗會回報給呼叫端，但內容寫入不會回滾，兩階段為已知的
/// 非原子邊界。
pub fn write_file(path: &Path, content: &str, project_root: Option<&Path>) -> Result<(), FsError> {
    fs::write(path, content).map_err(|err| FsError::from_io(path, err))?;

    let Some(root) = project_root.filter(|root| !root.as_os_str().is_empty()) else {
        return Ok(());
    };
    let index = TheoremIndexStore::new(root)?;
    index.record_file(path, content)?;
    Ok(())
}

/// Creates an empty file; an occupied path fails with `AlreadyExists` and the
/// existing entry is left untouched.
/// 建立空白檔案；路徑已被占用時回傳 `AlreadyExists`，既有內容不受影響。
pub fn create_file(path: &Path) -> Result<(), FsError> {
    // Exists-then-create carries an inherent TOCTOU window, accepted for a
    // single-user desktop tool.
    if path.exists() {
        return Err(FsError::AlreadyExists(path.to_path_buf()));
    }
    fs::write(path, "").map_err(|err| FsError::from_io(path, err))
}

/// Creates a directory with the same exists-then-create contract as
/// [`create_file`].
/// 以與 [`create_file`] 相同的存在檢查建立目錄。
pub fn create_directory(path: &Path) -> Result<(), FsError> {
    if path.exists() {
        return Err(FsError::AlreadyExists(path.to_path_buf()));
    }
    fs::create_dir(path).map_err(|err| FsError::from_io(path, err))
}
