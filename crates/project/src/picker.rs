use std::path::PathBuf;

use thiserror::Error;

/// Failure modes of the directory chooser. Cancellation is its own variant so
/// callers can tell a dismissed dialog from a real failure.
/// 目錄選擇可能的失敗情況；取消為獨立的變體，讓呼叫端能與真正的錯誤區分。
#[derive(Debug, Error)]
pub enum PickerError {
    #[error("directory selection was cancelled")]
    Cancelled,
    #[error("directory picker failed: {0}")]
    Failed(String),
}

/// Seam for the platform directory-chooser dialog, implemented by the shell.
/// 平台目錄選擇對話框的接縫介面，由外層應用實作。
pub trait DirectoryPicker {
    /// Presents a chooser titled `title` and returns the selected absolute
    /// directory path.
    /// 顯示指定標題的選擇對話框並回傳選取的絕對目錄路徑。
    fn pick_directory(&self, title: &str) -> Result<PathBuf, PickerError>;
}
