use std::path::PathBuf;

use thiserror::Error;

use theorem_note_settings::{GlobalConfigError, GlobalConfigStore};

use crate::error::FsError;
use crate::picker::{DirectoryPicker, PickerError};
use crate::tree::{read_tree, FileNode};

const OPEN_DIALOG_TITLE: &str = "Select Directory";

/// A freshly opened project: its root and the initial tree snapshot.
/// 新開啟的專案：根目錄與初始檔案樹快照。
#[derive(Debug)]
pub struct ProjectOpening {
    pub root: PathBuf,
    pub tree: Vec<FileNode>,
}

/// Errors raised while opening a new project.
/// 開啟新專案時可能出現的錯誤。
#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Picker(#[from] PickerError),
    #[error(transparent)]
    Scan(#[from] FsError),
    #[error(transparent)]
    Config(#[from] GlobalConfigError),
}

/// Asks the picker for a directory, scans it, and records it as the
/// last-opened path. The record is written exactly once per successful open
/// action; cancellation and scan failures leave the store untouched. Plain
/// refreshes of an already open project go through [`read_tree`] directly and
/// never update the store.
/// 透過選擇器取得目錄並掃描，成功後才記錄為最後開啟路徑；每次成功開啟僅
/// 寫入一次，取消或掃描失敗皆不更動儲存。重新整理既有專案請直接呼叫
/// [`read_tree`]，不會更新紀錄。
pub fn open_new_project(
    picker: &dyn DirectoryPicker,
    global_config: &GlobalConfigStore,
) -> Result<ProjectOpening, OpenError> {
    let root = picker.pick_directory(OPEN_DIALOG_TITLE)?;
    let tree = read_tree(&root)?;
    global_config.set_last_opened(root.to_string_lossy().into_owned())?;
    Ok(ProjectOpening { root, tree })
}
