//! File-tree, file-operation and per-project persistence primitives for Theorem Note.
//! 管理 Theorem Note 檔案樹、檔案操作與專案內持久化的核心模組。

mod util;

pub mod error;
pub mod fileops;
pub mod open;
pub mod picker;
pub mod session;
pub mod theorems;
pub mod tree;

pub use error::FsError;
pub use fileops::{create_directory, create_file, read_file, write_file};
pub use open::{open_new_project, OpenError, ProjectOpening};
pub use picker::{DirectoryPicker, PickerError};
pub use session::{load_session, save_session, session_file_path, SessionError};
pub use theorems::{
    extract_theorem_names, theorems_file_path, TheoremIndexError, TheoremIndexStore,
};
pub use tree::{read_tree, FileNode};
