use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::SettingsEvents;
use crate::util::{lock_for, write_atomic};

const PROJECT_STORAGE_DIR: &str = ".theorem-note";
const PROJECT_CONFIG_FILE: &str = "config.json";

/// 編輯器與預覽窗格的字型設定。 / Font configuration for the editor and preview panes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FontSettings {
    #[serde(default = "default_editor_font_family")]
    pub editor_font_family: String,
    #[serde(default = "default_font_size")]
    pub editor_font_size: u32,
    #[serde(default = "default_preview_font_family")]
    pub preview_font_family: String,
    #[serde(default = "default_font_size")]
    pub preview_font_size: u32,
}

fn default_editor_font_family() -> String {
    "Consolas, Monaco, 'Courier New', monospace".to_string()
}

fn default_preview_font_family() -> String {
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif"
        .to_string()
}

fn default_font_size() -> u32 {
    14
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            editor_font_family: default_editor_font_family(),
            editor_font_size: default_font_size(),
            preview_font_family: default_preview_font_family(),
            preview_font_size: default_font_size(),
        }
    }
}

/// 專案層級的設定紀錄；呼叫端應讀取-合併-儲存，避免覆寫未來新增的欄位。 / Per-project configuration record; callers load-merge-save so future fields survive partial updates.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub font_settings: FontSettings,
}

/// 專案設定存取時可能出現的錯誤。 / Errors raised by project configuration persistence.
#[derive(Debug, Error)]
pub enum ProjectConfigError {
    #[error("project root is empty")]
    InvalidRoot,
    #[error("project config IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize project config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 解析專案設定檔路徑；根目錄為空時回報錯誤。 / Resolves `<root>/.theorem-note/config.json`; empty roots are rejected.
pub fn project_config_path(root: &Path) -> Result<PathBuf, ProjectConfigError> {
    if root.as_os_str().is_empty() {
        return Err(ProjectConfigError::InvalidRoot);
    }
    Ok(root.join(PROJECT_STORAGE_DIR).join(PROJECT_CONFIG_FILE))
}

/// 載入專案設定；空根目錄、檔案不存在或毀損時一律回傳預設值（寬容策略）。 / Loads the project config; empty root, missing or corrupt files all yield defaults (tolerant policy).
pub fn load_project_config(root: &Path) -> ProjectConfig {
    let Ok(path) = project_config_path(root) else {
        return ProjectConfig::default();
    };
    match fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
        Err(_) => ProjectConfig::default(),
    }
}

/// 儲存專案設定；必要時建立 `.theorem-note` 目錄並以原子方式寫入。 / Saves the project config, creating the storage directory when missing and writing atomically.
pub fn save_project_config(root: &Path, config: &ProjectConfig) -> Result<(), ProjectConfigError> {
    let path = project_config_path(root)?;
    let payload = serde_json::to_vec_pretty(config)?;
    let lock = lock_for(&path);
    let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    write_atomic(&path, &payload).map_err(|source| ProjectConfigError::Io { path, source })
}

/// 讀取-合併-儲存字型子紀錄，成功後發出通知事件。 / Load-merge-saves the font sub-record only, then emits a fire-and-forget notification.
pub fn update_font_settings(
    root: &Path,
    settings: FontSettings,
    events: &dyn SettingsEvents,
) -> Result<(), ProjectConfigError> {
    let mut config = load_project_config(root);
    config.font_settings = settings.clone();
    save_project_config(root, &config)?;
    events.font_settings_updated(&settings);
    Ok(())
}
