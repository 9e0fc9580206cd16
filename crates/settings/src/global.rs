use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::write_atomic;

const GLOBAL_CONFIG_DIR: &str = "theorem-note";
const GLOBAL_CONFIG_FILE: &str = "global_config.json";

/// 應用程式層級的全域設定紀錄。 / Application-wide global configuration record.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    #[serde(default)]
    pub last_opened_path: String,
}

/// 全域設定存取時可能出現的錯誤。 / Errors raised by the global configuration store.
#[derive(Debug, Error)]
pub enum GlobalConfigError {
    #[error("no user configuration directory is available")]
    NoConfigDir,
    #[error("global config IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize global config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 管理整個行程的全域設定（最後開啟的專案路徑）；啟動時建立一次並以參考傳遞。 / Owns the process-wide global configuration (last-opened project path); construct once at startup and hand out by reference.
#[derive(Debug)]
pub struct GlobalConfigStore {
    path: PathBuf,
    state: Mutex<GlobalConfig>,
}

impl GlobalConfigStore {
    /// 於作業系統的使用者設定目錄開啟全域設定。 / Opens the store at the fixed OS user-config location.
    pub fn open_default() -> Result<Self, GlobalConfigError> {
        let base = dirs::config_dir().ok_or(GlobalConfigError::NoConfigDir)?;
        Self::open(base.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE))
    }

    /// 開啟指定路徑的全域設定；首次啟動時建立目錄並寫出預設值。 / Opens the store at an explicit path, writing out defaults on first run.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, GlobalConfigError> {
        let path = path.into();
        let config = match fs::read_to_string(&path) {
            // Unparsable payloads reset to defaults without error; losing a
            // cosmetic preference is low-cost (tolerant policy).
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let config = GlobalConfig::default();
                persist(&path, &config)?;
                config
            }
            Err(source) => return Err(GlobalConfigError::Io { path, source }),
        };
        Ok(Self {
            path,
            state: Mutex::new(config),
        })
    }

    /// 取得此儲存器使用的檔案路徑。 / Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 回傳最後開啟的路徑；從未設定時為空字串。 / Returns the last-opened path, empty when never set.
    pub fn last_opened(&self) -> String {
        self.lock_state().last_opened_path.clone()
    }

    /// 設定最後開啟的路徑並立即寫回（不做批次）。 / Records the last-opened path and persists write-through, no batching.
    pub fn set_last_opened(&self, path: impl Into<String>) -> Result<(), GlobalConfigError> {
        let mut state = self.lock_state();
        state.last_opened_path = path.into();
        persist(&self.path, &state)
    }

    fn lock_state(&self) -> MutexGuard<'_, GlobalConfig> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn persist(path: &Path, config: &GlobalConfig) -> Result<(), GlobalConfigError> {
    let payload = serde_json::to_vec_pretty(config)?;
    write_atomic(path, &payload).map_err(|source| GlobalConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
