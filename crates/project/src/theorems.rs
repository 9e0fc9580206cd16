use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::util::{lock_for, write_atomic};

pub(crate) const PROJECT_STORAGE_DIR: &str = ".theorem-note";
const THEOREMS_FILE: &str = "theorems.json";

static THEOREM_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<theorem name="([^"]+)">"#).expect("valid theorem tag pattern"));

/// Extracts every theorem name declared in `content`, in document order.
/// A declaration is the opening tag `<theorem name="...">`; the name is any
/// run of non-quote characters, matched case-sensitively.
/// 依文件順序取出內容中宣告的所有定理名稱；宣告即 `<theorem name="...">`
/// 開頭標籤，名稱為任意非引號字元序列，區分大小寫。
pub fn extract_theorem_names(content: &str) -> Vec<String> {
    THEOREM_TAG
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Errors raised by theorem index maintenance.
/// 定理索引維護時可能出現的錯誤。
#[derive(Debug, Error)]
pub enum TheoremIndexError {
    #[error("project root is empty")]
    InvalidRoot,
    #[error("theorem index IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("theorem index at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize theorem index: {0}")]
    Serialize(serde_json::Error),
}

/// Resolves `<root>/.theorem-note/theorems.json`; empty roots are rejected.
/// 解析定理索引檔路徑；根目錄為空時回報錯誤。
pub fn theorems_file_path(root: &Path) -> Result<PathBuf, TheoremIndexError> {
    if root.as_os_str().is_empty() {
        return Err(TheoremIndexError::InvalidRoot);
    }
    Ok(root.join(PROJECT_STORAGE_DIR).join(THEOREMS_FILE))
}

/// Maintains the project-wide theorem-name → declaring-file index. The
/// mapping is never kept in memory between calls: every update loads, mutates
/// and persists the whole file under that file's lock.
/// 維護整個專案的定理名稱對應宣告檔案的索引；索引不在記憶體中跨呼叫保留，
/// 每次更新都在檔案鎖下完整載入、修改並寫回。
#[derive(Debug)]
pub struct TheoremIndexStore {
    path: PathBuf,
}

impl TheoremIndexStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, TheoremIndexError> {
        Ok(Self {
            path: theorems_file_path(root.as_ref())?,
        })
    }

    /// Returns the backing file path.
    /// 取得索引檔路徑。
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted index; an absent or empty file yields an empty map,
    /// an unparsable one surfaces a corruption error (strict policy, unlike
    /// the tolerant configuration loaders).
    /// 載入索引；檔案不存在或為空時回傳空映射，無法解析則回報毀損錯誤
    /// （嚴格策略，與寬容的設定載入器不同）。
    pub fn load(&self) -> Result<BTreeMap<String, PathBuf>, TheoremIndexError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| TheoremIndexError::Corrupt {
                    path: self.path.clone(),
                    source,
                })
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(TheoremIndexError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Re-derives the index entries for one file after its content was
    /// written: stale entries pointing at the file are evicted, then each
    /// extracted name maps to the file, later occurrences winning. Content
    /// without a single declaration performs no disk I/O at all.
    /// 檔案寫入後重新推導其索引項目：先剔除指向該檔案的舊項目，再將每個
    /// 名稱對應到該檔案，後出現者優先；內容無任何宣告時完全不碰磁碟。
    pub fn record_file(&self, file: &Path, content: &str) -> Result<(), TheoremIndexError> {
        let names = extract_theorem_names(content);
        if names.is_empty() {
            return Ok(());
        }

        let lock = lock_for(&self.path);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut index = self.load()?;
        index.retain(|_, declared_in| declared_in.as_path() != file);
        for name in names {
            index.insert(name, file.to_path_buf());
        }

        // BTreeMap keys serialize sorted, keeping re-reads stable and diffs
        // readable.
        let payload = serde_json::to_vec_pretty(&index).map_err(TheoremIndexError::Serialize)?;
        write_atomic(&self.path, &payload).map_err(|source| TheoremIndexError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn extracts_names_in_document_order() {
        let content = r#"intro
<theorem name="Pythagoras">a^2 + b^2 = c^2</theorem>
middle
<theorem name="Mean Value">...</theorem>
<theorem name="Pythagoras">restated</theorem>"#;
        assert_eq!(
            extract_theorem_names(content),
            vec!["Pythagoras", "Mean Value", "Pythagoras"]
        );
    }

    #[test]
    fn plain_text_yields_no_names() {
        assert!(extract_theorem_names("no tags here, <theorem> without name").is_empty());
    }

    #[test]
    fn empty_root_is_rejected() {
        assert!(matches!(
            theorems_file_path(Path::new("")),
            Err(TheoremIndexError::InvalidRoot)
        ));
        let path = theorems_file_path(Path::new("/proj")).unwrap();
        assert_eq!(path, Path::new("/proj/.theorem-note/theorems.json"));
    }

    #[test]
    fn content_without_declarations_touches_no_disk() {
        let tmp = tempdir().unwrap();
        let store = TheoremIndexStore::new(tmp.path()).unwrap();

        store
            .record_file(&tmp.path().join("plain.md"), "nothing to index")
            .unwrap();

        assert!(!tmp.path().join(PROJECT_STORAGE_DIR).exists());
    }

    #[test]
    fn declarations_are_indexed_by_name() {
        let tmp = tempdir().unwrap();
        let store = TheoremIndexStore::new(tmp.path()).unwrap();
        let file = tmp.path().join("notes.md");

        store
            .record_file(&file, r#"<theorem name="T">body</theorem>"#)
            .unwrap();

        let index = store.load().unwrap();
        assert_eq!(index.get("T"), Some(&file));
    }

    #[test]
    fn rewriting_a_file_evicts_only_its_stale_entries() {
        let tmp = tempdir().unwrap();
        let store = TheoremIndexStore::new(tmp.path()).unwrap();
        let first = tmp.path().join("first.md");
        let second = tmp.path().join("second.md");

        store
            .record_file(&first, r#"<theorem name="A">..</theorem><theorem name="B">..</theorem>"#)
            .unwrap();
        store
            .record_file(&second, r#"<theorem name="C">..</theorem>"#)
            .unwrap();

        // The rewrite drops "B"; the entry must disappear while "C" survives.
        store
            .record_file(&first, r#"<theorem name="A">..</theorem>"#)
            .unwrap();

        let index = store.load().unwrap();
        assert_eq!(index.get("A"), Some(&first));
        assert_eq!(index.get("B"), None);
        assert_eq!(index.get("C"), Some(&second));
    }

    #[test]
    fn duplicate_names_in_one_write_collapse_to_one_entry() {
        let tmp = tempdir().unwrap();
        let store = TheoremIndexStore::new(tmp.path()).unwrap();
        let file = tmp.path().join("dup.md");

        store
            .record_file(&file, r#"<theorem name="D">..</theorem><theorem name="D">..</theorem>"#)
            .unwrap();

        let index = store.load().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("D"), Some(&file));
    }

    #[test]
    fn corrupt_index_surfaces_an_error() {
        let tmp = tempdir().unwrap();
        let store = TheoremIndexStore::new(tmp.path()).unwrap();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{broken").unwrap();

        assert!(matches!(
            store.load(),
            Err(TheoremIndexError::Corrupt { .. })
        ));
        assert!(matches!(
            store.record_file(&tmp.path().join("x.md"), r#"<theorem name="X">.</theorem>"#),
            Err(TheoremIndexError::Corrupt { .. })
        ));
    }

    #[test]
    fn empty_index_file_reads_as_empty_map() {
        let tmp = tempdir().unwrap();
        let store = TheoremIndexStore::new(tmp.path()).unwrap();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "").unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn persisted_index_is_key_sorted() {
        let tmp = tempdir().unwrap();
        let store = TheoremIndexStore::new(tmp.path()).unwrap();
        let file = tmp.path().join("sorted.md");

        store
            .record_file(
                &file,
                r#"<theorem name="zeta">..</theorem><theorem name="alpha">..</theorem>"#,
            )
            .unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let alpha = raw.find("alpha").unwrap();
        let zeta = raw.find("zeta").unwrap();
        assert!(alpha < zeta);
    }
}
