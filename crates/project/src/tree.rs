use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FsError;

/// A single entry in a file-tree snapshot.
/// 檔案樹快照中的單一節點。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileNode {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
}

/// Builds the ordered snapshot of a directory's immediate children, recursing
/// depth-first into subdirectories. At every level, directories sort before
/// files and names break ties case-sensitively, so repeated calls on unchanged
/// input return the same sequence.
/// 建立目錄直屬子項的排序快照，並以深度優先展開子目錄；每一層皆為目錄優先、
/// 名稱區分大小寫排序，相同輸入保證產生相同結果。
pub fn read_tree(path: &Path) -> Result<Vec<FileNode>, FsError> {
    let mut visited = HashSet::new();
    let canonical = fs::canonicalize(path).map_err(|err| FsError::from_io(path, err))?;
    visited.insert(canonical);
    scan_dir(path, &mut visited)
}

fn scan_dir(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Vec<FileNode>, FsError> {
    let entries = fs::read_dir(path).map_err(|err| FsError::from_io(path, err))?;

    let mut nodes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| FsError::from_io(path, err))?;
        let entry_path = entry.path();
        let is_directory = entry_path.is_dir();
        let mut node = FileNode {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry_path.clone(),
            is_directory,
            children: Vec::new(),
        };
        if is_directory {
            node.children = scan_subdir(&entry_path, visited)?;
        }
        nodes.push(node);
    }

    nodes.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(nodes)
}

fn scan_subdir(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Vec<FileNode>, FsError> {
    // A directory whose canonical path was already walked is a link cycle;
    // emit it with no children instead of recursing without bound.
    let canonical = fs::canonicalize(path).map_err(|err| FsError::from_io(path, err))?;
    if !visited.insert(canonical) {
        return Ok(Vec::new());
    }
    scan_dir(path, visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn directories_sort_before_files_at_every_level() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("file1.txt"), "").unwrap();
        fs::write(tmp.path().join("a.txt"), "").unwrap();
        fs::create_dir(tmp.path().join("zdir")).unwrap();
        fs::create_dir(tmp.path().join("dir1")).unwrap();
        fs::write(tmp.path().join("dir1").join("nested.md"), "").unwrap();
        fs::create_dir(tmp.path().join("dir1").join("inner")).unwrap();

        let tree = read_tree(tmp.path()).unwrap();
        let names: Vec<_> = tree.iter().map(|node| node.name.as_str()).collect();
        assert_eq!(names, vec!["dir1", "zdir", "a.txt", "file1.txt"]);

        let dir1 = &tree[0];
        assert!(dir1.is_directory);
        let child_names: Vec<_> = dir1.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(child_names, vec!["inner", "nested.md"]);
    }

    #[test]
    fn snapshot_has_one_node_per_entry() {
        let tmp = tempdir().unwrap();
        for name in ["one.txt", "two.txt", "three.txt"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let tree = read_tree(tmp.path()).unwrap();
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn name_ordering_is_case_sensitive() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("Beta.txt"), "").unwrap();
        fs::write(tmp.path().join("alpha.txt"), "").unwrap();

        let tree = read_tree(tmp.path()).unwrap();
        let names: Vec<_> = tree.iter().map(|node| node.name.as_str()).collect();
        // Uppercase sorts before lowercase in a byte-wise comparison.
        assert_eq!(names, vec!["Beta.txt", "alpha.txt"]);
    }

    #[test]
    fn file_nodes_have_no_children_and_paths_are_anchored() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("note.md"), "").unwrap();

        let tree = read_tree(tmp.path()).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(!tree[0].is_directory);
        assert!(tree[0].children.is_empty());
        assert_eq!(tree[0].path, tmp.path().join("note.md"));
    }

    #[test]
    fn missing_directory_is_not_found() {
        let tmp = tempdir().unwrap();
        let err = read_tree(&tmp.path().join("absent")).unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycles_terminate_with_empty_children() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("note.md"), "").unwrap();
        std::os::unix::fs::symlink(&root, root.join("loop")).unwrap();

        let tree = read_tree(&root).unwrap();
        let names: Vec<_> = tree.iter().map(|node| node.name.as_str()).collect();
        assert_eq!(names, vec!["loop", "note.md"]);
        assert!(tree[0].is_directory);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn serialized_file_node_omits_empty_children() {
        let node = FileNode {
            name: "note.md".into(),
            path: PathBuf::from("/p/note.md"),
            is_directory: false,
            children: Vec::new(),
        };
        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("children"));

        let back: FileNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
