use std::fs;
use std::path::{Path, PathBuf};

use super::FileError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Source of directory listings for the file pickers.
pub trait DirectoryBrowser {
    fn list(&self, dir: &Path) -> Result<Vec<DirEntry>, FileError>;
}

/// Lists the real filesystem, directories first, dot entries hidden.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBrowser;

impl DirectoryBrowser for FsBrowser {
    fn list(&self, dir: &Path) -> Result<Vec<DirEntry>, FileError> {
        let read = fs::read_dir(dir).map_err(|source| FileError::List {
            path: dir.display().to_string(),
            source,
        })?;
        let mut entries: Vec<DirEntry> = read
            .filter_map(|e| e.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                if name.starts_with('.') {
                    return None;
                }
                let path = entry.path();
                Some(DirEntry {
                    is_dir: path.is_dir(),
                    name,
                    path,
                })
            })
            .collect();
        entries.sort_by(|a, b| {
            b.is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{DirectoryBrowser, FsBrowser};
    use crate::io::FileError;

    #[test]
    fn directories_come_first_and_hidden_entries_are_skipped() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join("b.txt"), "").expect("write");
        std::fs::write(dir.path().join("A.txt"), "").expect("write");
        std::fs::write(dir.path().join(".hidden"), "").expect("write");
        std::fs::create_dir(dir.path().join("zeta")).expect("mkdir");

        let names: Vec<String> = FsBrowser
            .list(dir.path())
            .expect("list")
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["zeta", "A.txt", "b.txt"]);
    }

    #[test]
    fn listing_a_missing_directory_fails() {
        let dir = tempdir().expect("tempdir");
        let err = FsBrowser.list(&dir.path().join("gone")).unwrap_err();
        assert!(matches!(err, FileError::List { .. }));
    }
}
