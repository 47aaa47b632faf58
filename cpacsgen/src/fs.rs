//! Buffered write-if-different file sink.
//!
//! Generated content is collected in memory and only flushed to disk when
//! the on-disk bytes differ, keeping timestamps stable across identical
//! generator runs.

use std::path::{Path, PathBuf};

use crate::error::CodeGenError;

pub struct File {
    path: PathBuf,
    content: String,
}

impl File {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Default)]
pub struct Filesystem {
    files: Vec<File>,

    pub created: usize,
    pub overwritten: usize,
    pub skipped: usize,
    pub deleted: usize,
}

impl Filesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new buffered file.
    pub fn new_file(&mut self, path: PathBuf, content: String) {
        self.files.push(File { path, content });
    }

    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.iter()
    }

    /// Delete a file belonging to a pruned type.
    pub fn remove_if_exists(&mut self, path: &Path) -> Result<(), CodeGenError> {
        if path.exists() {
            std::fs::remove_file(path)
                .map_err(|e| CodeGenError::io("Failed to remove file", e))
                .map_err(|e| e.in_file(path.display().to_string()))?;
            self.deleted += 1;
        }
        Ok(())
    }

    /// Concatenate all buffered files into one new buffered file, header
    /// files first, each group in alphabetical file name order.
    pub fn merge_files_into(&mut self, path: PathBuf) {
        let mut order: Vec<usize> = (0..self.files.len()).collect();
        order.sort_by_key(|&i| {
            let f = &self.files[i];
            let is_header = f.path.extension().is_some_and(|ext| ext == "h");
            (!is_header, f.path.file_name().map(|n| n.to_owned()))
        });

        let mut merged = String::new();
        for i in order {
            merged.push_str(&self.files[i].content);
        }
        self.new_file(path, merged);
    }

    /// Write all buffers whose content differs from the file on disk.
    pub fn flush_to_disk(&mut self) -> Result<(), CodeGenError> {
        for file in &self.files {
            if file.path.exists() {
                let existing = std::fs::read_to_string(&file.path).unwrap_or_default();
                if existing == file.content {
                    self.skipped += 1;
                    continue;
                }
                self.overwritten += 1;
            } else {
                self.created += 1;
            }

            std::fs::write(&file.path, &file.content)
                .map_err(|e| CodeGenError::io("Failed to write file", e))
                .map_err(|e| e.in_file(file.path.display().to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cpacsgen-fs-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn flush_writes_only_when_different() {
        let dir = scratch_dir("flush");
        let path = dir.join("CPACSPoint.h");
        let _ = std::fs::remove_file(&path);

        let mut fs = Filesystem::new();
        fs.new_file(path.clone(), "content".to_owned());
        fs.flush_to_disk().unwrap();
        assert_eq!((fs.created, fs.overwritten, fs.skipped), (1, 0, 0));

        let mut fs = Filesystem::new();
        fs.new_file(path.clone(), "content".to_owned());
        fs.flush_to_disk().unwrap();
        assert_eq!((fs.created, fs.overwritten, fs.skipped), (0, 0, 1));

        let mut fs = Filesystem::new();
        fs.new_file(path.clone(), "changed".to_owned());
        fs.flush_to_disk().unwrap();
        assert_eq!((fs.created, fs.overwritten, fs.skipped), (0, 1, 0));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn remove_if_exists_counts_deletions() {
        let dir = scratch_dir("remove");
        let path = dir.join("CPACSPruned.h");
        std::fs::write(&path, "pruned").unwrap();

        let mut fs = Filesystem::new();
        fs.remove_if_exists(&path).unwrap();
        fs.remove_if_exists(&path).unwrap();
        assert_eq!(fs.deleted, 1);
        assert!(!path.exists());
    }

    #[test]
    fn merge_orders_headers_before_sources() {
        let mut fs = Filesystem::new();
        fs.new_file(PathBuf::from("b.cpp"), "3".to_owned());
        fs.new_file(PathBuf::from("b.h"), "2".to_owned());
        fs.new_file(PathBuf::from("a.h"), "1".to_owned());
        fs.merge_files_into(PathBuf::from("merged.cpp"));

        let merged = fs.files().find(|f| f.path() == Path::new("merged.cpp"));
        assert_eq!(merged.unwrap().content(), "123");
    }
}
