use crate::error::Result;
use crate::files::FileEditor;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Edits files on disk; relative paths resolve against `root`.
#[derive(Debug, Clone)]
pub struct FsFileEditor {
    root: PathBuf,
}

impl FsFileEditor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsFileEditor { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileEditor for FsFileEditor {
    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(self.resolve(path)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Missing parent directories are created.
    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let full_path = self.resolve(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content)?;
        Ok(())
    }
}
