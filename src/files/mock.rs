use crate::error::Result;
use crate::files::FileEditor;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// In-memory file editor for tests
#[derive(Debug, Default)]
pub struct MockFileEditor {
    files: RefCell<BTreeMap<PathBuf, String>>,
}

impl MockFileEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), content.into());
        self
    }

    /// Current content of `path`, if it exists
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }
}

impl FileEditor for MockFileEditor {
    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.content(path))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
