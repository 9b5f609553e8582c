//! Working-copy file edits performed during a release.
//!
//! - [fs::FsFileEditor]: edits files under a working-copy root
//! - [mock::MockFileEditor]: in-memory files for orchestrator tests

pub mod fs;
pub mod mock;

pub use fs::FsFileEditor;
pub use mock::MockFileEditor;

use crate::error::{Result, SemanticReleaseError};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A source file holding the project version in a variable assignment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VariableFile {
    /// Path relative to the repository root
    pub path: PathBuf,
    /// Variable name, e.g. `__version__`
    pub variable: String,
    /// Where the rewritten file is written; `path` itself when absent
    #[serde(default)]
    pub destination: Option<PathBuf>,
}

impl VariableFile {
    pub fn new(path: impl Into<PathBuf>, variable: impl Into<String>) -> Self {
        VariableFile {
            path: path.into(),
            variable: variable.into(),
            destination: None,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// File the rewritten content goes to.
    pub fn target(&self) -> &Path {
        self.destination.as_deref().unwrap_or(&self.path)
    }
}

/// File mutations the release flow needs.
///
/// Implementors only provide raw reads and writes; the edits themselves are
/// shared.
pub trait FileEditor {
    /// Content of `path`, `None` when the file does not exist.
    fn read_file(&self, path: &Path) -> Result<Option<String>>;

    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Replace the line assigning the variable of `file` with
    /// `variable = "new_value"` (or `:=` when the line used it), writing the
    /// result to [VariableFile::target].
    ///
    /// Fails with [SemanticReleaseError::VariableNotFound] when no line
    /// assigns the variable; nothing is written.
    fn rewrite_variable_line(&self, file: &VariableFile, new_value: &str) -> Result<()> {
        self.rewrite_variable_files(std::slice::from_ref(file), new_value)
    }

    /// Rewrite every file in `files`, or none of them.
    ///
    /// All rewrites are computed before the first write, so a missing file or
    /// variable leaves every target untouched. Entries sharing a file see the
    /// edits of earlier entries.
    fn rewrite_variable_files(&self, files: &[VariableFile], new_value: &str) -> Result<()> {
        let mut pending: Vec<(PathBuf, String)> = Vec::with_capacity(files.len());

        for file in files {
            let content = match pending.iter().rev().find(|(path, _)| path == &file.path) {
                Some((_, content)) => content.clone(),
                None => self.read_file(&file.path)?.ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("{} does not exist", file.path.display()),
                    )
                })?,
            };

            let rewritten = rewrite_variable(&content, &file.variable, new_value).ok_or_else(
                || SemanticReleaseError::VariableNotFound {
                    variable: file.variable.clone(),
                    path: file.path.clone(),
                },
            )?;
            pending.push((file.target().to_path_buf(), rewritten));
        }

        for (target, content) in &pending {
            self.write_file(target, content)?;
            debug!(path = %target.display(), %new_value, "rewrote version variable");
        }
        Ok(())
    }

    /// Put `entry` in front of the existing changelog content.
    ///
    /// A missing changelog is created.
    fn prepend_changelog_entry(&self, path: &Path, entry: &str) -> Result<()> {
        let existing = self.read_file(path)?.unwrap_or_default();
        self.write_file(path, &format!("{}{}", entry, existing))?;
        debug!(path = %path.display(), "prepended changelog entry");
        Ok(())
    }
}

/// Assignment operator on `line` when it assigns `variable`, with the text
/// following the operator.
///
/// Only lines whose trimmed text starts with the exact variable name followed
/// by `:=` or a single `=` qualify.
fn split_assignment<'a>(line: &'a str, variable: &str) -> Option<(&'static str, &'a str)> {
    let rest = line.trim_start().strip_prefix(variable)?.trim_start();
    if let Some(value) = rest.strip_prefix(":=") {
        Some((":=", value))
    } else if rest.starts_with("==") {
        None
    } else {
        rest.strip_prefix('=').map(|value| ("=", value))
    }
}

/// Quote character of the old value and whatever followed it on the line.
///
/// Unquoted values get double quotes.
fn quote_and_tail(value: &str) -> (char, &str) {
    let value = value.trim_start();
    match value.chars().next() {
        Some(quote @ ('"' | '\'')) => match value[1..].find(quote) {
            Some(end) => (quote, &value[end + 2..]),
            None => (quote, ""),
        },
        _ => {
            let tail = value.find(char::is_whitespace).map_or("", |end| &value[end..]);
            ('"', tail)
        }
    }
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Rewrite every assignment of `variable` in `content`.
///
/// Returns `None` when the variable is not assigned anywhere. Indentation,
/// line endings, the quote style and anything after the old value are kept.
pub fn rewrite_variable(content: &str, variable: &str, new_value: &str) -> Option<String> {
    let mut found = false;
    let mut rewritten = String::with_capacity(content.len() + new_value.len());

    for line in content.split_inclusive('\n') {
        let (body, ending) = split_line_ending(line);
        match split_assignment(body, variable) {
            Some((operator, value)) => {
                found = true;
                let indent = &body[..body.len() - body.trim_start().len()];
                let (quote, tail) = quote_and_tail(value);
                rewritten.push_str(&format!(
                    "{indent}{variable} {operator} {quote}{new_value}{quote}{tail}"
                ));
                rewritten.push_str(ending);
            }
            None => rewritten.push_str(line),
        }
    }

    found.then_some(rewritten)
}
