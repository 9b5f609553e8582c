//! Commit message classification.
//!
//! A header line is any line with a `:` whose prefix (lowercased) contains a
//! known change-type token, e.g. `feat(parser): add x`. The type segment
//! before `(` is searched first, so `fix(ci)` is a fix.
//! When several lines qualify the last one wins, so a trailing
//! `BREAKING CHANGE:` footer or a header following a merge preamble decides.

use crate::domain::ChangeType;
use crate::error::{Result, SemanticReleaseError};
use regex::Regex;
use std::sync::LazyLock;

/// Longest message body kept in the changelog before truncating.
pub const MESSAGE_LIMIT: usize = 150;

/// Scope reported when the header has no `(scope)`.
pub const DEFAULT_SCOPE: &str = "default";

static SCOPE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("scope pattern is valid"));

/// Lowercased fragments of CI-generated merge commits into the main branch.
const MERGE_PREAMBLES: [&str; 6] = [
    "'origin/master' into",
    "merge branch 'master' into",
    "merge branch 'master' of",
    "'origin/main' into",
    "merge branch 'main' into",
    "merge branch 'main' of",
];

/// Parsed representation of a commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub change_type: ChangeType,
    pub scope: String,
    /// Prettified body of the winning header
    pub message: String,
}

impl ParsedCommit {
    /// Classify, extract the scope and prettify in one pass.
    pub fn parse(message: &str) -> Result<Self> {
        let header = winning_header(message).ok_or(SemanticReleaseError::ChangeTypeNotFound)?;
        Ok(ParsedCommit {
            change_type: header.change_type,
            scope: header.scope(),
            message: header.prettified_body()?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Header<'a> {
    line: &'a str,
    body: &'a str,
    change_type: ChangeType,
}

impl Header<'_> {
    fn scope(&self) -> String {
        SCOPE_PATTERN
            .captures(self.line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SCOPE)
            .to_string()
    }

    fn prettified_body(&self) -> Result<String> {
        let body = self.body.trim();
        if body.is_empty() {
            return Err(SemanticReleaseError::EmptyMessage);
        }

        let mut chars = body.chars();
        let mut pretty: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };

        if pretty.chars().count() > MESSAGE_LIMIT {
            pretty = pretty.chars().take(MESSAGE_LIMIT).collect();
            pretty.push_str("...");
        }

        Ok(pretty)
    }
}

fn parse_header(line: &str) -> Option<Header<'_>> {
    let (prefix, body) = line.split_once(':')?;
    let type_segment = prefix.split('(').next().unwrap_or(prefix);
    let change_type =
        ChangeType::find_in(type_segment).or_else(|| ChangeType::find_in(prefix))?;
    Some(Header {
        line,
        body,
        change_type,
    })
}

fn winning_header(message: &str) -> Option<Header<'_>> {
    message.lines().filter_map(parse_header).last()
}

/// Determine the change type of a commit message.
///
/// Returns [`SemanticReleaseError::ChangeTypeNotFound`] when no line is a
/// recognized header.
pub fn classify(message: &str) -> Result<ChangeType> {
    winning_header(message)
        .map(|header| header.change_type)
        .ok_or(SemanticReleaseError::ChangeTypeNotFound)
}

/// Scope of the winning header, `"default"` when it has none.
///
/// `fix(parser): handle eof` has scope `parser`.
pub fn scope(message: &str) -> String {
    winning_header(message)
        .map(|header| header.scope())
        .unwrap_or_else(|| DEFAULT_SCOPE.to_string())
}

/// Short changelog message taken from the winning header.
///
/// The text after the first `:` is trimmed, its first letter capitalized and
/// anything past [`MESSAGE_LIMIT`] characters replaced by `...`.
pub fn prettify_message(message: &str) -> Result<String> {
    winning_header(message)
        .ok_or(SemanticReleaseError::MessageTagMissing)?
        .prettified_body()
}

/// Whether the message is a merge of the master/main branch.
pub fn is_merge_commit(message: &str) -> bool {
    let lowered = message.to_lowercase();
    MERGE_PREAMBLES
        .iter()
        .any(|preamble| lowered.contains(preamble))
}

/// Structural validity used by commit-lint: a recognized header is present,
/// or the message is a master/main merge.
pub fn is_valid_message(message: &str) -> bool {
    winning_header(message).is_some() || is_merge_commit(message)
}
