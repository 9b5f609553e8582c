/// The first seven characters of a commit hash.
pub(crate) fn abbreviate_hash(hash: &str) -> &str {
    let end = hash
        .char_indices()
        .nth(7)
        .map(|(i, _)| i)
        .unwrap_or(hash.len());
    &hash[..end]
}

/// A commit read from the repository history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full commit hash
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    /// Full commit message, including body
    pub message: String,
    /// Author time, seconds since the Unix epoch
    pub timestamp: i64,
}

impl CommitRecord {
    /// The first seven characters of the hash (or the whole hash if shorter).
    pub fn short_hash(&self) -> &str {
        abbreviate_hash(&self.hash)
    }

    /// The first line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    /// Select the most recent record by author time.
    ///
    /// A later record replaces the current pick only when its timestamp is
    /// strictly greater, so ties keep the earlier-seen record.
    pub fn most_recent<'a, I>(records: I) -> Option<&'a CommitRecord>
    where
        I: IntoIterator<Item = &'a CommitRecord>,
    {
        records.into_iter().fold(None, |best, candidate| match best {
            Some(current) if candidate.timestamp <= current.timestamp => Some(current),
            _ => Some(candidate),
        })
    }
}
