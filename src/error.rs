use std::io;
use std::path::PathBuf;

/// Errors surfaced by statistics queries and mount-table reads.
#[derive(Debug, thiserror::Error)]
pub enum FsStatError {
    /// Neither mount-table file could be opened.
    #[error("no mount table available: {} and {} could not be opened: {source}", primary.display(), secondary.display())]
    SourceUnavailable {
        primary:   PathBuf,
        secondary: PathBuf,
        /// Open error of the secondary source, the last one attempted.
        #[source]
        source:    io::Error,
    },

    /// A mount-table record broke the field-count or field-type contract.
    #[error("malformed mount record at line {line}: {reason}")]
    MalformedRecord {
        line:   usize,
        reason: String,
    },

    /// The statfs/statvfs query for a path failed.
    #[error("filesystem statistics query failed for {path:?}: {source}")]
    StatisticsQueryFailed {
        path: String,
        #[source]
        source: nix::Error,
    },

    #[error("invalid config {}: {reason}", path.display())]
    Config {
        path:   PathBuf,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, FsStatError>;

impl FsStatError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord { line, reason: reason.into() }
    }
}
