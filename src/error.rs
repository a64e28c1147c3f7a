use std::io;
use std::path::PathBuf;

use crate::min_pq::HeapError;

pub type Result<T> = std::result::Result<T, HuffError>;

#[derive(Debug, thiserror::Error)]
pub enum HuffError {
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The tree builder drained the priority queue; indicates a logic defect.
    #[error("priority queue underflow")]
    QueueUnderflow,

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("truncated stream: input ended before the end-of-data code")]
    TruncatedStream,

    #[error("decoded {actual} bytes but the header records {expected}")]
    LengthMismatch { expected: u64, actual: u64 },

    /// The code table has no code for the end-of-data byte.
    #[error("no end-of-data code in the code table")]
    MissingEndCode,

    /// The second encoding pass saw different content than the first.
    #[error("source changed between encoding passes")]
    SourceChanged,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<HeapError> for HuffError {
    fn from(_: HeapError) -> Self {
        HuffError::QueueUnderflow
    }
}

impl HuffError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        HuffError::MalformedHeader(msg.into())
    }
}
