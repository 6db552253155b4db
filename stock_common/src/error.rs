//! Error types shared between the receiver and the sender.
//!
//! The `StockError` enum unifies I/O, framing, configuration and worker failures,
//! allowing every crate in the workspace to propagate a single error type with `?`.
use std::io;

use thiserror::Error;

/// Unified error type shared by receiver and sender.
#[derive(Error, Debug)]
pub enum StockError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The session closed before the 4-byte batch header was complete.
    #[error("Incomplete header: received {received} of 4 bytes")]
    IncompleteHeader {
        /// Header bytes received before the stream ended.
        received: usize,
    },

    /// The session closed before the declared batch body was complete.
    #[error("Incomplete body: received {received} of {expected} bytes")]
    IncompleteBody {
        /// Body size implied by the batch header.
        expected: usize,
        /// Body bytes received before the stream ended.
        received: usize,
    },

    /// A decode was attempted past the end of the supplied buffer.
    #[error("Malformed record at offset {offset}: need {needed} bytes, {available} available")]
    MalformedRecord {
        /// Byte offset where decoding started.
        offset: usize,
        /// Bytes required by the record.
        needed: usize,
        /// Bytes actually present in the buffer.
        available: usize,
    },

    /// The batch header declared more quotes than the configured ceiling.
    #[error("Batch of {count} quotes exceeds the limit of {max}")]
    BatchTooLarge {
        /// Declared quote count.
        count: u32,
        /// Configured ceiling.
        max: u32,
    },

    /// A ticker symbol failed validation.
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// Error while parsing a quotes file into `Quote` values.
    #[error("Parse quotes file error: {0}")]
    ParseQuotesFile(String),

    /// The same ticker appears more than once in a portfolio definition.
    #[error("Duplicate holding for ticker {0}")]
    DuplicateHolding(String),

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// A worker thread panicked before finishing its analysis.
    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),
}

impl StockError {
    /// Returns `true` when the error means the peer closed the session mid-frame.
    pub fn is_transport_closed(&self) -> bool {
        matches!(
            self,
            StockError::IncompleteHeader { .. } | StockError::IncompleteBody { .. }
        )
    }

    /// Returns `true` for framing failures that make the rest of the session unusable.
    pub fn is_framing(&self) -> bool {
        self.is_transport_closed()
            || matches!(
                self,
                StockError::MalformedRecord { .. } | StockError::BatchTooLarge { .. }
            )
    }
}
