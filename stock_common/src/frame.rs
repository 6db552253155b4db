//! Reads complete batches from an ordered byte stream.
//!
//! A stream may hand data over in arbitrarily small pieces, so the reader keeps
//! calling `read` until either the header or the declared body is complete. A batch is
//! returned only once every record has arrived; when the stream ends early the caller
//! gets `IncompleteHeader` or `IncompleteBody` and never a partial batch.
//!
//! The reader only consumes bytes. Closing the session is left to its owner.
use std::io::{ErrorKind, Read};

use log::{debug, warn};

use crate::error::StockError;
use crate::quote::Batch;
use crate::result::Result;
use crate::wire::{self, HEADER_SIZE};

/// Default ceiling on the number of quotes a single header may declare.
///
/// The dispatcher starts one thread per held quote, so this also bounds the
/// number of workers a single batch can spawn.
pub const MAX_BATCH_COUNT: u32 = 4_096;

/// Pulls batches out of a byte-stream session.
pub struct FrameReader<R> {
    session: R,
    max_count: u32,
}

impl<R: Read> FrameReader<R> {
    /// Wraps `session` with the default [`MAX_BATCH_COUNT`] ceiling.
    pub fn new(session: R) -> Self {
        Self::with_max_count(session, MAX_BATCH_COUNT)
    }

    /// Wraps `session`, rejecting headers that declare more than `max_count` quotes.
    pub fn with_max_count(session: R, max_count: u32) -> Self {
        Self { session, max_count }
    }

    /// Reads exactly one batch.
    ///
    /// A stream that is already at its end fails with `IncompleteHeader { received: 0 }`.
    pub fn read_batch(&mut self) -> Result<Batch> {
        self.next_batch()?
            .ok_or(StockError::IncompleteHeader { received: 0 })
    }

    /// Reads the next batch, or `None` if the stream ended cleanly on a batch boundary.
    pub fn next_batch(&mut self) -> Result<Option<Batch>> {
        let mut header = [0u8; HEADER_SIZE];
        let (received, end) = fill(&mut self.session, &mut header);
        if received == 0 && end == StreamEnd::Closed {
            return Ok(None);
        }
        if received < HEADER_SIZE {
            return Err(StockError::IncompleteHeader { received });
        }

        let count = wire::decode_header(&header)?;
        if count > self.max_count {
            return Err(StockError::BatchTooLarge {
                count,
                max: self.max_count,
            });
        }
        debug!("Batch header declares {} quotes", count);

        let expected = wire::body_len(count);
        let mut body = vec![0u8; expected];
        let (received, _) = fill(&mut self.session, &mut body);
        if received < expected {
            return Err(StockError::IncompleteBody { expected, received });
        }

        wire::decode_body(&body, count).map(Some)
    }

    /// Returns the wrapped session.
    pub fn into_inner(self) -> R {
        self.session
    }
}

/// Reads one batch from `session` using the default ceiling.
pub fn read_batch<R: Read>(session: &mut R) -> Result<Batch> {
    FrameReader::new(session).read_batch()
}

/// Why [`fill`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamEnd {
    /// The buffer was filled.
    Full,
    /// The peer closed the stream (`read` returned 0).
    Closed,
    /// `read` failed with something other than `Interrupted`.
    Failed,
}

/// Reads into `buf` until it is full or the stream stops producing bytes.
/// Returns how many bytes were filled and why reading stopped.
fn fill<R: Read>(session: &mut R, buf: &mut [u8]) -> (usize, StreamEnd) {
    let mut filled = 0;
    while filled < buf.len() {
        match session.read(&mut buf[filled..]) {
            Ok(0) => return (filled, StreamEnd::Closed),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Read failed after {} of {} bytes: {}", filled, buf.len(), e);
                return (filled, StreamEnd::Failed);
            }
        }
    }
    (filled, StreamEnd::Full)
}
