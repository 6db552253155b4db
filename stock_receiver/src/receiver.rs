//! TCP session handling for the receiver.
//!
//! The listener serves one client at a time. Each accepted connection is read batch by
//! batch with a [`FrameReader`]; a batch is fully dispatched before the next header is
//! read. A clean close between batches ends the session normally, while any framing
//! error aborts it and is returned to the caller.
use std::io::Read;
use std::net::{SocketAddr, TcpListener, TcpStream};

use log::{error, info};
use stock_common::frame::MAX_BATCH_COUNT;
use stock_common::{FrameReader, Result};

use crate::decision::Evaluator;
use crate::dispatcher::Dispatcher;
use crate::report::ReportSink;

/// What happened on one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Batches fully processed.
    pub batches: usize,
    /// Quotes across all processed batches.
    pub quotes: usize,
}

/// TCP listener that accepts quote-batch sessions.
pub struct BatchReceiver {
    listener: TcpListener,
    max_batch: u32,
}

impl BatchReceiver {
    /// Bind a new receiver to the provided `bind_addr` (e.g., `0.0.0.0:9000`).
    pub fn bind(bind_addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(bind_addr)?;
        Ok(Self {
            listener,
            max_batch: MAX_BATCH_COUNT,
        })
    }

    /// Sets the largest batch a header may declare.
    pub fn with_max_batch(mut self, max_batch: u32) -> Self {
        self.max_batch = max_batch;
        self
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Blocks until a client connects.
    pub fn accept(&self) -> Result<(TcpStream, SocketAddr)> {
        let (stream, peer) = self.listener.accept()?;
        info!("Client connected from {}", peer);
        Ok((stream, peer))
    }

    /// Accepts `sessions` connections one after another (`None` = forever) and serves
    /// each to completion. Stops at the first session that fails.
    pub fn serve<E, S>(
        &self,
        sessions: Option<usize>,
        dispatcher: &Dispatcher<E>,
        sink: &mut S,
    ) -> Result<()>
    where
        E: Evaluator,
        S: ReportSink + ?Sized,
    {
        info!("Waiting for connection on {}", self.local_addr()?);
        let mut served = 0;
        while sessions.is_none_or(|limit| served < limit) {
            let (stream, peer) = self.accept()?;
            match serve_session(stream, self.max_batch, dispatcher, sink) {
                Ok(stats) => info!(
                    "Session {} closed after {} batches ({} quotes)",
                    peer, stats.batches, stats.quotes
                ),
                Err(e) if e.is_framing() => {
                    error!("Session {} aborted, bad frame: {}", peer, e);
                    return Err(e);
                }
                Err(e) => {
                    error!("Session {} aborted while processing a batch: {}", peer, e);
                    return Err(e);
                }
            }
            served += 1;
        }
        Ok(())
    }
}

/// Reads and dispatches batches from `session` until it closes.
pub fn serve_session<R, E, S>(
    session: R,
    max_batch: u32,
    dispatcher: &Dispatcher<E>,
    sink: &mut S,
) -> Result<SessionStats>
where
    R: Read,
    E: Evaluator,
    S: ReportSink + ?Sized,
{
    let mut reader = FrameReader::with_max_count(session, max_batch);
    let mut stats = SessionStats::default();

    while let Some(batch) = reader.next_batch()? {
        info!("Number of stocks: {}", batch.len());
        let summary = dispatcher.process_batch(&batch, sink)?;
        info!("Processed {}", summary);
        stats.batches += 1;
        stats.quotes += batch.len();
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::Portfolio;
    use crate::report::Report;
    use std::io::{self, Cursor, ErrorKind, Read};
    use std::sync::Arc;
    use stock_common::wire::encode_batch;
    use stock_common::{Quote, StockError};

    struct Reset;

    impl Read for Reset {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::ConnectionReset))
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(Portfolio::builtin()))
    }

    #[test]
    fn serves_consecutive_batches() {
        let mut bytes = encode_batch(&[Quote::new("AAPL", 85.0, 100.0, 100.0)]).unwrap();
        bytes.extend(
            encode_batch(&[
                Quote::new("GOOG", 120.0, 150.0, 100.0),
                Quote::new("ZZZZ", 1.0, 1.0, 1.0),
            ])
            .unwrap(),
        );
        let mut sink: Vec<Report> = Vec::new();

        let stats = serve_session(Cursor::new(bytes), MAX_BATCH_COUNT, &dispatcher(), &mut sink).unwrap();

        assert_eq!(stats, SessionStats { batches: 2, quotes: 3 });
        assert_eq!(sink.len(), 3);
        assert_eq!(sink[0].ticker().to_string(), "AAPL");
    }

    #[test]
    fn truncated_batch_emits_no_reports() {
        let mut bytes = encode_batch(&[
            Quote::new("AAPL", 85.0, 100.0, 100.0),
            Quote::new("GOOG", 120.0, 150.0, 100.0),
        ])
        .unwrap();
        bytes.truncate(bytes.len() - 1);
        let mut sink: Vec<Report> = Vec::new();

        let err = serve_session(Cursor::new(bytes), MAX_BATCH_COUNT, &dispatcher(), &mut sink).unwrap_err();

        assert!(matches!(err, StockError::IncompleteBody { expected: 40, received: 39 }));
        assert!(sink.is_empty());
    }

    #[test]
    fn reset_before_first_header_fails_the_session() {
        let mut sink: Vec<Report> = Vec::new();

        let err = serve_session(Reset, MAX_BATCH_COUNT, &dispatcher(), &mut sink).unwrap_err();

        assert!(matches!(err, StockError::IncompleteHeader { received: 0 }));
        assert!(err.is_framing());
        assert!(sink.is_empty());
    }

    #[test]
    fn reset_between_batches_fails_after_the_first_is_reported() {
        let bytes = encode_batch(&[Quote::new("AAPL", 85.0, 100.0, 100.0)]).unwrap();
        let mut sink: Vec<Report> = Vec::new();

        let session = Cursor::new(bytes).chain(Reset);
        let err = serve_session(session, MAX_BATCH_COUNT, &dispatcher(), &mut sink).unwrap_err();

        assert!(err.is_transport_closed());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn oversized_batch_aborts_the_session() {
        let bytes = encode_batch(&[
            Quote::new("AAPL", 85.0, 100.0, 100.0),
            Quote::new("GOOG", 120.0, 150.0, 100.0),
        ])
        .unwrap();
        let mut sink: Vec<Report> = Vec::new();

        let err = serve_session(Cursor::new(bytes), 1, &dispatcher(), &mut sink).unwrap_err();

        assert!(matches!(err, StockError::BatchTooLarge { count: 2, max: 1 }));
        assert!(sink.is_empty());
    }
}
