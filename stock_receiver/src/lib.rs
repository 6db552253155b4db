//! Receiver side of the stock analyzer.
//!
//! Quotes arrive as count-prefixed binary batches over a TCP session. Each batch is
//! cross-referenced against a read-only portfolio, and every held ticker is analysed on
//! its own worker thread:
//!
//! - `portfolio` — holdings keyed by ticker, loaded once before any session.
//! - `decision` — the sell / buy / hold rules and the `Evaluator` seam.
//! - `report` — per-quote reports and sinks that print them atomically.
//! - `dispatcher` — fans a batch out to workers and waits for all of them.
//! - `receiver` — TCP listener and per-session batch loop.
#![warn(missing_docs)]
pub mod decision;
pub mod dispatcher;
pub mod portfolio;
pub mod receiver;
pub mod report;

pub use decision::{Evaluator, Recommendation, ThresholdEvaluator};
pub use dispatcher::{BatchSummary, Dispatcher};
pub use portfolio::{Holding, Portfolio};
pub use receiver::{BatchReceiver, SessionStats, serve_session};
pub use report::{ConsoleSink, OutputFormat, Report, ReportSink};
