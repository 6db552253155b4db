//!
//! Common types and utilities shared by the stock receiver and sender.
//!
//! This crate aggregates:
//! - `error` — unified error type `StockError` used across the workspace.
//! - `result` — handy `Result<T, StockError>` alias.
//! - `ticker` — fixed-slot ticker symbols compared byte-wise up to the first zero.
//! - `quote` — the `Quote` record, the `Batch` container and a quotes-file parser.
//! - `wire` — field-by-field binary codec for batch headers and quote records.
//! - `frame` — reads whole batches from a byte stream, tolerating short reads.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod frame;
pub mod net;
pub mod quote;
pub mod result;
pub mod ticker;
pub mod wire;

pub use error::StockError;
pub use frame::FrameReader;
pub use quote::{Batch, Quote};
pub use result::Result;
pub use ticker::TickerSymbol;
