//! Stock receiver binary.
//!
//! Listens on TCP (default `0.0.0.0:9000`), reads count-prefixed batches of quotes, and
//! prints a sell / buy / hold recommendation for every ticker found in the portfolio.
//!
//! Usage example (CLI):
//! ```bash
//! stock_receiver --port 9000 --portfolio ./portfolio.json --format text
//! ```
//!
//! Reports go to stdout; logs go to stderr and honour `RUST_LOG`.
#![warn(missing_docs)]
mod args;

use std::io;
use std::sync::Arc;

use clap::Parser;
use log::{info, warn};
use stock_common::Result;
use stock_common::net::addr;
use stock_receiver::{BatchReceiver, ConsoleSink, Dispatcher, Portfolio};

use crate::args::Args;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let portfolio = match &args.portfolio {
        Some(path) => Portfolio::load(path)?,
        None => Portfolio::builtin(),
    };
    if portfolio.is_empty() {
        warn!("Portfolio is empty, every ticker will be reported as unmanaged");
    } else {
        info!("Portfolio holds {} tickers", portfolio.len());
    }
    let dispatcher = Dispatcher::new(Arc::new(portfolio));

    let receiver =
        BatchReceiver::bind(&addr(&args.listen_ip, args.port))?.with_max_batch(args.max_batch);
    let mut sink = ConsoleSink::new(io::stdout(), args.format);

    receiver.serve(args.session_limit(), &dispatcher, &mut sink)?;
    info!("Receiver finished");
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
