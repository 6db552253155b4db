//! Stock Sender — collects quotes and ships them to the receiver as one binary batch.
//!
//! Quotes come from one of three places:
//! - `--path <file>`: a text file with one `TICKER PRICE HIGH LOW` line per quote;
//! - `--random <N>`: N synthetic quotes cycling through `--tickers`;
//! - otherwise an interactive prompt on stdin.
//!
//! Usage example (CLI):
//! ```bash
//! stock_sender --server-ip 127.0.0.1 --port 9000 --path ./quotes.txt
//! ```
#![warn(missing_docs)]
mod args;
mod model;
mod sender;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};
use stock_common::net::addr;
use stock_common::quote::QuoteParser;
use stock_common::{Quote, Result, StockError};

use crate::args::Args;
use crate::model::generator;
use crate::model::prompt::QuotePrompt;
use crate::sender::BatchSender;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let quotes = if let Some(raw) = &args.path {
        let path = normalize_path(raw);
        if !is_file_exist(&path) {
            return Err(StockError::Format(format!(
                "Quotes file {} does not exist",
                path.display()
            )));
        }
        Quote::parse_from_file(BufReader::new(File::open(&path)?))?
    } else if let Some(count) = args.random {
        generator::generate(&args.tickers, count)
    } else {
        QuotePrompt::new(io::stdin().lock(), io::stdout()).collect()?
    };

    if quotes.is_empty() {
        warn!("No quotes collected, sending an empty batch");
    }
    info!("Quotes: {:?}", quotes);

    let server_address = addr(&args.server_ip, args.port);
    let mut stream = BatchSender::connect(&server_address)?;
    BatchSender::send_batch(&mut stream, &quotes)?;
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_paths_are_unwrapped() {
        assert_eq!(normalize_path("  \"C:\\q.txt\" "), PathBuf::from("C:\\q.txt"));
        assert_eq!(normalize_path("quotes.txt"), PathBuf::from("quotes.txt"));
    }
}
