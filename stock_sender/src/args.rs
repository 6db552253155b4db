//! Command-line arguments for the stock sender.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use stock_common::net::{DEFAULT_PORT, DEFAULT_SERVER_IP};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Receiver IP address (IPv4 or IPv6).
    #[clap(long, default_value = DEFAULT_SERVER_IP)]
    pub server_ip: String,

    /// Receiver TCP port.
    #[clap(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path to a text file with one `TICKER PRICE HIGH LOW` quote per line.
    /// Without `--path` or `--random` quotes are read interactively.
    #[clap(long, conflicts_with = "random")]
    pub path: Option<String>,

    /// Send this many synthetic quotes instead of asking for them.
    #[clap(long)]
    pub random: Option<usize>,

    /// Tickers cycled through by `--random`.
    #[clap(long, value_delimiter = ',', default_values = ["AAPL", "GOOG", "ANET", "MSFT"])]
    pub tickers: Vec<String>,
}
