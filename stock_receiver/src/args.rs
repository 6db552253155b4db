//! Command-line arguments for the stock receiver.
use std::path::PathBuf;

use clap::Parser;
use stock_common::frame::MAX_BATCH_COUNT;
use stock_common::net::{DEFAULT_LISTEN_IP, DEFAULT_PORT};
use stock_receiver::OutputFormat;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Local IP address to listen on.
    #[clap(long, default_value = DEFAULT_LISTEN_IP)]
    pub listen_ip: String,

    /// TCP port to listen on.
    #[clap(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// JSON file with holdings; the built-in table is used when omitted.
    #[clap(long)]
    pub portfolio: Option<PathBuf>,

    /// Largest number of quotes a single batch may declare.
    #[clap(long, default_value_t = MAX_BATCH_COUNT)]
    pub max_batch: u32,

    /// Number of sessions to serve before exiting; 0 serves forever.
    #[clap(long, default_value_t = 1)]
    pub sessions: usize,

    /// Report rendering.
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Args {
    /// Session limit, `None` meaning no limit.
    pub fn session_limit(&self) -> Option<usize> {
        (self.sessions != 0).then_some(self.sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_single_session_on_port_9000() {
        let args = Args::try_parse_from(["stock_receiver"]).unwrap();
        assert_eq!(args.listen_ip, "0.0.0.0");
        assert_eq!(args.port, 9000);
        assert_eq!(args.max_batch, MAX_BATCH_COUNT);
        assert_eq!(args.session_limit(), Some(1));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.portfolio.is_none());
    }

    #[test]
    fn zero_sessions_means_forever() {
        let args =
            Args::try_parse_from(["stock_receiver", "--sessions", "0", "--format", "json"]).unwrap();
        assert_eq!(args.session_limit(), None);
        assert_eq!(args.format, OutputFormat::Json);
    }
}
