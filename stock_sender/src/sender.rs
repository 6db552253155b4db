//! Sending quote batches to the receiver over TCP.
//!
//! The whole batch is encoded up front and written in one `write_all`, so the
//! receiver sees one contiguous frame per call.
use std::io::Write;
use std::net::TcpStream;

use log::{error, info};
use stock_common::wire::encode_batch;
use stock_common::{Quote, Result};

/// Helper type for sending batches to the receiver.
pub struct BatchSender;

impl BatchSender {
    /// Opens a TCP session to `server_addr` ("ip:port").
    pub fn connect(server_addr: &str) -> Result<TcpStream> {
        info!("Connecting to receiver at {}", server_addr);
        let stream = TcpStream::connect(server_addr).inspect_err(|e| {
            error!("Failed to connect to {}: {}", server_addr, e);
        })?;
        Ok(stream)
    }

    /// Encodes `quotes` as one frame and writes it to `stream`.
    /// Returns the number of bytes sent.
    pub fn send_batch<W: Write>(stream: &mut W, quotes: &[Quote]) -> Result<usize> {
        let packet = encode_batch(quotes)?;
        stream.write_all(&packet)?;
        stream.flush()?;
        info!("Packet sent ({} bytes, {} quotes)", packet.len(), quotes.len());
        Ok(packet.len())
    }
}
