//! Shared networking constants and helpers used by receiver and sender.

/// TCP port the receiver listens on for quote batches.
pub const DEFAULT_PORT: u16 = 9000;
/// Address the receiver binds to by default.
pub const DEFAULT_LISTEN_IP: &str = "0.0.0.0";
/// Address the sender connects to by default.
pub const DEFAULT_SERVER_IP: &str = "127.0.0.1";

/// Helper to format an IPv4 address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
