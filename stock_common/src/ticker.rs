//! Ticker symbols stored in the fixed 8-byte slot used on the wire.
//!
//! A `TickerSymbol` always keeps the bytes after its first zero byte zeroed, so two
//! symbols compare equal exactly when their significant bytes match. Comparison is
//! byte-wise and case-sensitive.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StockError;

/// Width of the ticker slot in a quote record.
pub const TICKER_SLOT: usize = 8;
/// Longest ticker an encoder writes; the last slot byte stays zero.
pub const MAX_TICKER_LEN: usize = TICKER_SLOT - 1;

/// Ticker symbol held in a zero-padded fixed-size slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerSymbol([u8; TICKER_SLOT]);

impl TickerSymbol {
    /// Builds a symbol the way the sender fills its slot: zero the slot, then copy
    /// at most `MAX_TICKER_LEN` bytes of `text`.
    pub fn truncating(text: &str) -> Self {
        let mut slot = [0u8; TICKER_SLOT];
        let bytes = text.as_bytes();
        let len = bytes.len().min(MAX_TICKER_LEN);
        slot[..len].copy_from_slice(&bytes[..len]);
        Self::from_slot(slot)
    }

    /// Wraps a raw slot read from the wire. Anything after the first zero byte is
    /// dropped; a slot with no zero byte keeps all eight bytes.
    pub fn from_slot(mut slot: [u8; TICKER_SLOT]) -> Self {
        if let Some(end) = slot.iter().position(|&b| b == 0) {
            slot[end..].fill(0);
        }
        Self(slot)
    }

    /// Raw slot as written on the wire.
    pub fn to_slot(&self) -> [u8; TICKER_SLOT] {
        self.0
    }

    /// Significant bytes, up to the first zero byte or the end of the slot.
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(TICKER_SLOT);
        &self.0[..end]
    }
}

impl FromStr for TickerSymbol {
    type Err = StockError;

    /// Strict parse used for configuration input: 1 to 7 bytes, no whitespace,
    /// commas or NUL bytes. Unlike [`TickerSymbol::truncating`] nothing is cut off.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(StockError::InvalidTicker("empty ticker".to_string()));
        }
        if s.len() > MAX_TICKER_LEN {
            return Err(StockError::InvalidTicker(format!(
                "{:?} is longer than {} bytes",
                s, MAX_TICKER_LEN
            )));
        }
        if s.chars().any(|c| c == '\0' || c == ',' || c.is_whitespace()) {
            return Err(StockError::InvalidTicker(format!(
                "{:?} contains a separator",
                s
            )));
        }
        Ok(Self::truncating(s))
    }
}

impl TryFrom<String> for TickerSymbol {
    type Error = StockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TickerSymbol> for String {
    fn from(value: TickerSymbol) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Debug for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TickerSymbol({:?})", self.to_string())
    }
}
