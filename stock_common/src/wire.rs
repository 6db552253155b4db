//! Binary wire format for quote batches.
//!
//! ```text
//! [ u32 count ][ record 0 ][ record 1 ] ... [ record count-1 ]
//! record = [ 8-byte ticker, zero padded ][ f32 price ][ f32 high_52wk ][ f32 low_52wk ]
//! ```
//!
//! - All integers and floats are little-endian.
//! - Floats are raw IEEE-754 bit patterns, so values (NaN payloads included) survive
//!   a round trip bit for bit.
//! - Records are 20 bytes and packed back to back with no padding.
//!
//! Every function here is pure; reading from a socket lives in [`crate::frame`].
use crate::error::StockError;
use crate::quote::{Batch, Quote};
use crate::result::Result;
use crate::ticker::{TICKER_SLOT, TickerSymbol};

/// Size of the count prefix.
pub const HEADER_SIZE: usize = 4;
/// Size of one encoded quote record.
pub const RECORD_SIZE: usize = TICKER_SLOT + 3 * 4;

const PRICE_OFFSET: usize = TICKER_SLOT;
const HIGH_OFFSET: usize = PRICE_OFFSET + 4;
const LOW_OFFSET: usize = HIGH_OFFSET + 4;

/// Encodes the count prefix.
pub fn encode_header(count: u32) -> [u8; HEADER_SIZE] {
    count.to_le_bytes()
}

/// Appends one quote record to `out`.
pub fn encode_quote_into(quote: &Quote, out: &mut Vec<u8>) {
    out.extend_from_slice(&quote.ticker.to_slot());
    out.extend_from_slice(&quote.price.to_le_bytes());
    out.extend_from_slice(&quote.high_52wk.to_le_bytes());
    out.extend_from_slice(&quote.low_52wk.to_le_bytes());
}

/// Encodes a full frame: the count prefix followed by every quote record.
pub fn encode_batch(quotes: &[Quote]) -> Result<Vec<u8>> {
    let count = u32::try_from(quotes.len()).map_err(|_| {
        StockError::Format(format!("{} quotes do not fit a u32 count", quotes.len()))
    })?;
    let mut out = Vec::with_capacity(frame_len(count));
    out.extend_from_slice(&encode_header(count));
    for quote in quotes {
        encode_quote_into(quote, &mut out);
    }
    Ok(out)
}

/// Total encoded size of a frame holding `count` records.
pub fn frame_len(count: u32) -> usize {
    HEADER_SIZE + body_len(count)
}

/// Encoded size of `count` records, excluding the header.
pub fn body_len(count: u32) -> usize {
    count as usize * RECORD_SIZE
}

/// Decodes the count prefix from the start of `bytes`.
pub fn decode_header(bytes: &[u8]) -> Result<u32> {
    let raw = take::<HEADER_SIZE>(bytes, 0)?;
    Ok(u32::from_le_bytes(raw))
}

/// Decodes the quote record starting at `offset`.
pub fn decode_quote(bytes: &[u8], offset: usize) -> Result<Quote> {
    let record = bounds(bytes, offset, RECORD_SIZE)?;
    Ok(Quote {
        ticker: TickerSymbol::from_slot(take::<TICKER_SLOT>(record, 0)?),
        price: f32::from_le_bytes(take::<4>(record, PRICE_OFFSET)?),
        high_52wk: f32::from_le_bytes(take::<4>(record, HIGH_OFFSET)?),
        low_52wk: f32::from_le_bytes(take::<4>(record, LOW_OFFSET)?),
    })
}

/// Decodes `count` consecutive records from a body buffer.
///
/// The buffer must hold exactly `count` records; any shortfall or surplus is
/// reported as `MalformedRecord`.
pub fn decode_body(body: &[u8], count: u32) -> Result<Batch> {
    let expected = body_len(count);
    if body.len() != expected {
        return Err(StockError::MalformedRecord {
            offset: 0,
            needed: expected,
            available: body.len(),
        });
    }
    let quotes = (0..count as usize)
        .map(|i| decode_quote(body, i * RECORD_SIZE))
        .collect::<Result<Vec<_>>>()?;
    Ok(Batch::new(quotes))
}

/// Decodes a complete frame held in memory.
pub fn decode_batch(bytes: &[u8]) -> Result<Batch> {
    let count = decode_header(bytes)?;
    decode_body(&bytes[HEADER_SIZE..], count)
}

fn bounds(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(StockError::MalformedRecord {
            offset,
            needed: len,
            available: bytes.len().saturating_sub(offset),
        })
}

fn take<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N]> {
    let slice = bounds(bytes, offset, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    Ok(out)
}
