//! Quote records and the batch that carries them.
//!
//! A `Quote` is the fixed-size unit sent by the sender: a ticker plus the current price and
//! the 52-week high/low, all as 32-bit floats. A `Batch` is the fully received, in-memory
//! form of one count-prefixed frame. This module also provides a line-oriented parser used
//! by the sender to load quotes from a text file.
use std::io::BufRead;

use crate::error::StockError;
use crate::ticker::TickerSymbol;

/// Market snapshot for a single ticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// Ticker symbol.
    pub ticker: TickerSymbol,
    /// Current price.
    pub price: f32,
    /// 52-week high.
    pub high_52wk: f32,
    /// 52-week low.
    pub low_52wk: f32,
}

impl Quote {
    /// Creates a quote, truncating `ticker` to the wire slot.
    pub fn new(ticker: &str, price: f32, high_52wk: f32, low_52wk: f32) -> Self {
        Quote {
            ticker: TickerSymbol::truncating(ticker),
            price,
            high_52wk,
            low_52wk,
        }
    }
}

/// All quotes of one frame, exposed only once every record has arrived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    quotes: Vec<Quote>,
}

impl Batch {
    /// Wraps already decoded quotes.
    pub fn new(quotes: Vec<Quote>) -> Self {
        Batch { quotes }
    }

    /// Quotes in the order they appeared on the wire.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns `true` for a zero-count batch.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Quote;
    type IntoIter = std::slice::Iter<'a, Quote>;

    fn into_iter(self) -> Self::IntoIter {
        self.quotes.iter()
    }
}

/// Trait providing file parsing for quotes.
pub trait QuoteParser {
    /// Parses quotes from a buffered reader.
    ///
    /// Each non-empty line that does not start with `#` must hold four fields,
    /// `TICKER PRICE HIGH LOW`, separated by whitespace and/or commas.
    /// Returns an error naming the first line that cannot be parsed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Quote>, StockError>;
}

impl QuoteParser for Quote {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, StockError> {
        let mut quotes = Vec::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(StockError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            let quote = parse_line(trimmed_line).map_err(|reason| {
                StockError::ParseQuotesFile(format!("line {}: {}", index + 1, reason))
            })?;
            quotes.push(quote);
        }
        Ok(quotes)
    }
}

fn parse_line(line: &str) -> Result<Quote, String> {
    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();
    let &[ticker, price, high, low] = fields.as_slice() else {
        return Err(format!("expected 4 fields, found {}", fields.len()));
    };

    let ticker = ticker
        .parse::<TickerSymbol>()
        .map_err(|e| e.to_string())?;
    let number = |name: &str, raw: &str| {
        raw.parse::<f32>()
            .map_err(|e| format!("invalid {} {:?}: {}", name, raw, e))
    };

    Ok(Quote {
        ticker,
        price: number("price", price)?,
        high_52wk: number("52-week high", high)?,
        low_52wk: number("52-week low", low)?,
    })
}
