//! Read-only portfolio of holdings, keyed by ticker.
//!
//! The portfolio is built once before the first batch is accepted and then shared
//! immutably with every worker, so lookups need no locking. Holdings come either from
//! the built-in table or from a JSON file:
//!
//! ```json
//! [
//!   { "ticker": "AAPL", "quantity": 100, "stop_loss": 90.0 }
//! ]
//! ```
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use stock_common::{Result, StockError, TickerSymbol};

/// A position the user holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol.
    pub ticker: TickerSymbol,
    /// Number of shares owned.
    pub quantity: u32,
    /// Sell if the price falls below this.
    pub stop_loss: f32,
}

impl Holding {
    /// Creates a holding; `ticker` is truncated to the wire slot.
    pub fn new(ticker: &str, quantity: u32, stop_loss: f32) -> Self {
        Holding {
            ticker: TickerSymbol::truncating(ticker),
            quantity,
            stop_loss,
        }
    }
}

/// Mapping from ticker to holding. Exact, case-sensitive matches only.
#[derive(Debug, Clone, Default)]
pub struct Portfolio {
    holdings: HashMap<TickerSymbol, Holding>,
}

impl Portfolio {
    /// Builds a portfolio, rejecting a ticker that appears twice.
    pub fn from_holdings<I>(holdings: I) -> Result<Self>
    where
        I: IntoIterator<Item = Holding>,
    {
        let mut map = HashMap::new();
        for holding in holdings {
            if map.contains_key(&holding.ticker) {
                return Err(StockError::DuplicateHolding(holding.ticker.to_string()));
            }
            map.insert(holding.ticker, holding);
        }
        Ok(Portfolio { holdings: map })
    }

    /// Parses a JSON array of holdings.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let holdings: Vec<Holding> = serde_json::from_reader(reader)?;
        Self::from_holdings(holdings)
    }

    /// Loads a JSON portfolio file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let portfolio = Self::from_json_reader(BufReader::new(file))?;
        info!(
            "Loaded {} holdings from {}",
            portfolio.len(),
            path.display()
        );
        Ok(portfolio)
    }

    /// The built-in table used when no file is supplied.
    pub fn builtin() -> Self {
        let holdings = [
            Holding::new("AAPL", 100, 90.0),
            Holding::new("GOOG", 50, 110.0),
            Holding::new("ANET", 30, 70.0),
        ];
        Portfolio {
            holdings: holdings.into_iter().map(|h| (h.ticker, h)).collect(),
        }
    }

    /// Finds the holding for `ticker`.
    pub fn lookup(&self, ticker: &TickerSymbol) -> Option<&Holding> {
        self.holdings.get(ticker)
    }

    /// Number of holdings.
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    /// Returns `true` if the portfolio holds nothing.
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}
