//! Interactive collection of quotes from an operator.
//!
//! Input is read as whitespace-separated tokens, so answers may be typed one per line
//! or several on one line. Tickers longer than 7 characters are truncated to fit the
//! wire slot.
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::str::FromStr;

use log::warn;
use stock_common::ticker::MAX_TICKER_LEN;
use stock_common::{Quote, Result, StockError, TickerSymbol};

/// Asks for a quote count and then for every quote's fields.
pub struct QuotePrompt<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> QuotePrompt<R, W> {
    /// Creates a prompt reading answers from `input` and writing questions to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// Runs the whole dialogue.
    pub fn collect(&mut self) -> Result<Vec<Quote>> {
        let count: u32 = self.ask("Enter number of stocks: ")?;
        let mut quotes = Vec::new();

        for i in 0..count {
            writeln!(self.output, "Stock {}:", i + 1)?;
            let ticker: String = self.ask("  Ticker (max 7 chars): ")?;
            if ticker.len() > MAX_TICKER_LEN {
                warn!("Ticker {} truncated to {} bytes", ticker, MAX_TICKER_LEN);
            }
            let price = self.ask("  Current price: ")?;
            let high_52wk = self.ask("  52-week high: ")?;
            let low_52wk = self.ask("  52-week low: ")?;

            quotes.push(Quote {
                ticker: TickerSymbol::truncating(&ticker),
                price,
                high_52wk,
                low_52wk,
            });
        }
        Ok(quotes)
    }

    fn ask<T>(&mut self, question: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        let token = self.next_token()?;
        token
            .parse()
            .map_err(|e| StockError::Format(format!("invalid answer {:?}: {}", token, e)))
    }

    fn next_token(&mut self) -> Result<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(StockError::Format("unexpected end of input".to_string()));
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}
