//! Per-quote reports and the sinks that print them.
//!
//! A report is always handed to a sink as one value and written with a single
//! `write_all`, so lines of two reports can never interleave.
use std::fmt;
use std::io::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use stock_common::{Quote, Result, TickerSymbol};

use crate::decision::{Evaluation, Recommendation};
use crate::portfolio::Holding;

/// Full analysis of a held ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Ticker symbol.
    pub ticker: TickerSymbol,
    /// Shares held.
    pub quantity: u32,
    /// Current price.
    pub price: f32,
    /// 52-week high.
    pub high_52wk: f32,
    /// 52-week low.
    pub low_52wk: f32,
    /// Stop-loss from the holding.
    pub stop_loss: f32,
    /// Chosen action.
    pub recommendation: Recommendation,
    /// Time spent deciding, in nanoseconds.
    pub latency_ns: u64,
}

impl AnalysisReport {
    /// Collects the fields of a finished evaluation.
    pub fn new(quote: &Quote, holding: &Holding, evaluation: &Evaluation) -> Self {
        AnalysisReport {
            ticker: quote.ticker,
            quantity: holding.quantity,
            price: quote.price,
            high_52wk: quote.high_52wk,
            low_52wk: quote.low_52wk,
            stop_loss: holding.stop_loss,
            recommendation: evaluation.recommendation,
            latency_ns: u64::try_from(evaluation.elapsed.as_nanos()).unwrap_or(u64::MAX),
        }
    }
}

/// One entry written to the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    /// The ticker is held and was analysed.
    Analysis(AnalysisReport),
    /// The ticker is not in the portfolio and was ignored.
    Unmanaged {
        /// Ticker symbol.
        ticker: TickerSymbol,
    },
}

impl Report {
    /// Ticker the report refers to.
    pub fn ticker(&self) -> TickerSymbol {
        match self {
            Report::Analysis(analysis) => analysis.ticker,
            Report::Unmanaged { ticker } => *ticker,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Analysis(a) => {
                writeln!(f)?;
                writeln!(f, "Stock: {} (You own {} shares)", a.ticker, a.quantity)?;
                writeln!(f, "  Price:       {}", a.price)?;
                writeln!(f, "  52W High:    {}", a.high_52wk)?;
                writeln!(f, "  52W Low:     {}", a.low_52wk)?;
                writeln!(f, "  Stop Loss:   {}", a.stop_loss)?;
                writeln!(
                    f,
                    "  Action:      {} [{}]",
                    a.recommendation.description(),
                    a.recommendation
                )?;
                writeln!(f, "  [Latency]:   {} μs", a.latency_ns / 1_000)
            }
            Report::Unmanaged { ticker } => {
                writeln!(f)?;
                writeln!(f, "Stock: {} is not in your portfolio - Ignored.", ticker)
            }
        }
    }
}

/// How a [`ConsoleSink`] renders reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Multi-line human-readable blocks.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Destination for reports. Only the dispatcher's consumer thread writes to it.
pub trait ReportSink {
    /// Writes one complete report.
    fn write_report(&mut self, report: &Report) -> Result<()>;
}

impl ReportSink for Vec<Report> {
    fn write_report(&mut self, report: &Report) -> Result<()> {
        self.push(report.clone());
        Ok(())
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn write_report(&mut self, report: &Report) -> Result<()> {
        (**self).write_report(report)
    }
}

/// Writes reports to any `Write`, typically stdout.
pub struct ConsoleSink<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ConsoleSink<W> {
    /// Creates a sink rendering in `format`.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn write_report(&mut self, report: &Report) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Text => report.to_string(),
            OutputFormat::Json => {
                let mut line = serde_json::to_string(report)?;
                line.push('\n');
                line
            }
        };
        self.out.write_all(rendered.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
