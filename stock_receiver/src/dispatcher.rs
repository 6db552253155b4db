//! Fans a batch out to one worker per held quote and serializes their reports.
//!
//! Concurrency model:
//! - Every quote whose ticker is in the portfolio gets its own scoped thread that runs
//!   the [`Evaluator`] and sends a complete [`Report`] over a `crossbeam_channel`.
//! - Unmanaged tickers are reported by the scanning thread itself, in scan order.
//! - The calling thread is the only consumer of the channel and the only writer to the
//!   sink, so each report lands as one unit. Reports of different workers arrive in
//!   whatever order the workers finish.
//! - `process_batch` returns only after the channel is drained and every worker joined.
//!
//! The batch and the portfolio are borrowed read-only by all workers; nothing is locked.
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Utc};
use crossbeam_channel::{Sender, unbounded};
use log::{debug, error};
use stock_common::{Batch, Result, StockError};
use strum::IntoEnumIterator;

use crate::decision::{Evaluator, Recommendation, ThresholdEvaluator};
use crate::portfolio::Portfolio;
use crate::report::{AnalysisReport, Report, ReportSink};

/// Counts gathered while processing one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    /// When processing of the batch started.
    pub received_at: DateTime<Utc>,
    /// Quotes in the batch.
    pub quotes: usize,
    /// Quotes that matched a holding and were analysed.
    pub analyzed: usize,
    /// Quotes for tickers outside the portfolio.
    pub unmanaged: usize,
    tally: HashMap<Recommendation, usize>,
}

impl BatchSummary {
    fn new(quotes: usize) -> Self {
        BatchSummary {
            received_at: Utc::now(),
            quotes,
            analyzed: 0,
            unmanaged: 0,
            tally: HashMap::new(),
        }
    }

    fn record(&mut self, recommendation: Recommendation) {
        self.analyzed += 1;
        *self.tally.entry(recommendation).or_default() += 1;
    }

    /// How many analysed quotes ended with `recommendation`.
    pub fn count(&self, recommendation: Recommendation) -> usize {
        self.tally.get(&recommendation).copied().unwrap_or(0)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "batch received at {}: {} quotes, {} analysed (",
            self.received_at.to_rfc3339(),
            self.quotes,
            self.analyzed
        )?;
        for (i, recommendation) in Recommendation::iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", recommendation, self.count(recommendation))?;
        }
        write!(f, "), {} unmanaged", self.unmanaged)
    }
}

/// Evaluates batches against a fixed portfolio.
pub struct Dispatcher<E = ThresholdEvaluator> {
    portfolio: Arc<Portfolio>,
    evaluator: E,
}

impl Dispatcher {
    /// Dispatcher using the threshold rules.
    pub fn new(portfolio: Arc<Portfolio>) -> Self {
        Self::with_evaluator(portfolio, ThresholdEvaluator)
    }
}

impl<E: Evaluator> Dispatcher<E> {
    /// Dispatcher using a custom evaluator.
    pub fn with_evaluator(portfolio: Arc<Portfolio>, evaluator: E) -> Self {
        Dispatcher {
            portfolio,
            evaluator,
        }
    }

    /// Processes every quote of `batch`, writing one report per quote to `sink`.
    ///
    /// On error the remaining workers are still joined before returning; the first
    /// error wins.
    pub fn process_batch<S>(&self, batch: &Batch, sink: &mut S) -> Result<BatchSummary>
    where
        S: ReportSink + ?Sized,
    {
        let mut summary = BatchSummary::new(batch.len());
        let (tx, rx) = unbounded::<Report>();

        thread::scope(|scope| {
            let mut outcome: Result<()> = Ok(());
            let mut workers = Vec::new();

            for quote in batch {
                let Some(holding) = self.portfolio.lookup(&quote.ticker) else {
                    debug!("{} is not held, skipping analysis", quote.ticker);
                    summary.unmanaged += 1;
                    if let Err(e) = send(&tx, Report::Unmanaged { ticker: quote.ticker }) {
                        outcome = Err(e);
                        break;
                    }
                    continue;
                };

                let worker_tx = tx.clone();
                let evaluator = &self.evaluator;
                let spawned = thread::Builder::new()
                    .name(format!("analyze-{}", quote.ticker))
                    .spawn_scoped(scope, move || -> Result<Recommendation> {
                        let evaluation = evaluator.evaluate(quote, holding);
                        let report = AnalysisReport::new(quote, holding, &evaluation);
                        send(&worker_tx, Report::Analysis(report))?;
                        Ok(evaluation.recommendation)
                    });
                match spawned {
                    Ok(worker) => workers.push(worker),
                    Err(e) => {
                        error!("Failed to spawn worker for {}: {}", quote.ticker, e);
                        outcome = Err(e.into());
                        break;
                    }
                }
            }
            drop(tx);

            if outcome.is_ok() {
                outcome = rx.iter().try_for_each(|report| sink.write_report(&report));
            }

            for worker in workers {
                let joined = match worker.join() {
                    Ok(result) => result,
                    Err(panic) => Err(StockError::WorkerPanicked(panic_message(panic.as_ref()))),
                };
                match joined {
                    Ok(recommendation) => summary.record(recommendation),
                    Err(e) => {
                        if outcome.is_ok() {
                            outcome = Err(e);
                        }
                    }
                }
            }
            outcome
        })?;

        Ok(summary)
    }
}

fn send(tx: &Sender<Report>, report: Report) -> Result<()> {
    tx.send(report)
        .map_err(|e| StockError::ChannelSend(format!("report for {}", e.into_inner().ticker())))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{Evaluation, evaluate};
    use crate::portfolio::Holding;
    use crate::report::{ConsoleSink, OutputFormat};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stock_common::{Quote, TickerSymbol};

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl Evaluator for Counting {
        fn evaluate(&self, quote: &Quote, holding: &Holding) -> Evaluation {
            self.0.fetch_add(1, Ordering::SeqCst);
            evaluate(quote, holding)
        }
    }

    struct Exploding;

    impl Evaluator for Exploding {
        fn evaluate(&self, quote: &Quote, _holding: &Holding) -> Evaluation {
            panic!("cannot evaluate {}", quote.ticker);
        }
    }

    struct FailingSink;

    impl ReportSink for FailingSink {
        fn write_report(&mut self, _report: &Report) -> Result<()> {
            Err(StockError::Format("sink closed".into()))
        }
    }

    fn wide_portfolio(n: usize) -> Arc<Portfolio> {
        let holdings = (0..n).map(|i| Holding::new(&format!("T{i}"), i as u32 + 1, 50.0));
        Arc::new(Portfolio::from_holdings(holdings).unwrap())
    }

    #[test]
    fn unmanaged_ticker_is_reported_without_evaluation() {
        let dispatcher = Dispatcher::with_evaluator(Arc::new(Portfolio::builtin()), Counting::default());
        let batch = Batch::new(vec![Quote::new("ZZZZ", 10.0, 20.0, 5.0)]);
        let mut sink: Vec<Report> = Vec::new();

        let summary = dispatcher.process_batch(&batch, &mut sink).unwrap();

        assert_eq!(
            sink,
            vec![Report::Unmanaged {
                ticker: TickerSymbol::truncating("ZZZZ")
            }]
        );
        assert_eq!(dispatcher.evaluator.0.load(Ordering::SeqCst), 0);
        assert_eq!(summary.unmanaged, 1);
        assert_eq!(summary.analyzed, 0);
    }

    #[test]
    fn every_held_quote_is_reported_before_return() {
        let n = 64;
        let dispatcher = Dispatcher::with_evaluator(wide_portfolio(n), Counting::default());
        let quotes = (0..n).map(|i| Quote::new(&format!("T{i}"), 100.0, 105.0, 60.0)).collect();
        let mut sink: Vec<Report> = Vec::new();

        let summary = dispatcher.process_batch(&Batch::new(quotes), &mut sink).unwrap();

        assert_eq!(sink.len(), n);
        assert_eq!(dispatcher.evaluator.0.load(Ordering::SeqCst), n);
        let tickers: HashSet<String> = sink.iter().map(|r| r.ticker().to_string()).collect();
        assert_eq!(tickers.len(), n);
        assert!(sink.iter().all(|r| matches!(r, Report::Analysis(a) if a.recommendation == Recommendation::Hold)));
        assert_eq!(summary.analyzed, n);
        assert_eq!(summary.count(Recommendation::Hold), n);
    }

    #[test]
    fn text_reports_never_interleave() {
        let n = 32;
        let dispatcher = Dispatcher::new(wide_portfolio(n));
        let quotes = (0..n).map(|i| Quote::new(&format!("T{i}"), 40.0, 100.0, 30.0)).collect();
        let mut sink = ConsoleSink::new(Vec::new(), OutputFormat::Text);

        dispatcher.process_batch(&Batch::new(quotes), &mut sink).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), n * 7);
        for block in lines.chunks(7) {
            assert!(block[0].starts_with("Stock: T"), "{block:?}");
            assert!(block[1].starts_with("  Price:"));
            assert!(block[2].starts_with("  52W High:"));
            assert!(block[3].starts_with("  52W Low:"));
            assert!(block[4].starts_with("  Stop Loss:"));
            assert!(block[5].starts_with("  Action:      SELL (Below stop-loss)"));
            assert!(block[6].starts_with("  [Latency]:"));
        }
    }

    #[test]
    fn unmanaged_reports_keep_scan_order() {
        let dispatcher = Dispatcher::new(Arc::new(Portfolio::builtin()));
        let batch = Batch::new(vec![
            Quote::new("ZZZZ", 1.0, 1.0, 1.0),
            Quote::new("AAPL", 85.0, 100.0, 100.0),
            Quote::new("YYYY", 1.0, 1.0, 1.0),
            Quote::new("GOOG", 120.0, 150.0, 100.0),
            Quote::new("XXXX", 1.0, 1.0, 1.0),
        ]);
        let mut sink: Vec<Report> = Vec::new();

        let summary = dispatcher.process_batch(&batch, &mut sink).unwrap();

        let unmanaged: Vec<String> = sink
            .iter()
            .filter(|r| matches!(r, Report::Unmanaged { .. }))
            .map(|r| r.ticker().to_string())
            .collect();
        assert_eq!(unmanaged, ["ZZZZ", "YYYY", "XXXX"]);
        assert_eq!(sink.len(), 5);
        assert_eq!(summary.count(Recommendation::SellStopLoss), 1);
        assert_eq!(summary.count(Recommendation::SellDropFromHigh), 1);
        assert_eq!(summary.unmanaged, 3);
    }

    #[test]
    fn empty_batch_produces_nothing() {
        let dispatcher = Dispatcher::new(Arc::new(Portfolio::builtin()));
        let mut sink: Vec<Report> = Vec::new();
        let summary = dispatcher.process_batch(&Batch::default(), &mut sink).unwrap();
        assert!(sink.is_empty());
        assert_eq!(summary.quotes, 0);
    }

    #[test]
    fn worker_panic_is_surfaced() {
        let dispatcher = Dispatcher::with_evaluator(Arc::new(Portfolio::builtin()), Exploding);
        let batch = Batch::new(vec![Quote::new("AAPL", 1.0, 1.0, 1.0)]);
        let err = dispatcher.process_batch(&batch, &mut Vec::<Report>::new()).unwrap_err();
        match err {
            StockError::WorkerPanicked(msg) => assert_eq!(msg, "cannot evaluate AAPL"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn sink_failure_is_returned_after_workers_finish() {
        let dispatcher = Dispatcher::new(Arc::new(Portfolio::builtin()));
        let batch = Batch::new(vec![
            Quote::new("AAPL", 1.0, 1.0, 1.0),
            Quote::new("GOOG", 1.0, 1.0, 1.0),
        ]);
        let err = dispatcher.process_batch(&batch, &mut FailingSink).unwrap_err();
        assert!(matches!(err, StockError::Format(_)));
    }

    #[test]
    fn summary_display_lists_all_labels() {
        let dispatcher = Dispatcher::new(Arc::new(Portfolio::builtin()));
        let batch = Batch::new(vec![Quote::new("ANET", 200.0, 210.0, 100.0)]);
        let summary = dispatcher.process_batch(&batch, &mut Vec::<Report>::new()).unwrap();
        let text = summary.to_string();
        assert!(text.contains("1 quotes, 1 analysed"));
        assert!(text.contains("SELL_STOP_LOSS=0, SELL_DROP_FROM_HIGH=0, BUY_NEAR_LOW=0, HOLD=1"));
        assert!(text.ends_with("0 unmanaged"));
    }
}
