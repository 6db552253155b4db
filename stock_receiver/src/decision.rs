//! Per-quote trade recommendation.
//!
//! Rules are checked in priority order and the first match wins:
//!
//! 1. `price < stop_loss` — sell, the holder's risk limit was hit.
//! 2. `price < high_52wk * 0.90` — sell, more than 10% below the 52-week high.
//! 3. `price <= low_52wk * 1.05` — buy, within 5% of the 52-week low.
//! 4. otherwise hold.
//!
//! All arithmetic is `f32`. NaN inputs are not special-cased: every comparison with NaN is
//! false, so they fall through to `Hold` unless an earlier rule matched.
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use stock_common::Quote;
use strum_macros::{Display, EnumIter, EnumString};

use crate::portfolio::Holding;

/// A price this far below the 52-week high triggers a sell.
pub const DROP_FROM_HIGH_FACTOR: f32 = 0.90;
/// A price within this factor of the 52-week low triggers a buy.
pub const NEAR_LOW_FACTOR: f32 = 1.05;

/// Outcome of evaluating one quote against its holding.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// Price is below the holder's stop-loss.
    SellStopLoss,
    /// Price dropped more than 10% from the 52-week high.
    SellDropFromHigh,
    /// Price is near the 52-week low.
    BuyNearLow,
    /// None of the above.
    Hold,
}

impl Recommendation {
    /// Human-readable action shown in console reports.
    pub fn description(&self) -> &'static str {
        match self {
            Recommendation::SellStopLoss => "SELL (Below stop-loss)",
            Recommendation::SellDropFromHigh => "SELL (Drop >10% from high)",
            Recommendation::BuyNearLow => "BUY (Near 52W low)",
            Recommendation::Hold => "HOLD",
        }
    }
}

/// Recommendation plus the time spent computing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Chosen action.
    pub recommendation: Recommendation,
    /// Time spent in the decision itself, excluding any I/O.
    pub elapsed: Duration,
}

/// Turns a quote and its holding into an [`Evaluation`].
///
/// Implementations must be callable from many worker threads at once.
pub trait Evaluator: Sync {
    /// Evaluates `quote` against `holding`.
    fn evaluate(&self, quote: &Quote, holding: &Holding) -> Evaluation;
}

/// Fixed-threshold rules described in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEvaluator;

impl Evaluator for ThresholdEvaluator {
    fn evaluate(&self, quote: &Quote, holding: &Holding) -> Evaluation {
        evaluate(quote, holding)
    }
}

/// Evaluates `quote` against `holding`, timing only the decision.
pub fn evaluate(quote: &Quote, holding: &Holding) -> Evaluation {
    let start = Instant::now();
    let recommendation = recommend(
        quote.price,
        quote.high_52wk,
        quote.low_52wk,
        holding.stop_loss,
    );
    Evaluation {
        recommendation,
        elapsed: start.elapsed(),
    }
}

/// Applies the priority chain to raw values.
pub fn recommend(price: f32, high_52wk: f32, low_52wk: f32, stop_loss: f32) -> Recommendation {
    if price < stop_loss {
        Recommendation::SellStopLoss
    } else if price < high_52wk * DROP_FROM_HIGH_FACTOR {
        Recommendation::SellDropFromHigh
    } else if price <= low_52wk * NEAR_LOW_FACTOR {
        Recommendation::BuyNearLow
    } else {
        Recommendation::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn stop_loss_beats_drop_from_high() {
        // 85 < 90 stop-loss, and also 85 < 100 * 0.90
        assert_eq!(recommend(85.0, 100.0, 100.0, 90.0), Recommendation::SellStopLoss);
    }

    #[test]
    fn drop_from_high_when_above_stop_loss() {
        // 95 >= 90 stop-loss, 95 < 110 * 0.90 = 99
        assert_eq!(recommend(95.0, 110.0, 100.0, 90.0), Recommendation::SellDropFromHigh);
    }

    #[test]
    fn drop_from_high_beats_near_low() {
        // 95 <= 100 * 1.05 would be a buy, but the drop rule comes first
        assert_eq!(recommend(95.0, 110.0, 100.0, 0.0), Recommendation::SellDropFromHigh);
    }

    #[test]
    fn buy_near_low_and_hold() {
        assert_eq!(recommend(104.0, 100.0, 100.0, 90.0), Recommendation::BuyNearLow);
        assert_eq!(recommend(106.0, 100.0, 100.0, 90.0), Recommendation::Hold);
    }

    #[test]
    fn nan_price_falls_through_to_hold() {
        assert_eq!(recommend(f32::NAN, 100.0, 100.0, 90.0), Recommendation::Hold);
    }

    #[test]
    fn nan_threshold_only_disables_its_own_rule() {
        assert_eq!(recommend(95.0, 110.0, 100.0, f32::NAN), Recommendation::SellDropFromHigh);
        assert_eq!(recommend(104.0, f32::NAN, 100.0, 90.0), Recommendation::BuyNearLow);
    }

    #[test]
    fn infinite_high_sells() {
        assert_eq!(recommend(500.0, f32::INFINITY, 1.0, 1.0), Recommendation::SellDropFromHigh);
    }

    #[test]
    fn evaluate_uses_the_holding_stop_loss() {
        let quote = Quote::new("AAPL", 85.0, 100.0, 100.0);
        let holding = Holding::new("AAPL", 100, 90.0);
        let evaluation = ThresholdEvaluator.evaluate(&quote, &holding);
        assert_eq!(evaluation.recommendation, Recommendation::SellStopLoss);
    }

    #[test]
    fn labels_are_stable() {
        let labels: Vec<String> = Recommendation::iter().map(|r| r.to_string()).collect();
        assert_eq!(
            labels,
            ["SELL_STOP_LOSS", "SELL_DROP_FROM_HIGH", "BUY_NEAR_LOW", "HOLD"]
        );
        assert_eq!("HOLD".parse::<Recommendation>().unwrap(), Recommendation::Hold);
        assert_eq!(
            serde_json::to_string(&Recommendation::BuyNearLow).unwrap(),
            "\"BUY_NEAR_LOW\""
        );
    }
}
