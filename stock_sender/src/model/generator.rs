//! Synthetic quotes for demos.
//!
//! Each quote gets a random base price, a 52-week range around it, and a current price
//! drawn from slightly below the low up to the high, so every recommendation can occur.
use rand::Rng;
use stock_common::Quote;

/// Calculate the next synthetic price using a small random walk around `current_price`.
///
/// The change is sampled uniformly from `[-1%, +1%]` and the result is clamped to a
/// small positive minimum.
pub fn next_price(current_price: f32) -> f32 {
    let mut rng = rand::rng();
    let change: f32 = rng.random_range(-0.01..0.01);
    (current_price * (1.0 + change)).max(0.01)
}

/// Builds `count` quotes cycling through `tickers`. Returns nothing if `tickers` is empty.
pub fn generate(tickers: &[String], count: usize) -> Vec<Quote> {
    if tickers.is_empty() {
        return Vec::new();
    }
    let mut rng = rand::rng();
    (0..count)
        .map(|i| {
            let base: f32 = rng.random_range(20.0..500.0);
            let high = base * rng.random_range(1.0..1.4);
            let low = base * rng.random_range(0.6..1.0);
            let price = next_price(rng.random_range(low * 0.9..high));
            Quote::new(&tickers[i % tickers.len()], price, high, low)
        })
        .collect()
}
