//! Placeholder candles for when no real history can be loaded.
//!
//! A daily random walk ending at `now`. Prices start from a per-symbol base;
//! each bar moves by up to 2.5% of the running price. Output is clearly fake
//! and always tagged as a placeholder by the loader.

use chartscript_core::domain::Candle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SyntheticSettings;

const DAY_SECONDS: i64 = 86_400;
const VOLATILITY: f64 = 0.025;

/// Built-in starting prices.
pub const BASE_PRICES: &[(&str, f64)] = &[
    ("BBCA", 9800.0),
    ("BBRI", 4600.0),
    ("TLKM", 3400.0),
    ("ASII", 5200.0),
    ("BMRI", 6300.0),
    ("UNVR", 3150.0),
    ("GOTO", 72.0),
    ("BREN", 6900.0),
    ("ADRO", 2700.0),
    ("ANTM", 1530.0),
    ("PGAS", 1350.0),
    ("INDF", 6700.0),
];

/// Configured override, then the built-in table, then the default.
pub fn base_price(symbol: &str, settings: &SyntheticSettings) -> f64 {
    settings
        .base_prices
        .get(symbol)
        .copied()
        .or_else(|| {
            BASE_PRICES
                .iter()
                .find(|(s, _)| *s == symbol)
                .map(|(_, p)| *p)
        })
        .unwrap_or(settings.default_base_price)
}

/// Seeded from `blake3(seed, symbol)` when a seed is set, else from OS entropy.
fn make_rng(symbol: &str, seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            let mut hasher = blake3::Hasher::new();
            hasher.update(&seed.to_le_bytes());
            hasher.update(symbol.as_bytes());
            StdRng::from_seed(*hasher.finalize().as_bytes())
        }
        None => StdRng::from_entropy(),
    }
}

/// Generate `bar_count + 1` daily candles, the last one at `now`.
pub fn generate_synthetic_candles(symbol: &str, settings: &SyntheticSettings, now: i64) -> Vec<Candle> {
    let mut rng = make_rng(symbol, settings.seed);
    let mut price = base_price(symbol, settings);
    let count = settings.bar_count as i64;

    (0..=count)
        .rev()
        .map(|i| {
            let vol = price * VOLATILITY;
            let open = price + (rng.gen::<f64>() - 0.5) * vol;
            let close = open + (rng.gen::<f64>() - 0.5) * vol;
            let high = open.max(close) + rng.gen::<f64>() * vol * 0.5;
            let low = open.min(close) - rng.gen::<f64>() * vol * 0.5;
            price = close;
            Candle::new(now - i * DAY_SECONDS, open, high, low, close)
        })
        .collect()
}
