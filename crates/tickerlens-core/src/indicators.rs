//! Technical indicators over a validated [`PriceSeries`].
//!
//! All windows are counted in series samples, not calendar days: with the
//! weekly lookback a "50-period" average spans fifty weeks.
//!
//! A value that needs more history than the series holds is `None`, never a
//! placeholder number, so the presentation layer can hide it.
//!
//! | Metric | Function | Defined when |
//! |--------|----------|--------------|
//! | Latest change | [`price_change`] | `len >= 2` |
//! | Period high / low | [`period_extremes`] | always |
//! | Mean volume | [`mean_volume`] | always |
//! | Simple moving average | [`sma`] | index `>= window - 1` |
//! | RSI | [`rsi`] | index `>= period - 1` |

use serde::{Deserialize, Serialize};

use crate::{InsufficientHistory, PriceBar, PriceSeries, UtcDateTime};

pub const SHORT_SMA_WINDOW: usize = 50;
pub const LONG_SMA_WINDOW: usize = 200;
pub const RSI_PERIOD: usize = 14;

/// Close-to-close move between the last two bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub previous_close: f64,
    pub absolute: f64,
    pub percent: f64,
}

/// Most recent value of a moving average with its window length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAverage {
    pub window: usize,
    pub value: f64,
}

/// Defined point of the RSI series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiPoint {
    pub ts: UtcDateTime,
    pub value: f64,
}

/// Everything derived from one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub latest_close: f64,
    pub change: Option<PriceChange>,
    pub period_high: f64,
    pub period_low: f64,
    pub mean_volume: u64,
    pub sma_short: Option<MovingAverage>,
    pub sma_long: Option<MovingAverage>,
    pub rsi: Vec<RsiPoint>,
}

impl IndicatorSet {
    pub fn latest_rsi(&self) -> Option<f64> {
        self.rsi.last().map(|point| point.value)
    }

    /// Moving averages with enough history, short window first.
    pub fn moving_averages(&self) -> impl Iterator<Item = &MovingAverage> {
        self.sma_short.iter().chain(self.sma_long.iter())
    }
}

/// Derive the full indicator set.
///
/// Read-only over `series`; the validator guarantees it is non-empty.
pub fn compute(series: &PriceSeries) -> IndicatorSet {
    let bars = series.bars();
    let closes = series.closes();
    let (period_high, period_low) = period_extremes(bars);

    let rsi = rsi(&closes, RSI_PERIOD)
        .into_iter()
        .zip(bars)
        .filter_map(|(value, bar)| value.map(|value| RsiPoint { ts: bar.ts, value }))
        .collect();

    IndicatorSet {
        latest_close: closes.last().copied().unwrap_or_default(),
        change: price_change(&closes).ok(),
        period_high,
        period_low,
        mean_volume: mean_volume(bars),
        sma_short: latest_sma(&closes, SHORT_SMA_WINDOW),
        sma_long: latest_sma(&closes, LONG_SMA_WINDOW),
        rsi,
    }
}

/// Change between the last two closes.
///
/// # Errors
///
/// [`InsufficientHistory`] when fewer than two closes exist; callers render
/// this as "N/A".
pub fn price_change(closes: &[f64]) -> Result<PriceChange, InsufficientHistory> {
    match closes {
        [.., previous, latest] => {
            let absolute = latest - previous;
            Ok(PriceChange {
                previous_close: *previous,
                absolute,
                percent: absolute / previous * 100.0,
            })
        }
        _ => Err(InsufficientHistory {
            required: 2,
            available: closes.len(),
        }),
    }
}

/// `(max(high), min(low))` over the whole series.
pub fn period_extremes(bars: &[PriceBar]) -> (f64, f64) {
    bars.iter().fold(
        (f64::NEG_INFINITY, f64::INFINITY),
        |(high, low), bar| (high.max(bar.high), low.min(bar.low)),
    )
}

/// Arithmetic mean of volume, truncated toward zero.
pub fn mean_volume(bars: &[PriceBar]) -> u64 {
    if bars.is_empty() {
        return 0;
    }
    let total: u128 = bars.iter().map(|bar| u128::from(bar.volume)).sum();
    (total / bars.len() as u128) as u64
}

/// Simple moving average, one slot per input value.
///
/// Slot `i` holds the mean of `values[i + 1 - window..=i]` once a full window
/// is available and `None` before that. A zero window yields all `None`.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    for (offset, chunk) in values.windows(window).enumerate() {
        out[offset + window - 1] = Some(chunk.iter().sum::<f64>() / window as f64);
    }
    out
}

/// Latest moving average, omitted entirely when the series is shorter than
/// the window.
pub fn latest_sma(values: &[f64], window: usize) -> Option<MovingAverage> {
    if window == 0 || values.len() < window {
        return None;
    }
    sma(values, window)
        .last()
        .copied()
        .flatten()
        .map(|value| MovingAverage { window, value })
}

/// Relative Strength Index with simple (not Wilder) averaging.
///
/// Step 1: close-to-close deltas; the first close has no predecessor and
/// contributes a zero delta.
/// Step 2: split into gains and absolute losses.
/// Step 3: `period`-sample SMA of each.
/// Step 4: `RSI = 100 - 100 / (1 + avg_gain / avg_loss)`.
///
/// A zero average loss saturates at 100 instead of dividing by zero.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let deltas = std::iter::once(0.0)
        .chain(closes.windows(2).map(|pair| pair[1] - pair[0]))
        .collect::<Vec<_>>();
    let gains = deltas.iter().map(|d| d.max(0.0)).collect::<Vec<_>>();
    let losses = deltas.iter().map(|d| (-d).max(0.0)).collect::<Vec<_>>();

    sma(&gains, period)
        .into_iter()
        .zip(sma(&losses, period))
        .map(|(gain, loss)| Some(rsi_from_averages(gain?, loss?)))
        .collect()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn sma_undefined_before_full_window() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_close(out[2].expect("defined"), 2.0);
        assert_close(out[3].expect("defined"), 3.0);
    }

    #[test]
    fn sma_zero_window_is_undefined() {
        assert_eq!(sma(&[1.0, 2.0], 0), vec![None, None]);
        assert_eq!(latest_sma(&[1.0, 2.0], 0), None);
    }

    #[test]
    fn latest_sma_omitted_when_series_short() {
        assert_eq!(latest_sma(&[1.0, 2.0], 3), None);
        let average = latest_sma(&[1.0, 2.0, 3.0], 3).expect("defined");
        assert_eq!(average.window, 3);
        assert_close(average.value, 2.0);
    }

    #[test]
    fn price_change_needs_two_closes() {
        let err = price_change(&[100.0]).expect_err("must fail");
        assert_eq!(
            err,
            InsufficientHistory {
                required: 2,
                available: 1
            }
        );
    }

    #[test]
    fn price_change_percentage() {
        let change = price_change(&[90.0, 100.0, 110.0]).expect("defined");
        assert_close(change.previous_close, 100.0);
        assert_close(change.absolute, 10.0);
        assert_close(change.percent, 10.0);
    }

    #[test]
    fn rsi_first_defined_at_period_minus_one() {
        let closes = (0..20).map(|i| 100.0 + i as f64).collect::<Vec<_>>();
        let out = rsi(&closes, 14);
        assert!(out[..13].iter().all(Option::is_none));
        assert_eq!(out[13], Some(100.0));
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes = (0..15).map(|i| 100.0 - i as f64).collect::<Vec<_>>();
        assert_close(rsi(&closes, 14)[14].expect("defined"), 0.0);
    }

    #[test]
    fn rsi_mixed_moves() {
        // Two gains of 2 and one loss of 1 inside a 3-sample window.
        let out = rsi(&[10.0, 12.0, 11.0, 13.0], 3);
        // Window at index 3 holds deltas [2, -1, 2]: avg gain 4/3, avg loss 1/3.
        assert_close(out[3].expect("defined"), 80.0);
    }

    #[test]
    fn mean_volume_truncates() {
        let ts = UtcDateTime::from_unix_timestamp(0).expect("ts");
        let bar = |volume| PriceBar {
            ts,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume,
        };
        assert_eq!(mean_volume(&[bar(1), bar(2)]), 1);
        assert_eq!(mean_volume(&[]), 0);
    }
}
