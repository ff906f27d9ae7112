//! Structural validation of provider payloads.
//!
//! The validator is all-or-nothing: a payload with any incomplete bar is
//! rejected as a whole. Bars are re-sorted by timestamp but never clamped
//! or repaired.

use tracing::debug;

use crate::{PriceBar, PriceSeries, RawBar, RawSeries, SeriesError};

/// Turn a raw fetch result into a [`PriceSeries`].
///
/// # Errors
///
/// - [`SeriesError::EmptySeries`] when `raw` is `None` or has no bars.
/// - [`SeriesError::MissingFields`] for the first bar lacking a timestamp
///   or any OHLCV field.
pub fn validate(raw: Option<RawSeries>) -> Result<PriceSeries, SeriesError> {
    let raw = raw.ok_or(SeriesError::EmptySeries)?;
    if raw.bars.is_empty() {
        return Err(SeriesError::EmptySeries);
    }

    let mut bars = raw
        .bars
        .iter()
        .enumerate()
        .map(|(index, bar)| complete_bar(index, bar))
        .collect::<Result<Vec<_>, _>>()?;

    // Stable sort keeps duplicate timestamps in delivery order.
    bars.sort_by_key(|bar| bar.ts);

    debug!(symbol = %raw.symbol, bars = bars.len(), "series validated");
    Ok(PriceSeries::from_sorted(raw.symbol, raw.metadata, bars))
}

fn complete_bar(index: usize, bar: &RawBar) -> Result<PriceBar, SeriesError> {
    let missing = |field| SeriesError::MissingFields { index, field };

    Ok(PriceBar {
        ts: bar.ts.ok_or_else(|| missing("timestamp"))?,
        open: bar.open.ok_or_else(|| missing("open"))?,
        high: bar.high.ok_or_else(|| missing("high"))?,
        low: bar.low.ok_or_else(|| missing("low"))?,
        close: bar.close.ok_or_else(|| missing("close"))?,
        volume: bar.volume.ok_or_else(|| missing("volume"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalize, Market, SeriesMetadata, UtcDateTime};

    const WEEK: i64 = 7 * 24 * 3600;

    fn raw_bar(week: i64, close: f64) -> RawBar {
        RawBar {
            ts: Some(UtcDateTime::from_unix_timestamp(1_704_067_200 + week * WEEK).expect("ts")),
            open: Some(close),
            high: Some(close + 1.0),
            low: Some(close - 1.0),
            close: Some(close),
            volume: Some(1_000),
        }
    }

    fn raw_series(bars: Vec<RawBar>) -> RawSeries {
        RawSeries::new(
            normalize("AAPL", Market::Foreign),
            bars,
            SeriesMetadata::default(),
        )
    }

    #[test]
    fn rejects_absent_payload() {
        assert_eq!(validate(None), Err(SeriesError::EmptySeries));
    }

    #[test]
    fn rejects_zero_bars() {
        assert_eq!(
            validate(Some(raw_series(Vec::new()))),
            Err(SeriesError::EmptySeries)
        );
    }

    #[test]
    fn rejects_bar_missing_volume() {
        let mut incomplete = raw_bar(1, 11.0);
        incomplete.volume = None;
        let err = validate(Some(raw_series(vec![raw_bar(0, 10.0), incomplete])))
            .expect_err("must fail");
        assert_eq!(
            err,
            SeriesError::MissingFields {
                index: 1,
                field: "volume"
            }
        );
    }

    #[test]
    fn sorts_out_of_order_bars() {
        let series = validate(Some(raw_series(vec![
            raw_bar(2, 12.0),
            raw_bar(0, 10.0),
            raw_bar(1, 11.0),
        ])))
        .expect("must validate");

        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn tolerates_inverted_high_low() {
        let mut odd = raw_bar(0, 10.0);
        odd.high = Some(5.0);
        odd.low = Some(20.0);
        let series = validate(Some(raw_series(vec![odd]))).expect("must validate");
        assert_eq!(series.bars()[0].high, 5.0);
        assert_eq!(series.bars()[0].low, 20.0);
    }
}
