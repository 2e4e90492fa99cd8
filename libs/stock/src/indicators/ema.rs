use ta::Next;
use ta::indicators::ExponentialMovingAverage;

use crate::bar::BarSeries;

/// Exponential moving average over the whole series, oldest to newest.
///
/// Smoothing factor is `2 / (period + 1)` and the recursion is seeded with
/// the first close, not an SMA of the first window. `None` for an empty
/// series or a zero period.
pub fn ema(series: &BarSeries, period: usize) -> Option<f64> {
    ema_values(&series.closes(), period)?.last().copied()
}

/// Running EMA value at every input position.
pub(crate) fn ema_values(values: &[f64], period: usize) -> Option<Vec<f64>> {
    if values.is_empty() {
        return None;
    }
    let mut ema = ExponentialMovingAverage::new(period).ok()?;

    Some(values.iter().map(|&x| ema.next(x)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::tests::series_from_closes;

    #[test]
    fn seeded_with_first_close() {
        let series = series_from_closes(&[10.0]);
        assert_eq!(ema(&series, 12), Some(10.0));
    }

    #[test]
    fn follows_recurrence() {
        // k = 2 / 4 = 0.5
        let series = series_from_closes(&[10.0, 20.0, 30.0]);
        // 10 -> 15 -> 22.5
        assert_eq!(ema(&series, 3), Some(22.5));
    }

    #[test]
    fn order_matters() {
        let closes = [1.0, 5.0, 2.0, 8.0, 3.0];
        let mut reversed = closes;
        reversed.reverse();

        let forward = ema(&series_from_closes(&closes), 3).unwrap();
        let backward = ema(&series_from_closes(&reversed), 3).unwrap();
        assert!((forward - backward).abs() > 1e-9);
    }

    #[test]
    fn empty_series_has_no_value() {
        assert_eq!(ema(&BarSeries::default(), 9), None);
    }

    #[test]
    fn zero_period_has_no_value() {
        assert_eq!(ema(&series_from_closes(&[1.0, 2.0]), 0), None);
    }
}
