use ta::Next;
use ta::indicators::SimpleMovingAverage;

use crate::bar::BarSeries;

/// Mean close of the most recent `period` bars.
///
/// Returns `None` when the series is shorter than `period` or `period` is zero.
pub fn moving_average(series: &BarSeries, period: usize) -> Option<f64> {
    sma_tail(&series.closes(), period)
}

pub(crate) fn sma_tail(values: &[f64], period: usize) -> Option<f64> {
    if values.len() < period {
        return None;
    }
    let mut sma = SimpleMovingAverage::new(period).ok()?;

    values[values.len() - period..]
        .iter()
        .fold(None, |_, &x| Some(sma.next(x)))
}
