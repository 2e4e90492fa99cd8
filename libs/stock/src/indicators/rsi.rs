use crate::bar::BarSeries;
use crate::quote::round2;

pub const DEFAULT_PERIOD: usize = 14;

/// Relative strength index from simple averages of the last `period` deltas.
///
/// Gains and losses are both divided by `period`. With exactly `period` bars
/// only `period - 1` deltas exist; the missing one counts as zero movement.
/// A window without losses reads 100. Rounded to 2 decimals.
pub fn rsi(series: &BarSeries, period: usize) -> Option<f64> {
    if period == 0 || series.len() < period {
        return None;
    }

    let closes = series.closes();
    let start = (closes.len() - period).max(1);

    let (gains, losses) = closes[start - 1..]
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0_f64, 0.0_f64), |(g, l), delta| {
            if delta >= 0.0 {
                (g + delta, l)
            } else {
                (g, l - delta)
            }
        });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(round2(100.0 - 100.0 / (1.0 + rs)))
}
