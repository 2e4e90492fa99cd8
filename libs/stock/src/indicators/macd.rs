use serde::Serialize;

use super::ema::ema_values;
use crate::bar::BarSeries;
use crate::quote::round2;

const FAST: usize = 12;
const SLOW: usize = 26;
const SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Macd {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// How the signal line is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalLine {
    /// EMA(9) of the latest MACD value repeated once per bar. The EMA of a
    /// constant is that constant, so signal equals MACD and the histogram is
    /// zero. Kept for parity with the figures the dashboard has always shown.
    #[default]
    Collapsed,
    /// EMA(9) over the per-bar MACD history.
    Rolling,
}

/// MACD(12, 26, 9) over the whole series. All fields rounded to 2 decimals.
pub fn macd(series: &BarSeries, mode: SignalLine) -> Option<Macd> {
    let closes = series.closes();
    let fast = ema_values(&closes, FAST)?;
    let slow = ema_values(&closes, SLOW)?;

    let history: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let macd = *history.last()?;

    let signal_input = match mode {
        SignalLine::Collapsed => vec![macd; history.len()],
        SignalLine::Rolling => history,
    };
    let signal = *ema_values(&signal_input, SIGNAL)?.last()?;

    Some(Macd {
        macd: round2(macd),
        signal: round2(signal),
        histogram: round2(macd - signal),
    })
}
