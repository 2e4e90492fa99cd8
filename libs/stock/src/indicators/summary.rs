use super::bollinger::Bollinger;
use super::macd::Macd;

const OVERBOUGHT: f64 = 70.0;
const OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    Overbought,
    Oversold,
    RsiNeutral,
    Uptrend,
    Downtrend,
    AboveUpperBand,
    BelowLowerBand,
    MidBand,
}

impl Hint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hint::Overbought => "RSI overbought, pullback risk",
            Hint::Oversold => "RSI oversold, possible rebound",
            Hint::RsiNeutral => "RSI in neutral range",
            Hint::Uptrend => "MACD uptrend, possible buy signal",
            Hint::Downtrend => "MACD downtrend, possible sell signal",
            Hint::AboveUpperBand => "price broke above upper Bollinger band, pullback risk",
            Hint::BelowLowerBand => "price broke below lower Bollinger band, possibly oversold",
            Hint::MidBand => "price inside Bollinger bands, trend stable",
        }
    }
}

impl std::fmt::Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold reading of the indicators, in RSI, MACD, band order.
///
/// An unavailable indicator contributes nothing.
pub fn summarize(
    rsi: Option<f64>,
    macd: Option<&Macd>,
    bollinger: Option<&Bollinger>,
    last_price: f64,
) -> Vec<Hint> {
    let mut hints = Vec::with_capacity(3);

    if let Some(rsi) = rsi {
        hints.push(if rsi > OVERBOUGHT {
            Hint::Overbought
        } else if rsi < OVERSOLD {
            Hint::Oversold
        } else {
            Hint::RsiNeutral
        });
    }

    if let Some(m) = macd {
        if m.histogram > 0.0 && m.histogram > m.signal {
            hints.push(Hint::Uptrend);
        } else if m.histogram < 0.0 && m.histogram < m.signal {
            hints.push(Hint::Downtrend);
        }
    }

    if let Some(b) = bollinger {
        hints.push(if last_price > b.upper {
            Hint::AboveUpperBand
        } else if last_price < b.lower {
            Hint::BelowLowerBand
        } else {
            Hint::MidBand
        });
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANDS: Bollinger = Bollinger {
        middle: 100.0,
        upper: 110.0,
        lower: 90.0,
    };

    fn macd(signal: f64, histogram: f64) -> Macd {
        Macd {
            macd: signal + histogram,
            signal,
            histogram,
        }
    }

    #[test]
    fn rsi_thresholds() {
        assert_eq!(summarize(Some(70.01), None, None, 0.0), vec![Hint::Overbought]);
        assert_eq!(summarize(Some(70.0), None, None, 0.0), vec![Hint::RsiNeutral]);
        assert_eq!(summarize(Some(30.0), None, None, 0.0), vec![Hint::RsiNeutral]);
        assert_eq!(summarize(Some(29.99), None, None, 0.0), vec![Hint::Oversold]);
    }

    #[test]
    fn macd_trend_needs_histogram_beyond_signal() {
        assert_eq!(summarize(None, Some(&macd(0.5, 1.0)), None, 0.0), vec![Hint::Uptrend]);
        assert!(summarize(None, Some(&macd(2.0, 1.0)), None, 0.0).is_empty());
        assert_eq!(summarize(None, Some(&macd(-0.5, -1.0)), None, 0.0), vec![Hint::Downtrend]);
        assert!(summarize(None, Some(&macd(-2.0, -1.0)), None, 0.0).is_empty());
        assert!(summarize(None, Some(&macd(0.0, 0.0)), None, 0.0).is_empty());
    }

    #[test]
    fn band_position() {
        assert_eq!(summarize(None, None, Some(&BANDS), 111.0), vec![Hint::AboveUpperBand]);
        assert_eq!(summarize(None, None, Some(&BANDS), 89.0), vec![Hint::BelowLowerBand]);
        assert_eq!(summarize(None, None, Some(&BANDS), 110.0), vec![Hint::MidBand]);
    }

    #[test]
    fn ordered_rsi_macd_bands() {
        let hints = summarize(Some(80.0), Some(&macd(0.1, 0.3)), Some(&BANDS), 120.0);
        assert_eq!(hints, vec![Hint::Overbought, Hint::Uptrend, Hint::AboveUpperBand]);
    }

    #[test]
    fn hints_render_as_text() {
        assert_eq!(Hint::MidBand.to_string(), Hint::MidBand.as_str());
    }
}
