pub mod bollinger;
pub mod ema;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod summary;

pub use bollinger::{Bollinger, bollinger};
pub use ema::ema;
pub use ma::moving_average;
pub use macd::{Macd, SignalLine, macd};
pub use rsi::rsi;
pub use summary::{Hint, summarize};

use crate::bar::BarSeries;

/// Indicator readings for the latest bar of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalSnapshot {
    pub rsi: Option<f64>,
    pub macd: Option<Macd>,
    pub bollinger: Option<Bollinger>,
    pub last_price: f64,
    pub last_volume: f64,
    pub summary: Vec<Hint>,
}

impl TechnicalSnapshot {
    /// `None` for an empty series.
    pub fn from_series(series: &BarSeries, mode: SignalLine) -> Option<Self> {
        let last = series.last()?;

        let rsi = rsi(series, rsi::DEFAULT_PERIOD);
        let macd = macd(series, mode);
        let bollinger = bollinger(series, bollinger::DEFAULT_PERIOD);
        let summary = summarize(rsi, macd.as_ref(), bollinger.as_ref(), last.close);

        Some(Self {
            rsi,
            macd,
            bollinger,
            last_price: last.close,
            last_volume: last.volume,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::tests::series_from_closes;

    #[test]
    fn empty_series_has_no_snapshot() {
        assert!(TechnicalSnapshot::from_series(&BarSeries::default(), SignalLine::Collapsed).is_none());
    }

    #[test]
    fn short_series_keeps_available_readings() {
        let snapshot =
            TechnicalSnapshot::from_series(&series_from_closes(&[100.0; 15]), SignalLine::Collapsed)
                .unwrap();

        assert_eq!(snapshot.rsi, Some(100.0));
        assert!(snapshot.bollinger.is_none());
        assert!(snapshot.macd.is_some());
        assert_eq!(snapshot.last_price, 100.0);
        assert_eq!(snapshot.summary, vec![Hint::Overbought]);
    }

    #[test]
    fn full_series_reads_all_three() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let snapshot =
            TechnicalSnapshot::from_series(&series_from_closes(&closes), SignalLine::Collapsed)
                .unwrap();

        assert_eq!(snapshot.rsi, Some(50.0));
        assert_eq!(snapshot.summary.first(), Some(&Hint::RsiNeutral));
        assert_eq!(snapshot.summary.last(), Some(&Hint::MidBand));
    }
}
