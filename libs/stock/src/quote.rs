use chrono::{DateTime, Utc};
use serde::Serialize;

/// Latest price snapshot for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Builds a quote from a single bar, measuring the move from open to close.
    pub fn from_open_close(
        symbol: impl Into<String>,
        open: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let change = close - open;
        let change_percent = if open == 0.0 {
            0.0
        } else {
            round2(change / open * 100.0)
        };

        Self {
            symbol: symbol.into(),
            price: close,
            change,
            change_percent,
            volume,
            timestamp,
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
