use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// One OHLCV sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(deserialize_with = "provider_time")]
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Bars ordered oldest to newest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries(Vec<Bar>);

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        if let Some(pos) = bars.windows(2).position(|w| w[1].time < w[0].time) {
            return Err(Error::Unordered { index: pos + 1 });
        }
        Ok(Self(bars))
    }

    /// Providers hand back the newest bar first.
    pub fn from_newest_first(mut bars: Vec<Bar>) -> Result<Self> {
        bars.reverse();
        Self::new(bars)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.0
    }

    pub fn closes(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.close).collect()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.0.last()
    }

    pub fn into_inner(self) -> Vec<Bar> {
        self.0
    }
}

impl Deref for BarSeries {
    type Target = [Bar];

    fn deref(&self) -> &[Bar] {
        &self.0
    }
}

/// Parses provider timestamps. marketstack writes offsets as `+0000`,
/// which plain RFC 3339 rejects.
pub(crate) fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

pub(crate) fn provider_time<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_time(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}
