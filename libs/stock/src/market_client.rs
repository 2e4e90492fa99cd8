use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::bar::{Bar, BarSeries, provider_time};
use crate::error::{Error, Result};
use crate::quote::Quote;

const DEFAULT_BASE_API: &str = "http://api.marketstack.com/v1";
const SEARCH_LIMIT: usize = 10;
const EOD_LIMIT: usize = 30;

#[derive(Clone)]
pub struct MarketDataClient {
    client: Client,
    base_api: String,
    access_key: String,
}

impl MarketDataClient {
    pub fn new(base_api: String, access_key: String) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_api,
            access_key,
        })
    }

    /// Expects MARKETSTACK_ACCESS_KEY; MARKETSTACK_API_BASE_URL is optional.
    pub fn from_env() -> Result<Self> {
        let base_api =
            std::env::var("MARKETSTACK_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_API.to_string());
        let access_key = std::env::var("MARKETSTACK_ACCESS_KEY")
            .map_err(|_| Error::MissingEnv("MARKETSTACK_ACCESS_KEY"))?;
        Self::new(base_api, access_key)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_api.trim_end_matches('/'), path)
    }

    async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<Envelope<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let res = self
            .client
            .get(self.endpoint(path))
            .query(&[("access_key", self.access_key.as_str())])
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(res)
    }

    /// Tickers whose symbol or name match `query`. No match is an empty list.
    #[instrument(skip(self))]
    pub async fn search_tickers(&self, query: &str) -> Result<Vec<TickerMatch>> {
        let limit = SEARCH_LIMIT.to_string();
        let res: Envelope<TickerRecord> = self
            .get("tickers", &[("search", query), ("limit", limit.as_str())])
            .await
            .inspect_err(|e| error!(error = ?e, "ticker search failed"))?;

        let matches = res.into_matches();
        debug!(count = matches.len(), "ticker search done");
        Ok(matches)
    }

    /// Most recent intraday bar as a quote.
    #[instrument(skip(self))]
    pub async fn latest_quote(&self, symbol: &str) -> Result<Quote> {
        let res: Envelope<BarRecord> = self
            .get("intraday/latest", &[("symbols", symbol)])
            .await
            .inspect_err(|e| error!(error = ?e, "latest quote request failed"))?;

        res.into_quote()
            .inspect_err(|e| error!(error = ?e, "latest quote missing"))
    }

    /// Intraday bars, oldest first.
    #[instrument(skip(self))]
    pub async fn intraday_bars(
        &self,
        symbol: &str,
        period: ChartPeriod,
        count: usize,
    ) -> Result<BarSeries> {
        let limit = count.to_string();
        let res: Envelope<BarRecord> = self
            .get(
                "intraday",
                &[
                    ("symbols", symbol),
                    ("interval", period.interval()),
                    ("limit", limit.as_str()),
                ],
            )
            .await
            .inspect_err(|e| error!(error = ?e, "intraday request failed"))?;

        res.into_series("intraday bars")
            .inspect(|s| debug!(bars = s.len(), "fetched intraday bars"))
            .inspect_err(|e| error!(error = ?e, "intraday bars unusable"))
    }

    /// The last month of daily bars, oldest first.
    #[instrument(skip(self))]
    pub async fn eod_history(&self, symbol: &str) -> Result<BarSeries> {
        let limit = EOD_LIMIT.to_string();
        let res: Envelope<BarRecord> = self
            .get(
                "eod",
                &[("symbols", symbol), ("limit", limit.as_str()), ("sort", "DESC")],
            )
            .await
            .inspect_err(|e| error!(error = ?e, "eod request failed"))?;

        res.into_series("historical bars")
            .inspect(|s| debug!(bars = s.len(), "fetched eod bars"))
            .inspect_err(|e| error!(error = ?e, "eod bars unusable"))
    }
}

/// Chart range the dashboard offers, each mapped to a bar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartPeriod {
    #[default]
    Day1,
    Week1,
    Month1,
}

impl ChartPeriod {
    /// Unknown codes fall back to one day.
    pub fn from_code(code: &str) -> Self {
        match code {
            "1w" => ChartPeriod::Week1,
            "1M" => ChartPeriod::Month1,
            _ => ChartPeriod::Day1,
        }
    }

    pub fn interval(&self) -> &'static str {
        match self {
            ChartPeriod::Day1 => "1h",
            ChartPeriod::Week1 => "3h",
            ChartPeriod::Month1 => "6h",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerMatch {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
}

//
// Match marketstack JSON
// https://marketstack.com/documentation
//
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<Vec<T>>,
}

impl Envelope<BarRecord> {
    fn into_series(self, what: &str) -> Result<BarSeries> {
        let records = self.data.ok_or_else(|| Error::NoData(what.to_string()))?;
        BarSeries::from_newest_first(records.into_iter().map(Into::into).collect())
    }

    fn into_quote(self) -> Result<Quote> {
        let latest = self
            .data
            .and_then(|d| d.into_iter().next())
            .ok_or_else(|| Error::NoData("quote data".to_string()))?;

        Ok(Quote::from_open_close(
            latest.symbol,
            latest.open,
            latest.close,
            latest.volume.unwrap_or_default(),
            latest.date,
        ))
    }
}

impl Envelope<TickerRecord> {
    /// A missing `data` field means nothing matched.
    fn into_matches(self) -> Vec<TickerMatch> {
        self.data
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct BarRecord {
    #[serde(default)]
    symbol: String,
    #[serde(deserialize_with = "provider_time")]
    date: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: Option<f64>,
}

impl From<BarRecord> for Bar {
    fn from(r: BarRecord) -> Self {
        Bar {
            time: r.date,
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TickerRecord {
    symbol: String,
    name: String,
    stock_exchange: Exchange,
}

#[derive(Debug, Deserialize)]
struct Exchange {
    acronym: String,
}

impl From<TickerRecord> for TickerMatch {
    fn from(r: TickerRecord) -> Self {
        TickerMatch {
            symbol: r.symbol,
            name: r.name,
            exchange: r.stock_exchange.acronym,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const BARS: &str = r#"{
        "pagination": {"limit": 3, "offset": 0, "count": 3, "total": 3},
        "data": [
            {"symbol": "AAPL", "date": "2024-03-05T00:00:00+0000", "open": 170.0, "high": 172.0, "low": 169.0, "close": 171.0, "volume": 300.0},
            {"symbol": "AAPL", "date": "2024-03-04T00:00:00+0000", "open": 168.0, "high": 171.0, "low": 167.0, "close": 170.0, "volume": 200.0},
            {"symbol": "AAPL", "date": "2024-03-01T00:00:00+0000", "open": 160.0, "high": 169.0, "low": 159.0, "close": 168.0, "volume": null}
        ]
    }"#;

    fn parse<T: for<'de> Deserialize<'de>>(json: &str) -> Envelope<T> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn bars_come_back_oldest_first() {
        let series = parse::<BarRecord>(BARS).into_series("bars").unwrap();

        assert_eq!(series.closes(), vec![168.0, 170.0, 171.0]);
        assert_eq!(series[0].time, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(series[0].volume, 0.0);
    }

    #[test]
    fn missing_bar_data_is_an_error() {
        let err = parse::<BarRecord>(r#"{"error": {"code": "x"}}"#)
            .into_series("intraday bars")
            .unwrap_err();
        assert!(matches!(err, Error::NoData(ref what) if what == "intraday bars"));
    }

    #[test]
    fn empty_bar_data_is_an_empty_series() {
        let series = parse::<BarRecord>(r#"{"data": []}"#).into_series("bars").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn quote_from_latest_record() {
        let quote = parse::<BarRecord>(BARS).into_quote().unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, 171.0);
        assert_eq!(quote.change, 1.0);
        assert_eq!(quote.change_percent, 0.59);
        assert_eq!(quote.volume, 300.0);
    }

    #[test]
    fn empty_quote_data_is_an_error() {
        let err = parse::<BarRecord>(r#"{"data": []}"#).into_quote().unwrap_err();
        assert!(matches!(err, Error::NoData(_)));
    }

    #[test]
    fn ticker_matches() {
        let json = r#"{"data": [
            {"name": "Apple Inc", "symbol": "AAPL", "has_intraday": false, "has_eod": true,
             "stock_exchange": {"name": "NASDAQ Stock Exchange", "acronym": "NASDAQ", "mic": "XNAS"}}
        ]}"#;

        assert_eq!(
            parse::<TickerRecord>(json).into_matches(),
            vec![TickerMatch {
                symbol: "AAPL".into(),
                name: "Apple Inc".into(),
                exchange: "NASDAQ".into(),
            }]
        );
    }

    #[test]
    fn missing_ticker_data_is_no_match() {
        assert!(parse::<TickerRecord>("{}").into_matches().is_empty());
        assert!(parse::<TickerRecord>(r#"{"data": null}"#).into_matches().is_empty());
        assert!(parse::<TickerRecord>(r#"{"data": []}"#).into_matches().is_empty());
    }

    #[test]
    fn chart_period_intervals() {
        assert_eq!(ChartPeriod::from_code("1d").interval(), "1h");
        assert_eq!(ChartPeriod::from_code("1w").interval(), "3h");
        assert_eq!(ChartPeriod::from_code("1M").interval(), "6h");
        assert_eq!(ChartPeriod::from_code("5y").interval(), "1h");
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let client = MarketDataClient::new("http://localhost:9/v1/".into(), "k".into()).unwrap();
        assert_eq!(client.endpoint("eod"), "http://localhost:9/v1/eod");
    }
}
