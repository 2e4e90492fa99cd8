use std::env::var;
use std::time::Duration;

use stock::ChartPeriod;

#[derive(Clone, Debug)]
pub struct Config {
    pub symbol: String,
    pub chart_period: ChartPeriod,
    pub bar_count: usize,
    pub feed_for: Duration,
    pub mock_analysis: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            symbol: get("DASHBOARD_SYMBOL")
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "AAPL".to_string()),
            chart_period: get("DASHBOARD_CHART_PERIOD")
                .map(|c| ChartPeriod::from_code(c.trim()))
                .unwrap_or_default(),
            bar_count: get("DASHBOARD_BAR_COUNT")
                .and_then(|n| n.parse().ok())
                .unwrap_or(100),
            feed_for: Duration::from_secs(
                get("DASHBOARD_FEED_SECONDS")
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(5),
            ),
            mock_analysis: get("DASHBOARD_MOCK_ANALYSIS")
                .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]);
        assert_eq!(c.symbol, "AAPL");
        assert_eq!(c.chart_period, ChartPeriod::Day1);
        assert_eq!(c.bar_count, 100);
        assert_eq!(c.feed_for, Duration::from_secs(5));
        assert!(!c.mock_analysis);
    }

    #[test]
    fn overrides() {
        let c = config(&[
            ("DASHBOARD_SYMBOL", " msft "),
            ("DASHBOARD_CHART_PERIOD", "1M"),
            ("DASHBOARD_BAR_COUNT", "50"),
            ("DASHBOARD_FEED_SECONDS", "2"),
            ("DASHBOARD_MOCK_ANALYSIS", "true"),
        ]);
        assert_eq!(c.symbol, "MSFT");
        assert_eq!(c.chart_period, ChartPeriod::Month1);
        assert_eq!(c.bar_count, 50);
        assert_eq!(c.feed_for, Duration::from_secs(2));
        assert!(c.mock_analysis);
    }

    #[test]
    fn bad_numbers_fall_back() {
        let c = config(&[("DASHBOARD_BAR_COUNT", "lots"), ("DASHBOARD_SYMBOL", "  ")]);
        assert_eq!(c.bar_count, 100);
        assert_eq!(c.symbol, "AAPL");
    }
}
