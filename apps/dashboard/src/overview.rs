use anyhow::Result;
use stock::indicators::{SignalLine, TechnicalSnapshot};
use stock::{AnalysisReport, BarSeries, Quote, mock_analysis};
use tracing::{debug, info, instrument, warn};

use crate::Data;
use crate::config::Config;

pub struct Overview {
    pub quote: Quote,
    pub intraday: Option<TechnicalSnapshot>,
    pub daily: Option<TechnicalSnapshot>,
    pub analysis: Option<AnalysisReport>,
}

#[instrument(name = "overview", skip(data, config), fields(symbol = %config.symbol))]
pub async fn run_overview(data: &Data, config: &Config) -> Result<Overview> {
    let symbol = config.symbol.as_str();

    let (quote, intraday, eod) = tokio::try_join!(
        data.market.latest_quote(symbol),
        data.market
            .intraday_bars(symbol, config.chart_period, config.bar_count),
        data.market.eod_history(symbol),
    )?;
    info!(price = quote.price, change_percent = quote.change_percent, "latest quote");

    let intraday_snapshot = snapshot("intraday", &intraday);
    let daily_snapshot = snapshot("daily", &eod);

    let analysis = if config.mock_analysis {
        let mut rng = rand::rng();
        Some(mock_analysis(&quote, &mut rng))
    } else if let Some(llm) = &data.llm {
        match llm.analyze_stock(&quote, Some(eod.bars())).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = ?e, "analysis unavailable");
                None
            }
        }
    } else {
        debug!("no llm configured, skipping analysis");
        None
    };

    if let Some(report) = &analysis {
        info!(sentiment = %report.sentiment, "analysis ready");
    }

    Ok(Overview {
        quote,
        intraday: intraday_snapshot,
        daily: daily_snapshot,
        analysis,
    })
}

fn snapshot(label: &str, series: &BarSeries) -> Option<TechnicalSnapshot> {
    let snapshot = TechnicalSnapshot::from_series(series, SignalLine::Collapsed);
    match &snapshot {
        Some(s) => {
            for line in describe(s) {
                info!(bars = series.len(), "{label}: {line}");
            }
        }
        None => warn!("{label}: no bars"),
    }
    snapshot
}

/// Human-readable lines for one snapshot.
pub fn describe(snapshot: &TechnicalSnapshot) -> Vec<String> {
    let mut lines = Vec::new();

    match snapshot.rsi {
        Some(rsi) => lines.push(format!("RSI(14) {rsi:.2}")),
        None => lines.push("RSI(14) n/a".to_string()),
    }
    match &snapshot.macd {
        Some(m) => lines.push(format!(
            "MACD {:.2} signal {:.2} histogram {:.2}",
            m.macd, m.signal, m.histogram
        )),
        None => lines.push("MACD n/a".to_string()),
    }
    match &snapshot.bollinger {
        Some(b) => lines.push(format!(
            "Bollinger(20) {:.2} / {:.2} / {:.2}",
            b.lower, b.middle, b.upper
        )),
        None => lines.push("Bollinger(20) n/a".to_string()),
    }

    lines.extend(snapshot.summary.iter().map(|h| h.to_string()));
    lines
}
