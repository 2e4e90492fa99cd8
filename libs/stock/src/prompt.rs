use crate::bar::Bar;
use crate::error::Result;
use crate::quote::Quote;

pub(crate) const CORRELATION_PERSONA: &str =
    "你是一个专业的股票分析师，专注于分析股票价格变动与新闻事件的相关性。请保持分析的精确性和简洁性。";
pub(crate) const NEWS_PERSONA: &str =
    "你是一个专业的股票分析师，负责生成股票相关的新闻和分析报告。请保持内容的精确性和简洁性。";
pub(crate) const ANALYSIS_PERSONA: &str =
    "你是一个专业的股票分析师，请基于提供的数据进行分析并给出专业的见解。";

pub(crate) fn correlation(symbol: &str, quote: &Quote, price_change: f64) -> String {
    let direction = if price_change > 0.0 { "上涨" } else { "下跌" };

    format!(
        "分析 {symbol} 股票：
1. 当前股价{direction}了 {change:.2}%
2. 最新价格：${price:.2}
3. 成交量：{volume}

请分析这个价格变动可能与哪些最新新闻或市场事件相关，是否符合市场预期，\
从技术面和基本面看是否合理，以及对短期走势的建议。请用中文回答，保持专业、简洁。",
        change = price_change.abs(),
        price = quote.price,
        volume = quote.volume,
    )
}

pub(crate) fn company_news(symbol: &str) -> String {
    format!(
        "请生成5条关于 {symbol} 股票的最新资讯，分别涵盖公司重要事件、市场分析、行业动态、\
竞争对手信息和未来展望。每条按以下格式输出：
1. [标题]
[详细内容]"
    )
}

pub(crate) fn stock_analysis(quote: &Quote, history: Option<&[Bar]>) -> Result<String> {
    let history = match history {
        Some(bars) => format!("历史数据趋势：\n{}\n", serde_json::to_string_pretty(bars)?),
        None => String::new(),
    };

    Ok(format!(
        "请分析以下股票数据并提供专业见解：

股票代码：{symbol}
当前价格：{price}
价格变动：{change} ({change_percent}%)
成交量：{volume}
时间：{timestamp}

{history}
请从价格走势、成交量、技术指标、投资建议和风险提示五个方面进行分析。",
        symbol = quote.symbol,
        price = quote.price,
        change = quote.change,
        change_percent = quote.change_percent,
        volume = quote.volume,
        timestamp = quote.timestamp.to_rfc3339(),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::bar::tests::series_from_closes;

    fn quote() -> Quote {
        Quote::from_open_close("AAPL", 100.0, 98.0, 1_500.0, Utc::now())
    }

    #[test]
    fn correlation_reports_direction_and_magnitude() {
        let prompt = correlation("AAPL", &quote(), -2.0);
        assert!(prompt.contains("下跌了 2.00%"));
        assert!(prompt.contains("$98.00"));
    }

    #[test]
    fn analysis_without_history() {
        let prompt = stock_analysis(&quote(), None).unwrap();
        assert!(prompt.contains("股票代码：AAPL"));
        assert!(!prompt.contains("历史数据趋势"));
    }

    #[test]
    fn analysis_embeds_history_as_json() {
        let series = series_from_closes(&[1.5, 2.5]);
        let prompt = stock_analysis(&quote(), Some(series.bars())).unwrap();
        assert!(prompt.contains("历史数据趋势"));
        assert!(prompt.contains("\"close\": 2.5"));
    }

    #[test]
    fn news_names_symbol() {
        assert!(company_news("TSLA").contains("TSLA"));
    }
}
