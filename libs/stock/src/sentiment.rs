use std::fmt;

use serde::Serialize;

const POSITIVE_WORDS: [&str; 7] = ["上涨", "增长", "看好", "机会", "突破", "强劲", "利好"];
const NEGATIVE_WORDS: [&str; 7] = ["下跌", "下滑", "风险", "警惕", "回调", "疲软", "利空"];

// "下跌" is listed twice on purpose: its presence weighs double.
const CORRELATION_POSITIVE: [&str; 7] = ["利好", "上涨", "看好", "突破", "增长", "利润", "创新"];
const CORRELATION_NEGATIVE: [&str; 7] = ["利空", "下跌", "担忧", "风险", "下跌", "亏损", "问题"];

const THRESHOLD: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        })
    }
}

/// Net keyword count: every occurrence of a positive word minus every
/// occurrence of a negative word.
pub fn keyword_score(text: &str) -> i64 {
    let count = |words: &[&str]| -> i64 { words.iter().map(|w| text.matches(*w).count() as i64).sum() };
    count(&POSITIVE_WORDS) - count(&NEGATIVE_WORDS)
}

/// Positive above +2, negative below -2, neutral otherwise.
pub fn score_sentiment(text: &str) -> Sentiment {
    match keyword_score(text) {
        s if s > THRESHOLD => Sentiment::Positive,
        s if s < -THRESHOLD => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

/// Agreement between the tone of `text` and the price move, in `[0, 1]`.
///
/// Tone counts keyword presence, not frequency, scaled to `[-1, 1]`. The
/// move is `price_change` percent divided by 5, clamped to `[-1, 1]`.
pub fn correlation_score(text: &str, price_change: f64) -> f64 {
    let present = |words: &[&str]| words.iter().filter(|w| text.contains(**w)).count() as f64;

    let scale = CORRELATION_POSITIVE.len().max(CORRELATION_NEGATIVE.len()) as f64;
    let tone = (present(&CORRELATION_POSITIVE) - present(&CORRELATION_NEGATIVE)) / scale;
    let moved = (price_change / 5.0).clamp(-1.0, 1.0);

    1.0 - (tone - moved).abs() / 2.0
}
