use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::bar::Bar;
use crate::error::{Error, Result};
use crate::prompt;
use crate::quote::Quote;
use crate::sentiment::{Sentiment, correlation_score, score_sentiment};

const DEFAULT_BASE_API: &str = "https://api.perplexity.ai";
const SEARCH_MODEL: &str = "sonar";
const ANALYSIS_MODEL: &str = "mixtral-8x7b-instruct";
const ANALYSIS_MAX_TOKENS: u32 = 1000;

/// Chat-completion client for commentary and news.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_api: String,
}

impl LlmClient {
    pub fn new(base_api: String, api_key: String) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {api_key}"))?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_api })
    }

    /// Expects PERPLEXITY_API_KEY; PERPLEXITY_API_BASE_URL is optional.
    pub fn from_env() -> Result<Self> {
        let base_api =
            std::env::var("PERPLEXITY_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_API.to_string());
        let api_key = std::env::var("PERPLEXITY_API_KEY")
            .map_err(|_| Error::MissingEnv("PERPLEXITY_API_KEY"))?;
        Self::new(base_api, api_key)
    }

    /// Sends one chat request and returns the first choice's text.
    #[instrument(skip_all, fields(model = %request.model))]
    pub async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_api.trim_end_matches('/'));

        let res: ChatResponse = self
            .client
            .post(url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = res.into_text()?;
        debug!(chars = text.chars().count(), "completion received");
        Ok(text)
    }

    /// Commentary on how a price move relates to recent news.
    #[instrument(skip(self, quote))]
    pub async fn analyze_correlation(
        &self,
        symbol: &str,
        quote: &Quote,
        price_change: f64,
    ) -> Result<CorrelationAnalysis> {
        let request = ChatRequest::search(
            prompt::CORRELATION_PERSONA,
            prompt::correlation(symbol, quote, price_change),
        );

        let analysis = self
            .complete(&request)
            .await
            .inspect_err(|e| error!(error = ?e, "correlation analysis failed"))?;

        Ok(CorrelationAnalysis {
            correlation_score: correlation_score(&analysis, price_change),
            analysis,
            timestamp: Utc::now(),
        })
    }

    #[instrument(skip(self))]
    pub async fn company_news(&self, symbol: &str) -> Result<CompanyNews> {
        let request = ChatRequest::search(prompt::NEWS_PERSONA, prompt::company_news(symbol));

        let news = self
            .complete(&request)
            .await
            .inspect_err(|e| error!(error = ?e, "company news failed"))?;

        Ok(CompanyNews {
            news,
            timestamp: Utc::now(),
        })
    }

    /// Full written analysis of a quote, optionally with recent bars for context.
    #[instrument(skip_all, fields(symbol = %quote.symbol))]
    pub async fn analyze_stock(&self, quote: &Quote, history: Option<&[Bar]>) -> Result<AnalysisReport> {
        let mut request = ChatRequest::new(
            ANALYSIS_MODEL,
            prompt::ANALYSIS_PERSONA,
            prompt::stock_analysis(quote, history)?,
        );
        request.max_tokens = Some(ANALYSIS_MAX_TOKENS);

        let content = self
            .complete(&request)
            .await
            .inspect_err(|e| error!(error = ?e, "stock analysis failed"))?;

        Ok(AnalysisReport::new(content))
    }
}

/// Canned report for demos without an API key.
pub fn mock_analysis<R: Rng + ?Sized>(quote: &Quote, rng: &mut R) -> AnalysisReport {
    let mut pick = |a: &'static str, b: &'static str| if rng.random_bool(0.5) { a } else { b };

    let direction = if quote.change > 0.0 { "上涨" } else { "下跌" };
    let trend = pick("上升", "下降");
    let activity = pick("活跃", "平稳");
    let appetite = pick("强烈", "一般");
    let cross = pick("金叉形态", "死叉形态");
    let zone = pick("超买", "超卖");
    let advice = pick("可以考虑逢低买入", "保持观望态度");
    let sentiment = if rng.random_bool(0.5) {
        Sentiment::Positive
    } else {
        Sentiment::Negative
    };

    let content = format!(
        "分析报告：{symbol}

1. 价格走势分析
当前价格 {price}，相比前一交易日{direction}{change}元（{change_percent}%）。
从技术面来看，价格走势显示出{trend}趋势。

2. 成交量分析
今日成交量处于{activity}水平，表明市场对该股票的交易意愿{appetite}。

3. 技术指标分析
MACD指标显示{cross}，RSI指标处于{zone}区域。

4. 投资建议
基于当前市场状况，建议投资者{advice}。

5. 风险提示
请注意市场波动风险，建议设置止损位置，控制仓位。",
        symbol = quote.symbol,
        price = quote.price,
        change = quote.change.abs(),
        change_percent = quote.change_percent,
    );

    AnalysisReport {
        timestamp: Utc::now(),
        content,
        sentiment,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub sentiment: Sentiment,
}

impl AnalysisReport {
    pub fn new(content: String) -> Self {
        Self {
            timestamp: Utc::now(),
            sentiment: score_sentiment(&content),
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationAnalysis {
    pub analysis: String,
    pub correlation_score: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyNews {
    pub news: String,
    pub timestamp: DateTime<Utc>,
}

//
// Match the OpenAI-style chat completion JSON
//
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// A system persona followed by one user prompt, with no sampling overrides.
    pub fn new(model: &str, persona: &str, prompt: String) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![Message::system(persona), Message::user(prompt)],
            temperature: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            max_tokens: None,
        }
    }

    /// Low-temperature request against the search-backed model.
    fn search(persona: &str, prompt: String) -> Self {
        Self {
            temperature: Some(0.2),
            top_p: Some(0.9),
            frequency_penalty: Some(1.0),
            presence_penalty: Some(0.0),
            ..Self::new(SEARCH_MODEL, persona, prompt)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

impl ChatResponse {
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::NoData("completion choices".to_string()))
    }
}
