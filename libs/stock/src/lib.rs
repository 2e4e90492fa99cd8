mod bar;
mod error;
mod llm_client;
mod market_client;
mod prompt;
mod quote;

pub mod feed;
pub mod indicators;
pub mod sentiment;

pub use bar::{Bar, BarSeries};
pub use error::{Error, Result};
pub use llm_client::{
    AnalysisReport, ChatRequest, CompanyNews, CorrelationAnalysis, LlmClient, Message, Role,
    mock_analysis,
};
pub use market_client::{ChartPeriod, MarketDataClient, TickerMatch};
pub use quote::Quote;
