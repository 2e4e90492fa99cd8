use std::sync::Arc;

use stock::{LlmClient, MarketDataClient};

pub mod config;
pub mod overview;

pub struct Data {
    pub market: Arc<MarketDataClient>,
    /// Absent when no LLM key is configured.
    pub llm: Option<Arc<LlmClient>>,
}

pub type Error = anyhow::Error;
