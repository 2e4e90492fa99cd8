use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, error, info};
use tracing_futures::Instrument;

use crate::error::{Error, Result};
use crate::quote::{Quote, round2};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Something that can produce the next quote for a symbol.
pub trait QuoteSource: Send + 'static {
    fn next_quote(&mut self, symbol: &str) -> Quote;
}

/// Uniformly random quotes for demos.
pub struct RandomQuotes {
    rng: StdRng,
}

impl RandomQuotes {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomQuotes {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteSource for RandomQuotes {
    fn next_quote(&mut self, symbol: &str) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            price: round2(self.rng.random_range(0.0..1000.0)),
            change: round2(self.rng.random_range(-10.0..10.0)),
            change_percent: round2(self.rng.random_range(-2.5..2.5)),
            volume: f64::from(self.rng.random_range(0..1_000_000u32)),
            timestamp: Utc::now(),
        }
    }
}

/// Handle to a running feed. Dropping it leaves the feed running.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// Stops the feed. Once this returns the callback is never invoked again.
    ///
    /// A panic raised by the source or callback is re-raised here.
    pub async fn cancel(self) {
        self.task.abort();
        match self.task.await {
            Err(e) if e.is_panic() => {
                error!("quote feed panicked");
                std::panic::resume_unwind(e.into_panic());
            }
            _ => debug!("feed cancelled"),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Delivers a quote from `source` to `callback` every `every`, starting one
/// period from now. Must be called inside a tokio runtime.
///
/// A zero `every` is rejected.
pub fn subscribe<S, F>(
    symbol: &str,
    every: Duration,
    mut source: S,
    mut callback: F,
) -> Result<Subscription>
where
    S: QuoteSource,
    F: FnMut(Quote) + Send + 'static,
{
    if every.is_zero() {
        return Err(Error::InvalidInterval(every));
    }

    let symbol = symbol.to_string();
    let span = tracing::info_span!("quote_feed", symbol = %symbol);

    info!(symbol = %symbol, interval = ?every, "starting quote feed");

    let task = tokio::spawn(
        async move {
            let mut tick = interval_at(Instant::now() + every, every);
            loop {
                tick.tick().await;
                let quote = source.next_quote(&symbol);
                debug!(price = quote.price, "delivering quote");
                callback(quote);
            }
        }
        .instrument(span),
    );

    Ok(Subscription { task })
}
