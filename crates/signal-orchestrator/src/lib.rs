//! Wires the abstract bar and news feeds to the signal engine.
//!
//! Holds no caches and no global state: response caching belongs to
//! the hosting service. Each symbol's pipeline touches no shared
//! mutable data, so holdings fan out concurrently and a slow or
//! failing fetch in one symbol never blocks the others.

use std::sync::Arc;

use futures_util::future::join_all;
use portfolio_advisor::{Holding, HoldingReport, PortfolioAnalysis, RiskTolerance};
use sentiment_gauge::SentimentEstimator;
use signal_core::{Bar, BarFeed, EngineError, NewsFeed, SentimentReading, SignalResult};
use signal_engine::{EngineConfig, SignalEngine};

const DEFAULT_LOOKBACK_DAYS: u32 = 365;
const DEFAULT_NEWS_LIMIT: u32 = 50;
const DEFAULT_BENCHMARK: &str = "SPY";

pub struct SignalOrchestrator {
    bar_feed: Arc<dyn BarFeed>,
    news_feed: Arc<dyn NewsFeed>,
    engine: SignalEngine,
    estimator: SentimentEstimator,
    lookback_days: u32,
    news_limit: u32,
    benchmark_symbol: Option<String>,
}

impl SignalOrchestrator {
    pub fn new(bar_feed: Arc<dyn BarFeed>, news_feed: Arc<dyn NewsFeed>) -> Self {
        let lookback_days = std::env::var("STOCKPULSE_LOOKBACK_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LOOKBACK_DAYS);
        let benchmark_symbol = std::env::var("STOCKPULSE_BENCHMARK")
            .ok()
            .unwrap_or_else(|| DEFAULT_BENCHMARK.to_string());

        Self {
            bar_feed,
            news_feed,
            engine: SignalEngine::with_config(EngineConfig::from_env()),
            estimator: SentimentEstimator::new(),
            lookback_days,
            news_limit: DEFAULT_NEWS_LIMIT,
            benchmark_symbol: Some(benchmark_symbol),
        }
    }

    pub fn with_engine(mut self, engine: SignalEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Override or disable the benchmark used for beta
    pub fn with_benchmark(mut self, benchmark_symbol: Option<String>) -> Self {
        self.benchmark_symbol = benchmark_symbol;
        self
    }

    pub fn with_lookback_days(mut self, lookback_days: u32) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    /// Analyze one symbol end to end.
    ///
    /// The bar fetch is load-bearing; the news fetch degrades to
    /// neutral sentiment and the benchmark fetch to the fallback
    /// beta.
    pub async fn analyze(&self, symbol: &str) -> Result<SignalResult, EngineError> {
        tracing::info!("analyzing {}", symbol);

        let (bars, sentiment, benchmark) = tokio::join!(
            self.bar_feed.fetch_bars(symbol, self.lookback_days),
            self.fetch_sentiment(symbol),
            self.fetch_benchmark(symbol),
        );
        let bars = bars?;

        self.engine
            .compute_signal_with_benchmark(symbol, &bars, benchmark.as_deref(), sentiment)
    }

    async fn fetch_sentiment(&self, symbol: &str) -> SentimentReading {
        self.estimator
            .estimate(symbol, self.news_feed.as_ref(), self.news_limit)
            .await
    }

    async fn fetch_benchmark(&self, symbol: &str) -> Option<Vec<Bar>> {
        let reference = self.benchmark_symbol.as_deref()?;
        if reference == symbol {
            // the benchmark itself falls back to the beta constant
            return None;
        }
        match self.bar_feed.fetch_bars(reference, self.lookback_days).await {
            Ok(bars) => Some(bars),
            Err(e) => {
                tracing::warn!("benchmark {} unavailable, using fallback beta: {}", reference, e);
                None
            }
        }
    }

    /// Analyze every holding independently and fold the outcomes into
    /// the portfolio view. A failed symbol is reported inline without
    /// aborting the batch.
    pub async fn analyze_portfolio(
        &self,
        holdings: &[Holding],
        risk_tolerance: RiskTolerance,
    ) -> PortfolioAnalysis {
        let reports = join_all(holdings.iter().map(|holding| async move {
            match self.analyze(&holding.symbol).await {
                Ok(result) => {
                    HoldingReport::analyzed(holding.symbol.clone(), holding.allocation, result)
                }
                Err(e) => {
                    tracing::warn!("analysis failed for {}: {}", holding.symbol, e);
                    HoldingReport::failed(holding.symbol.clone(), holding.allocation, e.to_string())
                }
            }
        }))
        .await;

        portfolio_advisor::aggregate(reports, risk_tolerance)
    }
}
