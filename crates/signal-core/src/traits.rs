use crate::{Bar, EngineError, NewsArticle};
use async_trait::async_trait;

/// Historical bar provider.
///
/// Supplied by the hosting service; the engine requires at least 50
/// bars of daily (or finer) resolution ending at "now".
#[async_trait]
pub trait BarFeed: Send + Sync {
    async fn fetch_bars(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Bar>, EngineError>;
}

/// Qualitative news provider. Failures degrade to neutral sentiment.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    async fn fetch_news(&self, symbol: &str, limit: u32)
        -> Result<Vec<NewsArticle>, EngineError>;
}
