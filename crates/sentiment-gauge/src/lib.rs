use std::collections::HashSet;

use signal_core::{NewsArticle, NewsFeed, SentimentLabel, SentimentReading};

const POSITIVE_WORDS: &[&str] = &[
    "bullish", "rally", "surge", "gain", "profit", "growth", "beat", "upgrade",
    "outperform", "strong", "positive", "rise", "increase", "breakthrough",
    "success", "exceed", "momentum", "buy", "optimistic", "record", "rebound",
    "upside", "robust", "tailwind",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bearish", "decline", "loss", "fall", "plunge", "crash", "miss", "downgrade",
    "underperform", "weak", "negative", "drop", "decrease", "concern", "risk",
    "fail", "disappoint", "slump", "sell", "warning", "pessimistic", "lawsuit",
    "bankruptcy", "headwind",
];

/// Headlines carry more signal than body text
const TITLE_WEIGHT: f64 = 2.0;

/// Word-count scores squash into [-1, 1] at roughly this scale
const SCORE_SCALE: f64 = 3.0;

const LABEL_THRESHOLD: f64 = 0.2;

/// Article count at which confidence saturates
const FULL_CONFIDENCE_ARTICLES: f64 = 10.0;

/// Lexicon-based estimator over the qualitative news feed.
///
/// Advisory, not load-bearing: any feed failure degrades to the
/// neutral default instead of propagating.
pub struct SentimentEstimator {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
}

impl SentimentEstimator {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
        }
    }

    /// Fetch news for `symbol` and score it. Returns the neutral
    /// default on any feed error.
    pub async fn estimate(
        &self,
        symbol: &str,
        feed: &dyn NewsFeed,
        limit: u32,
    ) -> SentimentReading {
        match feed.fetch_news(symbol, limit).await {
            Ok(articles) => {
                tracing::debug!("scoring {} articles for {}", articles.len(), symbol);
                self.score_articles(&articles)
            }
            Err(e) => {
                tracing::warn!("news feed unavailable for {}, using neutral sentiment: {}", symbol, e);
                SentimentReading::neutral()
            }
        }
    }

    /// Score a batch of articles into a bounded reading
    pub fn score_articles(&self, articles: &[NewsArticle]) -> SentimentReading {
        if articles.is_empty() {
            return SentimentReading::neutral();
        }

        let total: f64 = articles
            .iter()
            .map(|article| {
                let mut score = self.score_text(&article.title) * TITLE_WEIGHT;
                if let Some(desc) = &article.description {
                    score += self.score_text(desc);
                }
                score
            })
            .sum();

        let avg = total / articles.len() as f64;
        let score = (avg / SCORE_SCALE).tanh();

        let label = if score > LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if score < -LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };

        let confidence = (articles.len() as f64 / FULL_CONFIDENCE_ARTICLES).min(1.0);

        SentimentReading {
            score,
            label,
            confidence,
        }
    }

    /// +1 per positive word, -1 per negative word
    fn score_text(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|word| {
                if self.positive.contains(word) {
                    1.0
                } else if self.negative.contains(word) {
                    -1.0
                } else {
                    0.0
                }
            })
            .sum()
    }
}

impl Default for SentimentEstimator {
    fn default() -> Self {
        Self::new()
    }
}
