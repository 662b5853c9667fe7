//! In-memory call history and sentiment analytics
//!
//! History is append-only and insertion-ordered; it lives for the process
//! and is shared between the session controller and the HTTP handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// One completed recording-to-upload cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRecord {
    /// Transcribed text (empty for empty captures and upload failures)
    pub text: String,

    /// Sentiment label as the backend reported it ("Error" when tagged locally)
    pub sentiment: String,

    /// Tone label
    pub tone: String,

    /// Short plain explanation of the tone
    pub explanation: String,

    /// When the record was appended
    pub timestamp: DateTime<Utc>,
}

impl TranscriptRecord {
    /// Record for a stop with nothing captured.
    pub fn empty_capture() -> Self {
        Self {
            text: String::new(),
            sentiment: "Neutral".to_string(),
            tone: "Neutral".to_string(),
            explanation: "No speech detected.".to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Error-tagged record for a failed upload or encode.
    pub fn error(explanation: String) -> Self {
        Self {
            text: String::new(),
            sentiment: "Error".to_string(),
            tone: "Error".to_string(),
            explanation,
            timestamp: Utc::now(),
        }
    }
}

/// A generated post-call summary (fallback text when the backend failed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Sentiment distribution over the whole history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    /// Most frequent label; ties resolve positive > neutral > negative
    pub peak: Option<String>,
}

/// Coarse classification used by the analytics chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentClass {
    Positive,
    Neutral,
    Negative,
}

/// Case-insensitive substring rule: "pos" wins, then "neg", else neutral.
/// Error-tagged records land in the neutral bucket.
pub fn classify(sentiment: &str) -> SentimentClass {
    let lower = sentiment.to_lowercase();
    if lower.contains("pos") {
        SentimentClass::Positive
    } else if lower.contains("neg") {
        SentimentClass::Negative
    } else {
        SentimentClass::Neutral
    }
}

/// Shared append-only store for transcripts and summaries.
pub struct CallHistory {
    records: RwLock<Vec<TranscriptRecord>>,
    summaries: RwLock<Vec<SummaryRecord>>,
}

impl CallHistory {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            summaries: RwLock::new(Vec::new()),
        }
    }

    pub async fn append(&self, record: TranscriptRecord) {
        self.records.write().await.push(record);
    }

    pub async fn append_summary(&self, summary: SummaryRecord) {
        self.summaries.write().await.push(summary);
    }

    pub async fn records(&self) -> Vec<TranscriptRecord> {
        self.records.read().await.clone()
    }

    pub async fn summaries(&self) -> Vec<SummaryRecord> {
        self.summaries.read().await.clone()
    }

    pub async fn latest(&self) -> Option<TranscriptRecord> {
        self.records.read().await.last().cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn analytics(&self) -> SentimentBreakdown {
        let records = self.records.read().await;

        let mut positive = 0;
        let mut neutral = 0;
        let mut negative = 0;
        for record in records.iter() {
            match classify(&record.sentiment) {
                SentimentClass::Positive => positive += 1,
                SentimentClass::Neutral => neutral += 1,
                SentimentClass::Negative => negative += 1,
            }
        }

        let total = records.len();
        let peak = if total == 0 {
            None
        } else {
            let mut top = ("Positive", positive);
            for bucket in [("Neutral", neutral), ("Negative", negative)] {
                if bucket.1 > top.1 {
                    top = bucket;
                }
            }
            Some(top.0.to_string())
        };

        SentimentBreakdown {
            total,
            positive,
            neutral,
            negative,
            peak,
        }
    }
}

impl Default for CallHistory {
    fn default() -> Self {
        Self::new()
    }
}
