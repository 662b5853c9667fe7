// Tests for the append-only call history and its sentiment analytics.

use chrono::Utc;

use call_sense::history::{classify, SentimentClass};
use call_sense::{CallHistory, SummaryRecord, TranscriptRecord};

fn record(text: &str, sentiment: &str) -> TranscriptRecord {
    TranscriptRecord {
        text: text.to_string(),
        sentiment: sentiment.to_string(),
        tone: "Neutral".to_string(),
        explanation: String::new(),
        timestamp: Utc::now(),
    }
}

#[test]
fn test_classification_is_substring_based() {
    assert_eq!(classify("Positive"), SentimentClass::Positive);
    assert_eq!(classify("very positive overall"), SentimentClass::Positive);
    assert_eq!(classify("Negative"), SentimentClass::Negative);
    assert_eq!(classify("NEGATIVE"), SentimentClass::Negative);
    assert_eq!(classify("Neutral"), SentimentClass::Neutral);
    // Error-tagged records count as neutral in the chart
    assert_eq!(classify("Error"), SentimentClass::Neutral);
    assert_eq!(classify(""), SentimentClass::Neutral);
}

#[tokio::test]
async fn test_history_preserves_insertion_order() {
    let history = CallHistory::new();

    history.append(record("first", "Positive")).await;
    history.append(record("second", "Negative")).await;
    history.append(record("third", "Neutral")).await;

    let records = history.records().await;
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].text, "first");
    assert_eq!(records[1].text, "second");
    assert_eq!(records[2].text, "third");

    let latest = history.latest().await.unwrap();
    assert_eq!(latest.text, "third");
}

#[tokio::test]
async fn test_analytics_distribution() {
    let history = CallHistory::new();

    history.append(record("a", "Positive")).await;
    history.append(record("b", "Positive")).await;
    history.append(record("c", "Negative")).await;
    history.append(record("d", "Error")).await;
    history.append(record("e", "Neutral")).await;

    let analytics = history.analytics().await;
    assert_eq!(analytics.total, 5);
    assert_eq!(analytics.positive, 2);
    assert_eq!(analytics.negative, 1);
    assert_eq!(analytics.neutral, 2);
    assert_eq!(analytics.peak.as_deref(), Some("Positive"));
}

#[tokio::test]
async fn test_analytics_peak_tie_prefers_positive_then_neutral() {
    let history = CallHistory::new();
    history.append(record("a", "Positive")).await;
    history.append(record("b", "Negative")).await;
    // 1-1-0 tie between positive and negative resolves to positive
    assert_eq!(history.analytics().await.peak.as_deref(), Some("Positive"));

    let history = CallHistory::new();
    history.append(record("a", "Neutral")).await;
    history.append(record("b", "Negative")).await;
    assert_eq!(history.analytics().await.peak.as_deref(), Some("Neutral"));
}

#[tokio::test]
async fn test_analytics_on_empty_history() {
    let history = CallHistory::new();

    let analytics = history.analytics().await;
    assert_eq!(analytics.total, 0);
    assert_eq!(analytics.peak, None);
    assert!(history.is_empty().await);
}

#[tokio::test]
async fn test_summaries_are_append_only() {
    let history = CallHistory::new();

    history
        .append_summary(SummaryRecord {
            text: "Customer agreed to a follow-up.".to_string(),
            timestamp: Utc::now(),
        })
        .await;
    history
        .append_summary(SummaryRecord {
            text: "Error generating summary.".to_string(),
            timestamp: Utc::now(),
        })
        .await;

    let summaries = history.summaries().await;
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].text, "Customer agreed to a follow-up.");
    assert_eq!(summaries[1].text, "Error generating summary.");
}

#[test]
fn test_prebuilt_records() {
    let empty = TranscriptRecord::empty_capture();
    assert_eq!(empty.text, "");
    assert_eq!(empty.sentiment, "Neutral");
    assert_eq!(empty.explanation, "No speech detected.");

    let error = TranscriptRecord::error("Error analyzing audio: timeout".to_string());
    assert_eq!(error.sentiment, "Error");
    assert_eq!(error.tone, "Error");
    assert!(error.explanation.contains("timeout"));
}
