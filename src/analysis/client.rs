use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

use super::types::{AnalysisResponse, SummaryRequest, SummaryResponse};

/// The external transcription/sentiment/summary backend.
#[async_trait::async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Upload a recorded WAV payload for transcription and sentiment analysis
    async fn analyze_audio(&self, wav: Vec<u8>) -> Result<AnalysisResponse>;

    /// Request a post-call summary
    async fn generate_summary(&self, request: &SummaryRequest) -> Result<SummaryResponse>;
}

/// HTTP implementation against the analysis backend.
pub struct HttpAnalysisClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAnalysisClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl AnalysisApi for HttpAnalysisClient {
    async fn analyze_audio(&self, wav: Vec<u8>) -> Result<AnalysisResponse> {
        let url = format!("{}/analyze-audio", self.base_url);
        debug!("Uploading {} byte recording to {}", wav.len(), url);

        let file_part = Part::bytes(wav)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .context("Failed to build multipart audio part")?;
        let form = Form::new().part("file", file_part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Audio analysis request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("analysis backend returned {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse analysis response")
    }

    async fn generate_summary(&self, request: &SummaryRequest) -> Result<SummaryResponse> {
        let url = format!("{}/generate-summary", self.base_url);
        debug!("Requesting post-call summary from {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .context("Summary request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("summary backend returned {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse summary response")
    }
}
