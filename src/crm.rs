//! CRM lookup client
//!
//! The CRM service resolves customers by email or phone and answers with a
//! customer record or `{"error": ...}`. Lookup misses are not failures.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A customer profile as the CRM sheet exports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Phone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "Product", skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(rename = "Invoice", skip_serializing_if = "Option::is_none")]
    pub invoice: Option<String>,
    #[serde(rename = "Date of Purchase", skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(rename = "Call Feedback", skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(rename = "Sentiment", skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(
        rename = "PreviousPurchases",
        alias = "Previous Purchases",
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_purchases: Option<String>,
}

/// Customer lookup service.
///
/// `Ok(None)` means the service answered but knows no such customer.
#[async_trait::async_trait]
pub trait CrmApi: Send + Sync {
    async fn lookup_by_email(&self, email: &str) -> Result<Option<Customer>>;
    async fn lookup_by_phone(&self, phone: &str) -> Result<Option<Customer>>;
}

/// HTTP implementation against the CRM service.
pub struct HttpCrmClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCrmClient {
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

    async fn fetch(&self, path: &str) -> Result<Option<Customer>> {
        let url = format!("{}{}", self.base_url, path);
        debug!("CRM lookup: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("CRM request failed")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("CRM service returned {}: {}", status, body);
        }

        let value: serde_json::Value = response
            .json()
            .await
            .context("CRM returned invalid JSON")?;

        // A 200 with {"error": ...} also means "not found"
        if value.get("error").is_some() {
            return Ok(None);
        }

        let customer = serde_json::from_value(value)
            .context("CRM returned an unexpected customer shape")?;

        Ok(Some(customer))
    }
}

#[async_trait::async_trait]
impl CrmApi for HttpCrmClient {
    async fn lookup_by_email(&self, email: &str) -> Result<Option<Customer>> {
        self.fetch(&format!("/customers/by-email/{}", email)).await
    }

    async fn lookup_by_phone(&self, phone: &str) -> Result<Option<Customer>> {
        self.fetch(&format!("/customers/by-phone/{}", phone)).await
    }
}
