use super::state::AppState;
use crate::analysis::SummaryRequest;
use crate::crm::Customer;
use crate::history::{SummaryRecord, TranscriptRecord};
use crate::insights;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct StopRecordingResponse {
    pub status: String,
    pub record: TranscriptRecord,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryBody {
    /// Transcript to summarize (defaults to the latest record)
    #[serde(default)]
    pub transcript: Option<String>,

    /// Its sentiment label (defaults to the latest record)
    #[serde(default)]
    pub sentiment: Option<String>,

    /// Customer email to attach CRM context
    #[serde(default)]
    pub email: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /call/record/start
/// Start recording; capture failures appear in the status text, never as 5xx
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    info!("Start recording requested");
    let stats = state.session.start().await;
    (StatusCode::OK, Json(stats))
}

/// POST /call/record/stop
/// Stop recording and return the record the cycle appended
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    info!("Stop recording requested");

    match state.session.stop().await {
        Some(record) => (
            StatusCode::OK,
            Json(StopRecordingResponse {
                status: "stopped".to_string(),
                record,
            }),
        )
            .into_response(),
        None => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "No recording in progress".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /call/status
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.session.stats().await))
}

/// GET /history
pub async fn get_history(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.history.records().await))
}

/// GET /analytics
pub async fn get_analytics(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.history.analytics().await))
}

/// GET /summaries
pub async fn get_summaries(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.history.summaries().await))
}

/// GET /customers/lookup?email=|phone=
pub async fn lookup_customer(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> impl IntoResponse {
    match lookup(&state, &query).await {
        Ok(Some(customer)) => (StatusCode::OK, Json(customer)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Customer not found.".to_string(),
            }),
        )
            .into_response(),
        Err(response) => response,
    }
}

/// GET /customers/recommendations?email=|phone=
/// CRM lookup followed by the keyword recommendation table
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> impl IntoResponse {
    match lookup(&state, &query).await {
        Ok(Some(customer)) => {
            let purchases = customer.previous_purchases.as_deref().unwrap_or("");
            let recommendations = insights::recommendations_for(purchases);
            (StatusCode::OK, Json(recommendations)).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Customer not found.".to_string(),
            }),
        )
            .into_response(),
        Err(response) => response,
    }
}

/// POST /call/summary
/// Generate a post-call summary; backend failures become fallback summary
/// text, so exactly one record is appended per request
pub async fn generate_summary(
    State(state): State<AppState>,
    Json(body): Json<SummaryBody>,
) -> impl IntoResponse {
    let latest = state.history.latest().await;

    let transcript = body
        .transcript
        .or_else(|| latest.as_ref().map(|r| r.text.clone()))
        .unwrap_or_default();
    let sentiment = body
        .sentiment
        .or_else(|| latest.as_ref().map(|r| r.sentiment.clone()))
        .unwrap_or_else(|| "Neutral".to_string());

    let customer = match &body.email {
        Some(email) => match state.crm.lookup_by_email(email).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Customer lookup for summary failed: {:#}", e);
                None
            }
        },
        None => None,
    };

    let request = SummaryRequest {
        transcript,
        sentiment,
        customer,
    };

    let text = match state.analysis.generate_summary(&request).await {
        Ok(response) => response
            .summary
            .unwrap_or_else(|| "Summary could not be generated.".to_string()),
        Err(e) => {
            error!("Summary request failed: {:#}", e);
            "Error generating summary.".to_string()
        }
    };

    let record = SummaryRecord {
        text,
        timestamp: Utc::now(),
    };
    state.history.append_summary(record.clone()).await;

    (StatusCode::OK, Json(record))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// ============================================================================
// Helpers
// ============================================================================

async fn lookup(
    state: &AppState,
    query: &LookupQuery,
) -> Result<Option<Customer>, axum::response::Response> {
    let result = if let Some(email) = &query.email {
        state.crm.lookup_by_email(email).await
    } else if let Some(phone) = &query.phone {
        state.crm.lookup_by_phone(phone).await
    } else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Provide an email or phone query parameter.".to_string(),
            }),
        )
            .into_response());
    };

    result.map_err(|e| {
        error!("CRM lookup failed: {:#}", e);
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: "Something went wrong while fetching customer.".to_string(),
            }),
        )
            .into_response()
    })
}
