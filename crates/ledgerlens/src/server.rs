//! HTTP surface for the extraction service
//!
//! One real route: `POST /api/receipt/draft`. The handler owns the
//! provider lifecycle - when no provider was injected (production), an
//! Anthropic client is built from the environment per request, so a
//! missing credential is a per-request 500, never a startup crash.
//!
//! Reference lists are parsed leniently: an absent or malformed
//! `categories`/`accounts` value decays to an empty list, which leaves
//! the model nothing valid to pick and lets the guardrails null out
//! whatever it returns anyway.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ledgerlens_extract::{DraftExtractor, ExtractError, ExtractOptions};
use ledgerlens_schema::{DraftExpense, ReferenceAccount, ReferenceCategory};
use ledgerlens_vision::{AnthropicVision, VisionProvider};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared, read-only request-handling state.
#[derive(Clone)]
pub struct AppState {
    /// Injected provider; `None` means "build from env per request"
    provider: Option<Arc<dyn VisionProvider>>,
    /// Extraction tunables (model, token budget, amount ceiling)
    options: ExtractOptions,
}

impl AppState {
    /// Production state: the handler reads the credential per request
    pub fn from_env(options: ExtractOptions) -> Self {
        Self {
            provider: None,
            options,
        }
    }

    /// Test state with an injected provider
    pub fn with_provider(provider: Arc<dyn VisionProvider>, options: ExtractOptions) -> Self {
        Self {
            provider: Some(provider),
            options,
        }
    }
}

/// Inbound request body for `POST /api/receipt/draft`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    /// Base64 image data URL; required
    image_data_url: Option<String>,
    /// Caller's categories; lenient, decays to empty
    #[serde(default, deserialize_with = "lenient_list")]
    categories: Vec<ReferenceCategory>,
    /// Caller's accounts; lenient, decays to empty
    #[serde(default, deserialize_with = "lenient_list")]
    accounts: Vec<ReferenceAccount>,
}

#[derive(Debug, Serialize)]
struct DraftResponse {
    draft: DraftExpense,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    /// Truncated model text, present only for JSON-parse failures
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
}

/// Accept a list field even when the caller sends junk: non-arrays and
/// unparseable elements are dropped instead of failing the request.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

fn error_response(err: &ExtractError) -> Response {
    let status = match err {
        ExtractError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ExtractError::Configuration(_)
        | ExtractError::Upstream { .. }
        | ExtractError::EmptyModelOutput { .. }
        | ExtractError::MalformedJson { .. }
        | ExtractError::InvalidDraftShape => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let raw = match err {
        ExtractError::MalformedJson { prefix } => Some(prefix.clone()),
        _ => None,
    };

    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
            raw,
        }),
    )
        .into_response()
}

async fn draft_handler(
    State(state): State<AppState>,
    body: Result<Json<DraftRequest>, JsonRejection>,
) -> Response {
    // A body axum cannot deserialize is still our 400 contract, not the
    // extractor's default rejection (which answers 422 with plain text)
    let Json(req) = match body {
        Ok(json) => json,
        Err(rejection) => {
            return error_response(&ExtractError::InvalidInput(rejection.body_text()))
        }
    };

    let image_data_url = match req.image_data_url {
        Some(url) => url,
        None => {
            return error_response(&ExtractError::InvalidInput(
                "imageDataUrl is required".to_string(),
            ))
        }
    };

    // The handler owns the provider: injected for tests, built from the
    // environment otherwise. Credential problems are per-request 500s.
    let provider: Arc<dyn VisionProvider> = match &state.provider {
        Some(provider) => Arc::clone(provider),
        None => match AnthropicVision::from_env() {
            Ok(provider) => Arc::new(provider),
            Err(e) => {
                let err = ExtractError::from(e);
                tracing::error!(error = %err, "inference provider unavailable");
                return error_response(&err);
            }
        },
    };

    let extractor = DraftExtractor::with_options(provider, state.options.clone());
    match extractor
        .extract(&image_data_url, &req.categories, &req.accounts)
        .await
    {
        Ok(draft) => (StatusCode::OK, Json(DraftResponse { draft })).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "draft extraction failed");
            error_response(&err)
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/receipt/draft", post(draft_handler))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(bind: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, "ledgerlens listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_request_parsing() {
        let req: DraftRequest = serde_json::from_value(json!({
            "imageDataUrl": "data:image/png;base64,aGVsbG8=",
            "categories": [
                {"id": "cat-1", "name": "Groceries"},
                "junk element",
                {"unrelated": true}
            ],
            "accounts": "not a list"
        }))
        .unwrap();

        assert!(req.image_data_url.is_some());
        assert_eq!(req.categories.len(), 1);
        assert_eq!(req.categories[0].id, "cat-1");
        assert!(req.accounts.is_empty());
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let req: DraftRequest =
            serde_json::from_value(json!({"imageDataUrl": "data:image/png;base64,aGVsbG8="}))
                .unwrap();
        assert!(req.categories.is_empty());
        assert!(req.accounts.is_empty());
    }

    #[test]
    fn test_error_body_omits_raw_unless_parse_failure() {
        let body = ErrorBody {
            error: "x".to_string(),
            raw: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("raw").is_none());

        let with_raw = ErrorBody {
            error: "x".to_string(),
            raw: Some("Sure! Here".to_string()),
        };
        let json = serde_json::to_value(&with_raw).unwrap();
        assert_eq!(json["raw"], "Sure! Here");
    }
}
