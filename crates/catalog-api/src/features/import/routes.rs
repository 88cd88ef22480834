use crate::api::response::error_response;
use crate::api::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::queries::{signed_url, SignedUrlError, SignedUrlQuery};

pub fn import_routes() -> Router<AppState> {
    Router::new().route("/import", get(issue_upload_url))
}

#[derive(Debug, Deserialize)]
struct ImportParams {
    name: Option<String>,
}

#[tracing::instrument(skip(state, params))]
async fn issue_upload_url(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
) -> Result<Response, ImportApiError> {
    let query = SignedUrlQuery {
        file_name: params.name.unwrap_or_default(),
    };

    let response = signed_url::handle(
        state.store.as_ref(),
        &state.upload.bucket,
        state.upload.url_ttl_secs,
        query,
    )
    .await?;

    tracing::info!(expires_in = response.expires_in, "Upload URL issued");

    Ok((StatusCode::OK, Json(response)).into_response())
}

#[derive(Debug)]
struct ImportApiError(SignedUrlError);

impl From<SignedUrlError> for ImportApiError {
    fn from(err: SignedUrlError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ImportApiError {
    fn into_response(self) -> Response {
        match self.0 {
            SignedUrlError::NameRequired => {
                error_response(StatusCode::BAD_REQUEST, "Missing 'name' query parameter")
            },
            SignedUrlError::Storage(err) => {
                // No credential or internal detail leaks to the caller.
                tracing::error!(error = %err, "Failed to issue upload URL");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            },
        }
    }
}
