use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::builder::DecisionSubmission;
use super::domain::RequestId;
use super::reports::sources::{ApplicantDataSource, PropertyDataSource};
use super::repository::{DecisionRepository, RepositoryError};
use super::service::{DecisionService, DecisionServiceError};
use super::view::DecisionRequestView;

const TOKEN_HEADER: &str = "API-TOKEN";
const TOKEN_QUERY: &str = "API_TOKEN";

/// Router builder exposing the decision endpoints.
///
/// With `api_token` set, every route requires the token in the `API-TOKEN` header or the
/// `API_TOKEN` query parameter.
pub fn decision_router<A, P, S>(
    service: Arc<DecisionService<A, P, S>>,
    api_token: Option<String>,
) -> Router
where
    A: ApplicantDataSource + 'static,
    P: PropertyDataSource + 'static,
    S: DecisionRepository + 'static,
{
    Router::new()
        .route("/api/v1/decisions", post(create_handler::<A, P, S>))
        .route("/api/v1/decisions/:request_id", get(show_handler::<A, P, S>))
        .route(
            "/api/v1/decisions/:request_id/review",
            get(review_handler::<A, P, S>),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::new(api_token),
            require_api_token,
        ))
        .with_state(service)
}

async fn require_api_token(
    State(expected): State<Arc<Option<String>>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected.as_deref() else {
        return next.run(request).await;
    };

    let provided = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .or_else(|| params.get(TOKEN_QUERY).map(String::as_str));

    if provided == Some(expected) {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "api token mismatch" })),
        )
            .into_response()
    }
}

pub(crate) async fn create_handler<A, P, S>(
    State(service): State<Arc<DecisionService<A, P, S>>>,
    payload: Result<Json<DecisionSubmission>, JsonRejection>,
) -> Response
where
    A: ApplicantDataSource + 'static,
    P: PropertyDataSource + 'static,
    S: DecisionRepository + 'static,
{
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "decision submission unreadable");
            return invalid_request();
        }
    };

    match service.submit(submission) {
        Ok(request) => (StatusCode::OK, Json(DecisionRequestView::from(&request))).into_response(),
        Err(DecisionServiceError::Build(_)) => invalid_request(),
        Err(other) => {
            error!(error = %other, "decision request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Decision could not be processed" })),
            )
                .into_response()
        }
    }
}

pub(crate) async fn show_handler<A, P, S>(
    State(service): State<Arc<DecisionService<A, P, S>>>,
    Path(request_id): Path<u64>,
) -> Response
where
    A: ApplicantDataSource + 'static,
    P: PropertyDataSource + 'static,
    S: DecisionRepository + 'static,
{
    match service.get(RequestId(request_id)) {
        Ok(request) => (StatusCode::OK, Json(DecisionRequestView::from(&request))).into_response(),
        Err(err) => failure_response(request_id, err),
    }
}

pub(crate) async fn review_handler<A, P, S>(
    State(service): State<Arc<DecisionService<A, P, S>>>,
    Path(request_id): Path<u64>,
) -> Response
where
    A: ApplicantDataSource + 'static,
    P: PropertyDataSource + 'static,
    S: DecisionRepository + 'static,
{
    match service.review(RequestId(request_id)) {
        Ok(rules) => (
            StatusCode::OK,
            Json(json!({ "request_id": request_id, "rules": rules })),
        )
            .into_response(),
        Err(err) => failure_response(request_id, err),
    }
}

fn invalid_request() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "message": "Request not valid" })),
    )
        .into_response()
}

fn failure_response(request_id: u64, err: DecisionServiceError) -> Response {
    match err {
        DecisionServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "request_id": request_id,
                "message": "decision request not found",
            })),
        )
            .into_response(),
        other => {
            error!(request_id, error = %other, "decision lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": other.to_string() })),
            )
                .into_response()
        }
    }
}
