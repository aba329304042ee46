use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::gateway::SubmissionGateway;
use super::quick_order::{QuickOrder, QuickOrderError};
use super::session::{SessionId, SessionRegistry, WizardCommand};
use super::wizard::WizardError;

/// Router builder exposing the wizard sessions and the quick-order endpoint.
pub fn intake_router<G>(registry: Arc<SessionRegistry<G>>) -> Router
where
    G: SubmissionGateway + 'static,
{
    Router::new()
        .route("/api/v1/intake/sessions", post(open_session_handler::<G>))
        .route(
            "/api/v1/intake/sessions/:session_id",
            get(session_handler::<G>).delete(close_session_handler::<G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/commands",
            post(command_handler::<G>),
        )
        .route("/api/v1/requests/quick-order", post(quick_order_handler::<G>))
        .with_state(registry)
}

pub(crate) async fn open_session_handler<G>(
    State(registry): State<Arc<SessionRegistry<G>>>,
) -> Response
where
    G: SubmissionGateway + 'static,
{
    let session = registry.open().await;
    (StatusCode::CREATED, axum::Json(session.view().await)).into_response()
}

pub(crate) async fn session_handler<G>(
    State(registry): State<Arc<SessionRegistry<G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    G: SubmissionGateway + 'static,
{
    let id = SessionId(session_id);
    match registry.get(&id).await {
        Some(session) => (StatusCode::OK, axum::Json(session.view().await)).into_response(),
        None => session_not_found(&id),
    }
}

pub(crate) async fn close_session_handler<G>(
    State(registry): State<Arc<SessionRegistry<G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    G: SubmissionGateway + 'static,
{
    let id = SessionId(session_id);
    if registry.close(&id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        session_not_found(&id)
    }
}

pub(crate) async fn command_handler<G>(
    State(registry): State<Arc<SessionRegistry<G>>>,
    Path(session_id): Path<String>,
    axum::Json(command): axum::Json<WizardCommand>,
) -> Response
where
    G: SubmissionGateway + 'static,
{
    let id = SessionId(session_id);
    let Some(session) = registry.get(&id).await else {
        return session_not_found(&id);
    };

    match session.apply(command).await {
        Ok(_) => (StatusCode::OK, axum::Json(session.view().await)).into_response(),
        Err(error) => {
            let status = match &error {
                WizardError::Validation(_) | WizardError::Field(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                WizardError::InvalidTransition { .. } | WizardError::SubmissionInFlight => {
                    StatusCode::CONFLICT
                }
                WizardError::Submission(_) => StatusCode::BAD_GATEWAY,
            };
            let field = match &error {
                WizardError::Validation(validation) => validation.field().map(|f| f.name()),
                WizardError::Field(field_error) => Some(field_error.field().name()),
                _ => None,
            };
            let payload = json!({
                "error": error.to_string(),
                "field": field,
                "session": session.view().await,
            });
            (status, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn quick_order_handler<G>(
    State(registry): State<Arc<SessionRegistry<G>>>,
    axum::Json(order): axum::Json<QuickOrder>,
) -> Response
where
    G: SubmissionGateway + 'static,
{
    match order.submit(registry.gateway().as_ref()).await {
        Ok(request) => (StatusCode::ACCEPTED, axum::Json(request)).into_response(),
        Err(QuickOrderError::Submission(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

fn session_not_found(id: &SessionId) -> Response {
    let payload = json!({
        "error": "session not found",
        "session_id": id.0,
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}
