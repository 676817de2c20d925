use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::screens::registry;
use super::session::ScreenAction;
use super::store::{SessionId, SessionService, SessionStore};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub(crate) struct NavigateRequest {
    pub(crate) screen: String,
}

/// Router builder exposing the onboarding session endpoints.
pub fn session_router<S>(service: Arc<SessionService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/screens", get(screens_handler))
        .route("/api/v1/sessions", post(create_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id",
            get(view_handler::<S>).delete(close_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/navigate",
            post(navigate_handler::<S>),
        )
        .route("/api/v1/sessions/:session_id/back", post(back_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id/actions",
            post(action_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn screens_handler() -> Response {
    Json(registry()).into_response()
}

pub(crate) async fn create_handler<S>(State(service): State<Arc<SessionService<S>>>) -> Response
where
    S: SessionStore + 'static,
{
    (StatusCode::CREATED, Json(service.create())).into_response()
}

pub(crate) async fn view_handler<S>(
    State(service): State<Arc<SessionService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId::parse(&session_id)?;
    Ok(Json(service.view(&id)?).into_response())
}

pub(crate) async fn close_handler<S>(
    State(service): State<Arc<SessionService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId::parse(&session_id)?;
    service.close(&id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn navigate_handler<S>(
    State(service): State<Arc<SessionService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<NavigateRequest>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId::parse(&session_id)?;
    Ok(Json(service.navigate(&id, &request.screen)?).into_response())
}

pub(crate) async fn back_handler<S>(
    State(service): State<Arc<SessionService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId::parse(&session_id)?;
    Ok(Json(service.back(&id)?).into_response())
}

pub(crate) async fn action_handler<S>(
    State(service): State<Arc<SessionService<S>>>,
    Path(session_id): Path<String>,
    Json(action): Json<ScreenAction>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId::parse(&session_id)?;
    Ok(Json(service.act(&id, action)?).into_response())
}
