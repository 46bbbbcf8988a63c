// HTTP request handlers
use crate::application::block_service::{HandlerAck, StudioSubmit};
use crate::application::summary_service::BlockContext;
use crate::domain::fragment::Fragment;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Summary aside attached to a course unit's student view
pub async fn student_view_aside(
    Query(ctx): Query<BlockContext>,
    State(state): State<Arc<AppState>>,
) -> Json<Fragment> {
    if !state.summary_builder.should_apply_to_block(&ctx) {
        return Json(Fragment::default());
    }
    Json(state.summary_builder.student_view_aside(&ctx).await)
}

/// Student view of the Superset block
pub async fn block_student_view(
    Path(usage_id): Path<String>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let locale = query.locale.or_else(|| accept_language(&headers));

    match state
        .block_service
        .student_view(&usage_id, locale.as_deref())
        .await
    {
        Ok(fragment) => Json(fragment).into_response(),
        Err(e) => {
            tracing::error!(usage_id = %usage_id, error = %e, "failed to render block view");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Studio form submission
pub async fn studio_submit(
    Path(usage_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(data): Json<StudioSubmit>,
) -> Json<HandlerAck> {
    Json(state.block_service.studio_submit(&usage_id, data).await)
}

/// First language tag of `Accept-Language`, quality weights ignored
fn accept_language(headers: &HeaderMap) -> Option<String> {
    headers
        .get("accept-language")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|tag| tag.split(';').next().unwrap_or(tag).trim().to_string())
        .filter(|tag| !tag.is_empty() && tag != "*")
}
