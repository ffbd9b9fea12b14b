//! Template administration and price grid checks

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::db;
use crate::error::{AppError, Result};
use crate::messages::TemplateKey;
use crate::models::MessageTemplate;
use crate::pricing::grid::PriceGap;
use crate::pricing::requests::{InvalidateCacheRequest, UpdateTemplateRequest};
use crate::pricing::services;
use crate::AppState;

pub async fn list_templates(State(state): State<AppState>) -> Result<Json<Vec<MessageTemplate>>> {
    Ok(Json(db::list_message_templates(&state.db).await?))
}

/// Replace a template's content and drop the cached set
pub async fn update_template(
    State(state): State<AppState>,
    Path(template_type): Path<String>,
    Json(req): Json<UpdateTemplateRequest>,
) -> Result<Json<MessageTemplate>> {
    if TemplateKey::parse(&template_type).is_none() {
        return Err(AppError::Validation(format!(
            "Unknown template type '{}'",
            template_type
        )));
    }

    let template = db::update_message_template(&state.db, &template_type, &req.content)
        .await?
        .ok_or(AppError::NotFound)?;
    state.cache.invalidate_templates();
    tracing::info!("Template {} updated", template_type);

    Ok(Json(template))
}

/// Drop cached templates, tariff periods or both after out-of-band edits
pub async fn invalidate_cache(
    State(state): State<AppState>,
    Query(req): Query<InvalidateCacheRequest>,
) -> StatusCode {
    state.cache.invalidate(req.scope);
    StatusCode::NO_CONTENT
}

pub async fn price_grid_gaps(State(state): State<AppState>) -> Result<Json<Vec<PriceGap>>> {
    Ok(Json(services::price_grid_gaps(&state.db, &state.cache).await?))
}
