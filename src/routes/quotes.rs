//! Availability search and quote message handlers

use axum::{extract::State, Json};

use crate::error::Result;
use crate::messages::whatsapp_link;
use crate::pricing::requests::{AvailabilityQuoteRequest, ReservationQuoteRequest, UnitSearchRequest};
use crate::pricing::responses::{
    AvailabilityMessageResponse, ReservationMessageResponse, UnitSearchResponse,
};
use crate::pricing::services;
use crate::AppState;

pub async fn search_units(
    State(state): State<AppState>,
    Json(req): Json<UnitSearchRequest>,
) -> Result<Json<UnitSearchResponse>> {
    let units = services::find_available_units(&state.db, &state.cache, &req).await?;

    Ok(Json(UnitSearchResponse {
        units: units.into_iter().map(Into::into).collect(),
    }))
}

/// Availability message for the chosen units
pub async fn availability(
    State(state): State<AppState>,
    Json(req): Json<AvailabilityQuoteRequest>,
) -> Result<Json<AvailabilityMessageResponse>> {
    let quote = services::availability_quote(
        &state.db,
        &state.cache,
        &req,
        state.config.default_deposit_percentage,
    )
    .await?;
    let message = state.composer().availability_message(&quote).await?;

    Ok(Json(AvailabilityMessageResponse {
        whatsapp_link: whatsapp_link(&message)?,
        message,
        quote,
    }))
}

/// Reservation summary with totals and deposit
pub async fn reservation(
    State(state): State<AppState>,
    Json(req): Json<ReservationQuoteRequest>,
) -> Result<Json<ReservationMessageResponse>> {
    let quote = services::reservation_quote(
        &state.db,
        &state.cache,
        &req,
        state.config.default_deposit_percentage,
    )
    .await?;
    let message = state.composer().reservation_message(&quote).await?;

    Ok(Json(ReservationMessageResponse {
        whatsapp_link: whatsapp_link(&message)?,
        message,
        total: quote.total.into(),
        deposit: quote.deposit.into(),
        quote,
    }))
}
