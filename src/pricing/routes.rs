//! HTTP handlers for the pricing calculators.

use axum::{routing::post, Json, Router};

use crate::error::Result;
use crate::AppState;

use super::calculators::{
    calculate_promotion, calculate_service_price, calculate_stay_price, PricingError,
};
use super::requests::{PromotionRequest, ServicePriceRequest, StayPriceRequest};
use super::responses::{
    AppliedPromotionResponse, PromotionResponse, ServicePriceResponse, StayPriceResponse,
};

/// Routes mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stay", post(stay_price))
        .route("/promotion", post(promotion))
        .route("/service", post(service_price))
}

async fn stay_price(Json(req): Json<StayPriceRequest>) -> Result<Json<StayPriceResponse>> {
    let price = calculate_stay_price(
        req.check_in,
        req.check_out,
        req.unit_id,
        &req.unit_prices,
        &req.tariff_periods,
    )?;

    Ok(Json(StayPriceResponse {
        total: price.total.into(),
        nights: (req.check_out - req.check_in).num_days(),
        priced_nights: price.priced_nights(),
        breakdown: price.breakdown,
    }))
}

async fn promotion(Json(req): Json<PromotionRequest>) -> Json<PromotionResponse> {
    let promotion = calculate_promotion(req.nights, &req.promotions, req.tariff_period_id);

    Json(PromotionResponse {
        promotion: promotion.map(|p| AppliedPromotionResponse {
            promotion_id: p.promotion_id,
            min_nights: p.min_nights,
            percentage: p.percentage,
            description: p.description,
        }),
    })
}

async fn service_price(
    Json(req): Json<ServicePriceRequest>,
) -> Result<Json<ServicePriceResponse>> {
    let total = calculate_service_price(req.adults, req.children, req.days, &req.price)?;

    Ok(Json(ServicePriceResponse {
        total: total.into(),
        per_day: req.price.is_per_day(),
    }))
}
