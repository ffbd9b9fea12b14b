//! HTTP surface

pub mod admin;
pub mod health;
pub mod quotes;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::pricing;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/api/cache/stats", get(health::cache_stats))
        .nest("/api/pricing", pricing::router())
        .route("/api/units/search", post(quotes::search_units))
        .route("/api/quotes/availability", post(quotes::availability))
        .route("/api/quotes/reservation", post(quotes::reservation))
        .route("/api/admin/templates", get(admin::list_templates))
        .route("/api/admin/templates/:template_type", put(admin::update_template))
        .route("/api/admin/price-grid/gaps", get(admin::price_grid_gaps))
        .route("/api/admin/cache/invalidate", post(admin::invalidate_cache))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
