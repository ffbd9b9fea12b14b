//! Pricing engine for lodge stays.
//!
//! The calculators, period resolver and money formatting are pure; `services`
//! loads catalog data from the store and `quotes` assembles it into quotes.

pub mod calculators;
pub mod grid;
pub mod money;
pub mod periods;
pub mod quotes;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{
    apply_discount, calculate_deposit, calculate_promotion, calculate_service_price,
    calculate_stay_price, AppliedPromotion, PeriodBreakdown, PricingError, StayPrice,
};
pub use money::{format_currency, round_money, MoneyFormat};
pub use periods::PeriodResolver;
pub use quotes::PricingCatalog;
pub use routes::router;
