//! Entity rows read from the reservation store.

pub mod promotion;
pub mod service;
pub mod tariff;
pub mod template;
pub mod unit;

pub use promotion::{PeriodExclusion, Promotion, PromotionUnit};
pub use service::{AdditionalService, ServicePrice};
pub use tariff::{Degree, TariffPeriod, UnitPrice};
pub use template::MessageTemplate;
pub use unit::{AccommodationUnit, BedType};

/// Raised when a text column holds a value no enum variant matches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
