//! View models handed to the message composer.
//!
//! These are assembled per request from store data and never persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Guest composition of an inquiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Guests {
    pub adults: u32,
    pub children: u32,
}

impl Guests {
    pub fn total(&self) -> u32 {
        self.adults + self.children
    }

    /// `"5 personas (3 adultos, 2 niños)"`, or `"2 personas"` without children.
    pub fn describe(&self) -> String {
        if self.children > 0 {
            format!(
                "{} personas ({} adultos, {} niños)",
                self.total(),
                self.adults,
                self.children
            )
        } else {
            format!("{} personas", self.adults)
        }
    }
}

/// Dates and guests shared by both message kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StayDetails {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub guests: Guests,
}

/// Promotion line advertised at the top of an availability message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionBanner {
    pub min_nights: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub percentage: Decimal,
    pub description: String,
}

/// Discounted nightly price of an available unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDiscount {
    #[serde(with = "rust_decimal::serde::str")]
    pub percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_night: Decimal,
}

/// Unit offered in an availability message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableUnit {
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_night: Decimal,
    pub discount: Option<UnitDiscount>,
}

/// Optional service offered in an availability message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceOffer {
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub adult_price: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub child_price: Option<Decimal>,
    pub per_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityQuote {
    pub stay: StayDetails,
    pub promotions: Vec<PromotionBanner>,
    pub units: Vec<AvailableUnit>,
    pub services: Vec<ServiceOffer>,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposit_percentage: Decimal,
}

/// Unit line of a reservation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationUnit {
    pub name: String,
    pub nights: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_night: Decimal,
    /// After discount
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub discount_percentage: Option<Decimal>,
}

/// Service line of a reservation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationService {
    pub name: String,
    pub adults: u32,
    pub children: u32,
    pub days: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_person: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
}

impl ReservationService {
    /// Compact `{people}p{days}d` code, e.g. `3p4d`.
    pub fn guest_code(&self) -> String {
        format!("{}p{}d", self.adults + self.children, self.days)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationQuote {
    pub stay: StayDetails,
    pub units: Vec<ReservationUnit>,
    pub services: Vec<ReservationService>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposit_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposit: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_guest_description() {
        let couple = Guests { adults: 2, children: 0 };
        assert_eq!(couple.describe(), "2 personas");

        let family = Guests { adults: 3, children: 2 };
        assert_eq!(family.describe(), "5 personas (3 adultos, 2 niños)");
    }

    #[test]
    fn test_guest_code_counts_children() {
        let line = ReservationService {
            name: "Desayuno".to_string(),
            adults: 2,
            children: 1,
            days: 4,
            price_per_person: dec!(10),
            subtotal: dec!(120),
        };
        assert_eq!(line.guest_code(), "3p4d");
    }
}
