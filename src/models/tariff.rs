//! Tariff periods and the per-unit nightly price grid.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Priority tier of a tariff period. `First` overrides `Second` on shared nights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tariff_degree", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Degree {
    First,
    Second,
}

impl Degree {
    /// Lower ranks are consulted first when resolving a night.
    pub fn rank(self) -> u8 {
        match self {
            Degree::First => 0,
            Degree::Second => 1,
        }
    }
}

/// Tariff period from tariff_periods
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TariffPeriod {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub degree: Degree,
    pub deposit_percentage: Decimal,
}

impl TariffPeriod {
    /// Both bounds are inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Number of calendar days covered, counting both ends.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Nightly price of a unit under a tariff period, from unit_prices
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UnitPrice {
    pub unit_id: Uuid,
    pub tariff_period_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_night: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn period(start: &str, end: &str) -> TariffPeriod {
        TariffPeriod {
            id: Uuid::new_v4(),
            name: "Verano".to_string(),
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            degree: Degree::First,
            deposit_percentage: dec!(30),
        }
    }

    #[test]
    fn test_contains_is_inclusive_on_both_ends() {
        let p = period("2024-01-01", "2024-01-31");
        assert!(p.contains("2024-01-01".parse().unwrap()));
        assert!(p.contains("2024-01-31".parse().unwrap()));
        assert!(!p.contains("2023-12-31".parse().unwrap()));
        assert!(!p.contains("2024-02-01".parse().unwrap()));
    }

    #[test]
    fn test_span_days() {
        assert_eq!(period("2024-01-01", "2024-01-31").span_days(), 31);
        assert_eq!(period("2024-03-05", "2024-03-05").span_days(), 1);
    }

    #[test]
    fn test_degree_serde_is_lowercase() {
        let json = serde_json::to_string(&Degree::Second).unwrap();
        assert_eq!(json, "\"second\"");
        let parsed: Degree = serde_json::from_str("\"first\"").unwrap();
        assert_eq!(parsed, Degree::First);
    }
}
