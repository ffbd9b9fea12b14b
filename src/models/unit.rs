//! Accommodation units.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::UnknownVariant;

/// Bed layout of a unit. `Combinable` satisfies any requested layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedType {
    Simple,
    Matrimonial,
    Combinable,
}

impl BedType {
    pub fn as_str(self) -> &'static str {
        match self {
            BedType::Simple => "simple",
            BedType::Matrimonial => "matrimonial",
            BedType::Combinable => "combinable",
        }
    }

    /// Whether a unit with this layout can host a guest asking for `requested`.
    pub fn accommodates(self, requested: BedType) -> bool {
        self == requested || self == BedType::Combinable
    }
}

impl fmt::Display for BedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BedType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "simple" => Ok(BedType::Simple),
            "matrimonial" => Ok(BedType::Matrimonial),
            "combinable" => Ok(BedType::Combinable),
            _ => Err(UnknownVariant {
                kind: "bed_type",
                value,
            }),
        }
    }
}

/// Accommodation unit from accommodation_units
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AccommodationUnit {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub min_capacity: i32,
    pub max_capacity: i32,
    pub allows_children: bool,
    pub allows_pets: bool,
    #[sqlx(try_from = "String")]
    pub bed_type: BedType,
}
