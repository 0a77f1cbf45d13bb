use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::reit::regulation::Jurisdiction;
use crate::types::Percent;

/// Returned when a jurisdiction has no grid entry for the combination.
pub const US_FALLBACK_CAP_RATE: Percent = dec!(6.0);
pub const OTHER_FALLBACK_CAP_RATE: Percent = dec!(8.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Retail,
    Office,
    Hospitality,
    Education,
    Industrial,
    Multifamily,
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        PropertyType::Retail,
        PropertyType::Office,
        PropertyType::Hospitality,
        PropertyType::Education,
        PropertyType::Industrial,
        PropertyType::Multifamily,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "retail" => Some(PropertyType::Retail),
            "office" => Some(PropertyType::Office),
            "hospitality" | "hotel" => Some(PropertyType::Hospitality),
            "education" => Some(PropertyType::Education),
            "industrial" => Some(PropertyType::Industrial),
            "multifamily" | "residential" => Some(PropertyType::Multifamily),
            _ => None,
        }
    }
}

/// Location quality of the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    /// Prime urban / core market
    Prime,
    /// Secondary / suburban market
    Secondary,
}

impl MarketType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "prime" => Some(MarketType::Prime),
            "secondary" => Some(MarketType::Secondary),
            _ => None,
        }
    }
}

/// Building quality class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyClass {
    A,
    B,
    C,
}

impl PropertyClass {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "A" => Some(PropertyClass::A),
            "B" => Some(PropertyClass::B),
            "C" => Some(PropertyClass::C),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            PropertyClass::A => 0,
            PropertyClass::B => 1,
            PropertyClass::C => 2,
        }
    }
}

/// Prime and secondary rows, each A/B/C.
type Grid = [[Percent; 3]; 2];

fn us_grid(property_type: PropertyType) -> Grid {
    match property_type {
        PropertyType::Retail => [[dec!(4.5), dec!(5.5), dec!(6.5)], [dec!(5.5), dec!(6.5), dec!(7.5)]],
        PropertyType::Office => [[dec!(4.0), dec!(5.0), dec!(6.0)], [dec!(5.0), dec!(6.0), dec!(7.0)]],
        PropertyType::Hospitality => {
            [[dec!(6.5), dec!(7.5), dec!(8.5)], [dec!(7.5), dec!(8.5), dec!(9.5)]]
        }
        PropertyType::Education => {
            [[dec!(5.5), dec!(6.0), dec!(6.5)], [dec!(6.0), dec!(6.5), dec!(7.0)]]
        }
        PropertyType::Industrial => {
            [[dec!(4.0), dec!(5.0), dec!(6.0)], [dec!(5.0), dec!(6.0), dec!(7.0)]]
        }
        PropertyType::Multifamily => {
            [[dec!(3.5), dec!(4.5), dec!(5.5)], [dec!(4.5), dec!(5.5), dec!(6.5)]]
        }
    }
}

fn peru_grid(property_type: PropertyType) -> Grid {
    match property_type {
        PropertyType::Retail => [[dec!(7.0), dec!(8.0), dec!(9.0)], [dec!(8.0), dec!(9.0), dec!(10.0)]],
        PropertyType::Office => [[dec!(7.5), dec!(8.5), dec!(9.5)], [dec!(8.5), dec!(9.5), dec!(10.5)]],
        PropertyType::Hospitality => {
            [[dec!(8.5), dec!(9.5), dec!(10.5)], [dec!(9.5), dec!(10.5), dec!(11.5)]]
        }
        PropertyType::Education => {
            [[dec!(7.5), dec!(8.0), dec!(8.5)], [dec!(8.0), dec!(8.5), dec!(9.0)]]
        }
        PropertyType::Industrial => {
            [[dec!(8.0), dec!(9.0), dec!(10.0)], [dec!(9.0), dec!(10.0), dec!(11.0)]]
        }
        PropertyType::Multifamily => {
            [[dec!(6.5), dec!(7.5), dec!(8.5)], [dec!(7.5), dec!(8.5), dec!(9.5)]]
        }
    }
}

/// Market cap rate (percent) for a property profile.
///
/// Country and the three profile fields are free-form codes; any code the
/// grid does not know resolves to 6.0 for the US and 8.0 elsewhere.
pub fn recommended_cap_rate(
    country: &str,
    property_type: &str,
    market_type: &str,
    property_class: &str,
) -> Percent {
    let jurisdiction = Jurisdiction::from_code(country);
    let fallback = match jurisdiction {
        Some(Jurisdiction::Us) => US_FALLBACK_CAP_RATE,
        _ => OTHER_FALLBACK_CAP_RATE,
    };

    let profile = (
        PropertyType::from_code(property_type),
        MarketType::from_code(market_type),
        PropertyClass::from_code(property_class),
    );
    let rate = match (jurisdiction, profile) {
        (Some(j), (Some(pt), Some(mt), Some(pc))) => Some(lookup(j, pt, mt, pc)),
        _ => None,
    };

    match rate {
        Some(r) => r,
        None => {
            tracing::debug!(
                country,
                property_type,
                market_type,
                property_class,
                %fallback,
                "no cap rate benchmark for profile"
            );
            fallback
        }
    }
}

/// Grid value for a fully typed profile.
pub fn lookup(
    jurisdiction: Jurisdiction,
    property_type: PropertyType,
    market_type: MarketType,
    property_class: PropertyClass,
) -> Percent {
    let grid = match jurisdiction {
        Jurisdiction::Us => us_grid(property_type),
        Jurisdiction::Peru => peru_grid(property_type),
    };
    let row = match market_type {
        MarketType::Prime => 0,
        MarketType::Secondary => 1,
    };
    grid[row][property_class.index()]
}
