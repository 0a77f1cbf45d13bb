use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReitCalcError;
use crate::reit::regulation::Jurisdiction;
use crate::types::{percent_ratio, with_metadata, ComputationOutput, Money, Percent};
use crate::ReitCalcResult;

/// Pattern of hotel occupancy through the year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seasonality {
    /// Year-round demand
    #[default]
    Balanced,
    /// Highly seasonal
    Seasonal,
    /// Weekend-dominant
    Weekend,
    /// Business-travel dominant
    Business,
    /// Event-driven
    Events,
}

impl Seasonality {
    pub fn risk_label(self) -> &'static str {
        match self {
            Seasonality::Balanced => "Low",
            Seasonality::Business => "Medium",
            Seasonality::Weekend => "Medium-High",
            Seasonality::Events => "High",
            Seasonality::Seasonal => "Very High",
        }
    }

    /// Distribution reserve before the jurisdiction multiplier, in percent.
    fn base_reserve(self) -> Percent {
        match self {
            Seasonality::Balanced => dec!(2),
            Seasonality::Business => dec!(4),
            Seasonality::Weekend => dec!(5),
            Seasonality::Events => dec!(7),
            Seasonality::Seasonal => dec!(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HospitalityInput {
    pub country: String,
    pub seasonality: Seasonality,
    /// Occupancy in percent
    pub occupancy_rate: Percent,
    /// Average daily rate
    pub adr: Money,
    /// Revenue per available room
    pub rev_par: Money,
}

impl Default for HospitalityInput {
    fn default() -> Self {
        Self {
            country: "us".into(),
            seasonality: Seasonality::Balanced,
            occupancy_rate: dec!(95),
            adr: Decimal::ZERO,
            rev_par: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalityMetrics {
    /// Expected gross operating profit as a share of revenue, in percent
    pub gross_operating_profit: Percent,
    pub seasonality_risk: String,
    /// Property RevPAR against the market average, in percent
    pub market_penetration_index: Percent,
    /// Reserve to hold back from distributions, in percent
    pub distribution_reserve: Percent,
    /// ADR × occupancy, for comparison with the RevPAR given
    pub implied_rev_par: Money,
}

/// Market assumptions for one jurisdiction.
struct HotelMarket {
    /// Occupancy at which the base GOP applies
    reference_occupancy: Percent,
    market_average_rev_par: Money,
    reserve_multiplier: Decimal,
}

fn hotel_market(jurisdiction: Jurisdiction) -> HotelMarket {
    match jurisdiction {
        Jurisdiction::Us => HotelMarket {
            reference_occupancy: dec!(65),
            market_average_rev_par: dec!(100),
            reserve_multiplier: Decimal::ONE,
        },
        Jurisdiction::Peru => HotelMarket {
            reference_occupancy: dec!(60),
            market_average_rev_par: dec!(70),
            reserve_multiplier: dec!(1.3),
        },
    }
}

fn base_gop(jurisdiction: Jurisdiction, seasonality: Seasonality) -> Percent {
    match (jurisdiction, seasonality) {
        (Jurisdiction::Us, Seasonality::Balanced) => dec!(38),
        (Jurisdiction::Us, Seasonality::Seasonal) => dec!(32),
        (Jurisdiction::Us, Seasonality::Weekend) => dec!(35),
        (Jurisdiction::Us, Seasonality::Business) => dec!(42),
        (Jurisdiction::Us, Seasonality::Events) => dec!(36),
        (Jurisdiction::Peru, Seasonality::Balanced) => dec!(34),
        (Jurisdiction::Peru, Seasonality::Seasonal) => dec!(29),
        (Jurisdiction::Peru, Seasonality::Weekend) => dec!(32),
        (Jurisdiction::Peru, Seasonality::Business) => dec!(38),
        (Jurisdiction::Peru, Seasonality::Events) => dec!(33),
    }
}

/// Operating metrics specific to hotel REITs.
///
/// Countries without a hotel market profile are treated as Peru, the
/// non-US profile.
pub fn hospitality_metrics(
    input: &HospitalityInput,
) -> ReitCalcResult<ComputationOutput<HospitalityMetrics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.occupancy_rate < Decimal::ZERO || input.occupancy_rate > dec!(100) {
        return Err(ReitCalcError::InvalidInput {
            field: "occupancy_rate".into(),
            reason: "Occupancy must be between 0 and 100".into(),
        });
    }

    let jurisdiction = Jurisdiction::from_code(&input.country).unwrap_or(Jurisdiction::Peru);
    let market = hotel_market(jurisdiction);

    let occupancy_adjustment = (input.occupancy_rate - market.reference_occupancy) * dec!(0.2);
    let gross_operating_profit = base_gop(jurisdiction, input.seasonality) + occupancy_adjustment;

    let market_penetration_index = percent_ratio(input.rev_par, market.market_average_rev_par)
        .unwrap_or_else(|| {
            warnings.push(format!(
                "RevPAR {} is out of range; penetration set to zero",
                input.rev_par
            ));
            Decimal::ZERO
        });

    let distribution_reserve = input.seasonality.base_reserve() * market.reserve_multiplier;

    let implied_rev_par = input.adr * (input.occupancy_rate / dec!(100));
    if input.adr > Decimal::ZERO && input.rev_par > Decimal::ZERO {
        let gap = (implied_rev_par - input.rev_par)
            .abs()
            .checked_div(input.rev_par)
            .unwrap_or(Decimal::MAX);
        if gap > dec!(0.10) {
            warnings.push(format!(
                "RevPAR {} is inconsistent with ADR × occupancy ({implied_rev_par})",
                input.rev_par
            ));
        }
    }

    let result = HospitalityMetrics {
        gross_operating_profit,
        seasonality_risk: input.seasonality.risk_label().to_string(),
        market_penetration_index,
        distribution_reserve,
        implied_rev_par,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Hotel REIT Operating Metrics",
        input,
        warnings,
        elapsed,
        result,
    ))
}
