use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{capitalised, percent_ratio, Money, Rate};

use super::cap_rate::CapRates;

/// Values derived from NOI and the two cap rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    /// NOI / user-rate cap rate
    pub property_value: Money,
    /// Occupancy-adjusted NOI / standardized cap rate
    pub max_property_cost_for_reit: Money,
    /// Investment basis for return metrics
    pub total_investment: Money,
    /// `total_investment` was set to the standardized benchmark
    pub reconciled_to_benchmark: bool,
    pub max_affordable_land_price: Money,
}

/// Inputs to [`value_property`].
#[derive(Debug, Clone)]
pub struct ValuationInputs {
    pub noi: Money,
    pub standardized_noi: Money,
    /// Rent less expenses, annualised, with neither occupancy nor lease applied
    pub unadjusted_noi: Money,
    pub construction_cost: Money,
    pub other_costs: Money,
    /// User expense rates equal the jurisdiction defaults
    pub uses_default_rates: bool,
}

/// Capitalise NOI at `cap_rate`. A zero cap rate, or one small enough to push the
/// value past [`crate::types::MAX_CAPITALISED_VALUE`], yields zero and a warning.
pub fn capitalise(noi: Money, cap_rate: Rate, context: &str, warnings: &mut Vec<String>) -> Money {
    match capitalised(noi, cap_rate) {
        Some(v) => v,
        None => {
            warnings.push(format!(
                "{context}: cap rate {cap_rate} cannot capitalise NOI, value set to zero"
            ));
            Decimal::ZERO
        }
    }
}

/// Residual land value: capitalised value less construction and other costs, floored at zero.
pub fn max_affordable_land_price(
    unadjusted_noi: Money,
    cap_rate: Rate,
    construction_cost: Money,
    other_costs: Money,
    warnings: &mut Vec<String>,
) -> Money {
    let value = capitalise(unadjusted_noi, cap_rate, "Max land price", warnings);
    (value - construction_cost - other_costs).max(Decimal::ZERO)
}

/// Derive property value, REIT benchmark and total investment.
///
/// When the caller's expense rates are the jurisdiction defaults the two
/// valuations describe the same property, so `total_investment` takes the
/// benchmark figure instead of showing two diverging numbers.
pub fn value_property(
    inputs: &ValuationInputs,
    caps: &CapRates,
    warnings: &mut Vec<String>,
) -> Valuation {
    let property_value = capitalise(inputs.noi, caps.user, "Property value", warnings);
    let max_property_cost_for_reit = capitalise(
        inputs.standardized_noi,
        caps.standardized,
        "Max property cost for REIT",
        warnings,
    );

    let (total_investment, reconciled_to_benchmark) = if inputs.uses_default_rates {
        (max_property_cost_for_reit, true)
    } else {
        (property_value, false)
    };

    let max_affordable_land_price = max_affordable_land_price(
        inputs.unadjusted_noi,
        caps.user,
        inputs.construction_cost,
        inputs.other_costs,
        warnings,
    );

    if property_value < Decimal::ZERO {
        warnings.push("Negative NOI produces a negative property value".into());
    }
    if !reconciled_to_benchmark && max_property_cost_for_reit > Decimal::ZERO {
        let gap = percent_ratio(
            (property_value - max_property_cost_for_reit).abs(),
            max_property_cost_for_reit,
        );
        if let Some(gap) = gap.filter(|g| *g > dec!(25)) {
            warnings.push(format!(
                "Custom valuation differs from the REIT benchmark by {gap:.1}%"
            ));
        }
    }

    tracing::debug!(
        %property_value,
        %max_property_cost_for_reit,
        %total_investment,
        reconciled_to_benchmark,
        "valuation"
    );

    Valuation {
        property_value,
        max_property_cost_for_reit,
        total_investment,
        reconciled_to_benchmark,
        max_affordable_land_price,
    }
}
