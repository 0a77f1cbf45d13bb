use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{capitalised, to_rate, Money, Percent};

use super::input::{ExpenseApproach, InvestmentInput};

/// Annual net operating income and its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiBreakdown {
    /// Monthly rent × 12 (occupancy is not applied on this path)
    pub annual_rental_income: Money,
    pub annual_operating_expenses: Money,
    pub annual_land_lease_cost: Money,
    pub noi: Money,
    /// Monthly expenses used downstream; derived and rounded in percentage mode
    pub monthly_expenses: Money,
    /// Value estimate behind percentage-mode expenses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_property_value: Option<Money>,
}

/// Compute annual NOI.
///
/// In percentage mode operating expenses are `estimated value × operating rate`,
/// where `estimated value = rent × 12 × occupancy / cap_rate`. The derived
/// monthly figure is rounded to whole currency units and returned as
/// `monthly_expenses`, while NOI keeps the unrounded annual amount.
pub fn compute_noi(
    input: &InvestmentInput,
    monthly_rental_income: Money,
    cap_rate: Percent,
    operating_expense_rate: Percent,
    warnings: &mut Vec<String>,
) -> NoiBreakdown {
    let annual_rental_income = monthly_rental_income * dec!(12);

    let (annual_operating_expenses, monthly_expenses, estimated_property_value) =
        match input.expense_approach {
            ExpenseApproach::Direct => (input.expenses * dec!(12), input.expenses, None),
            ExpenseApproach::Percentage => {
                let occupied_income = annual_rental_income * to_rate(input.occupancy_rate);
                let estimated = match capitalised(occupied_income, to_rate(cap_rate)) {
                    Some(v) => v,
                    None => {
                        warnings.push(format!(
                            "Cap rate {cap_rate}% cannot estimate a value; percentage-based expenses set to zero"
                        ));
                        Decimal::ZERO
                    }
                };
                let annual = estimated * to_rate(operating_expense_rate);
                let monthly = (annual / dec!(12))
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
                (annual, monthly, Some(estimated))
            }
        };

    let annual_land_lease_cost = input.annual_land_lease_cost();
    let noi = annual_rental_income - annual_operating_expenses - annual_land_lease_cost;

    tracing::debug!(
        %annual_rental_income,
        %annual_operating_expenses,
        %annual_land_lease_cost,
        %noi,
        "net operating income"
    );

    NoiBreakdown {
        annual_rental_income,
        annual_operating_expenses,
        annual_land_lease_cost,
        noi,
        monthly_expenses,
        estimated_property_value,
    }
}
