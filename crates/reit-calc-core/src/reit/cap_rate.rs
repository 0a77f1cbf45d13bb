use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ReitCalcError;
use crate::types::{to_percent, to_rate, Money, Percent, Rate};
use crate::ReitCalcResult;

use super::input::InvestmentInput;
use super::regulation::Regulation;

/// Absolute tolerance, in percentage points, for treating user rates as the defaults.
pub const DEFAULT_RATE_TOLERANCE: Percent = dec!(0.01);

/// Yield and expense rates after jurisdiction defaults have been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRates {
    pub target_yield: Percent,
    pub operating_expense_rate: Percent,
    pub admin_expense_rate: Percent,
}

impl UserRates {
    pub fn resolve(input: &InvestmentInput, regulation: &Regulation) -> Self {
        Self {
            target_yield: input
                .target_reit_yield
                .unwrap_or(regulation.default_target_yield),
            operating_expense_rate: input
                .operating_expense_rate
                .unwrap_or_else(|| to_percent(regulation.default_operating_expense_rate)),
            admin_expense_rate: input
                .admin_expense_rate
                .unwrap_or_else(|| to_percent(regulation.default_admin_expense_rate)),
        }
    }

    /// Both expense rates sit within [`DEFAULT_RATE_TOLERANCE`] of the regulation defaults.
    pub fn matches_defaults(&self, regulation: &Regulation) -> bool {
        let op_gap = (self.operating_expense_rate
            - to_percent(regulation.default_operating_expense_rate))
        .abs();
        let admin_gap =
            (self.admin_expense_rate - to_percent(regulation.default_admin_expense_rate)).abs();
        op_gap < DEFAULT_RATE_TOLERANCE && admin_gap < DEFAULT_RATE_TOLERANCE
    }
}

/// The two cap rates every calculation carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapRates {
    /// Built from the caller's (possibly edited) expense rates
    pub user: Rate,
    /// Built from the jurisdiction's default expense rates only
    pub standardized: Rate,
}

/// Regulation-adjusted cap rate:
/// `target_yield / distribution_requirement + operating_rate + admin_rate`.
///
/// The yield has to be grossed up for the share of income the vehicle must
/// distribute, and the property must also carry its operating and vehicle costs.
pub fn adjusted_cap_rate(
    target_yield: Percent,
    distribution_requirement: Rate,
    operating_expense_rate: Rate,
    admin_expense_rate: Rate,
) -> ReitCalcResult<Rate> {
    let grossed_up = to_rate(target_yield)
        .checked_div(distribution_requirement)
        .ok_or_else(|| ReitCalcError::DivisionByZero {
            context: "adjusted cap rate (target yield / distribution requirement)".into(),
        })?;
    Ok(grossed_up + operating_expense_rate + admin_expense_rate)
}

/// Derive the user-rate and standardized cap rates for one calculation.
pub fn derive_cap_rates(rates: &UserRates, regulation: &Regulation) -> ReitCalcResult<CapRates> {
    let user = adjusted_cap_rate(
        rates.target_yield,
        regulation.distribution_requirement,
        to_rate(rates.operating_expense_rate),
        to_rate(rates.admin_expense_rate),
    )?;
    let standardized = adjusted_cap_rate(
        rates.target_yield,
        regulation.distribution_requirement,
        regulation.default_operating_expense_rate,
        regulation.default_admin_expense_rate,
    )?;

    tracing::debug!(%user, %standardized, "adjusted cap rates");

    Ok(CapRates { user, standardized })
}

/// Cap rate shown to the user: percentage rounded to two decimals.
pub fn display_cap_rate(rate: Rate) -> Percent {
    to_percent(rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// NOI feeding the standardized benchmark: occupancy-adjusted rent less expenses.
pub fn standardized_noi(
    monthly_rental_income: Money,
    occupancy_rate: Percent,
    monthly_expenses: Money,
) -> Money {
    monthly_rental_income * dec!(12) * to_rate(occupancy_rate) - monthly_expenses * dec!(12)
}
