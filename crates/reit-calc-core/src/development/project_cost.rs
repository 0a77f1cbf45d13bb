use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReitCalcError;
use crate::reit::input::{bound_input, InvestmentInput, LandOwnership};
use crate::time_value::{amortizing_payment, annuity_present_value, npv};
use crate::types::{percent_ratio, to_rate, with_metadata, ComputationOutput, Money, Percent};
use crate::ReitCalcResult;

/// Lender coverage assumed when the input carries no target DSCR.
pub const DEFAULT_TARGET_DSCR: Decimal = dec!(1.25);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Cost-basis returns for a development: what the project earns on what it costs to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCostAnalysis {
    /// Land (purchase only) + construction + other costs
    pub total_project_cost: Money,
    pub annual_rental_income: Money,
    pub annual_operating_expenses: Money,
    pub annual_land_lease_cost: Money,
    pub annual_noi: Money,
    /// Unlevered cap rate on cost, in percent
    pub yield_on_cost: Percent,
    pub monthly_payment: Money,
    pub annual_debt_service: Money,
    pub annual_cash_flow: Money,
    pub equity_invested: Money,
    /// Cash-on-cash return on equity, in percent
    pub leveraged_roi: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_service_coverage_ratio: Option<Decimal>,
    /// Present value of the ground lease over its term (lease only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_npv: Option<Money>,
    pub target_dscr: Decimal,
    /// Largest loan whose debt service the pre-lease NOI covers at `target_dscr`
    pub max_supportable_loan: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse a development on its cost basis.
///
/// Unlike [`crate::reit::calculate`], occupancy and expense percentages play no
/// part here and loan fields are used exactly as given.
pub fn analyze_project_cost(
    raw_input: &InvestmentInput,
) -> ReitCalcResult<ComputationOutput<ProjectCostAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let bounded = bound_input(raw_input, &mut warnings);
    let input = &bounded;

    let land = match input.land_ownership {
        LandOwnership::Purchase => input.land_price,
        LandOwnership::Lease => Decimal::ZERO,
    };
    let total_project_cost = land + input.construction_cost + input.other_costs;
    if total_project_cost <= Decimal::ZERO {
        return Err(ReitCalcError::InvalidInput {
            field: "construction_cost".into(),
            reason: "Total project cost (land + construction + other) must be positive".into(),
        });
    }

    let rental_income = match input.rental_income {
        Some(r) => r,
        None => {
            warnings.push("No rental income given; income treated as zero".into());
            Decimal::ZERO
        }
    };

    let annual_rental_income = rental_income * dec!(12);
    let annual_operating_expenses = input.expenses * dec!(12);
    let annual_land_lease_cost = input.annual_land_lease_cost();
    let noi_before_lease = annual_rental_income - annual_operating_expenses;
    let annual_noi = noi_before_lease - annual_land_lease_cost;

    let yield_on_cost = percent_ratio(annual_noi, total_project_cost).unwrap_or(Decimal::ZERO);

    let monthly_rate = to_rate(input.interest_rate) / dec!(12);
    let months = input.loan_term.saturating_mul(12);
    let monthly_payment = match amortizing_payment(input.loan_amount, monthly_rate, months) {
        Some(p) => p,
        None if months == 0 => {
            warnings.push("Loan term is zero; debt service not computed".into());
            Decimal::ZERO
        }
        None => {
            warnings.push("Loan payment is not representable; debt service not computed".into());
            Decimal::ZERO
        }
    };
    let annual_debt_service = monthly_payment * dec!(12);
    let annual_cash_flow = annual_noi - annual_debt_service;

    let equity_invested = total_project_cost - input.loan_amount;
    let leveraged_roi = if equity_invested > Decimal::ZERO {
        percent_ratio(annual_cash_flow, equity_invested).unwrap_or(Decimal::ZERO)
    } else {
        warnings.push("Loan covers the full project cost; leveraged ROI not meaningful".into());
        Decimal::ZERO
    };

    let debt_service_coverage_ratio = if annual_debt_service > Decimal::ZERO {
        annual_noi.checked_div(annual_debt_service)
    } else {
        None
    };

    let lease_npv = match input.land_ownership {
        LandOwnership::Lease => match lease_present_value(input) {
            Ok(pv) => Some(pv),
            Err(e) => {
                tracing::warn!(error = %e, "lease present value unavailable");
                warnings.push(format!(
                    "Lease present value could not be computed at {}% interest; omitted",
                    input.interest_rate
                ));
                None
            }
        },
        LandOwnership::Purchase => None,
    };

    let target_dscr = input
        .target_dscr
        .filter(|d| *d > Decimal::ZERO)
        .unwrap_or(DEFAULT_TARGET_DSCR);
    let max_monthly_payment = target_dscr
        .checked_mul(dec!(12))
        .and_then(|coverage| noi_before_lease.checked_div(coverage))
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);
    let max_supportable_loan =
        annuity_present_value(max_monthly_payment, monthly_rate, months).unwrap_or(Decimal::ZERO);

    tracing::debug!(
        %total_project_cost,
        %annual_noi,
        %yield_on_cost,
        %leveraged_roi,
        %max_supportable_loan,
        "project cost analysis"
    );

    let result = ProjectCostAnalysis {
        total_project_cost,
        annual_rental_income,
        annual_operating_expenses,
        annual_land_lease_cost,
        annual_noi,
        yield_on_cost,
        monthly_payment,
        annual_debt_service,
        annual_cash_flow,
        equity_invested,
        leveraged_roi,
        debt_service_coverage_ratio,
        lease_npv,
        target_dscr,
        max_supportable_loan,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Development Cost-Basis Return Analysis",
        raw_input,
        warnings,
        elapsed,
        result,
    ))
}

/// Ground lease payments discounted at the loan interest rate, years 1..=term.
fn lease_present_value(input: &InvestmentInput) -> ReitCalcResult<Money> {
    let mut flows = vec![Decimal::ZERO];
    flows.extend(std::iter::repeat(input.land_lease_annual).take(input.land_lease_term as usize));
    npv(to_rate(input.interest_rate), &flows)
}
