use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{to_percent, with_metadata, ComputationOutput, Money, Percent, Rate, Years};
use crate::ReitCalcResult;

use super::cap_rate::{derive_cap_rates, display_cap_rate, standardized_noi, UserRates};
use super::financing::{finance, resolve_loan_terms};
use super::input::{bound_input, validate_input, ExpenseApproach, InvestmentInput, LandOwnership};
use super::noi::compute_noi;
use super::regulation::{RegulationTable, StandardRegulations};
use super::returns::{compute_returns, effective_appreciation, ReturnInputs};
use super::valuation::{value_property, ValuationInputs};

const METHODOLOGY: &str = "REIT/FIBRA Regulation-Adjusted Income Valuation";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Resolved parameters behind a result, after defaults and write-backs.
///
/// Carries enough to render the full derivation from the result alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametersUsed {
    pub country: String,
    pub regulation_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    pub land_ownership: LandOwnership,
    pub expense_approach: ExpenseApproach,
    pub distribution_requirement: Rate,
    pub rental_income: Money,
    /// Monthly expenses actually used (derived and rounded in percentage mode)
    pub expenses: Money,
    pub occupancy_rate: Percent,
    /// Growth rate after the zero fallback
    pub appreciation_rate: Percent,
    pub target_reit_yield: Percent,
    pub operating_expense_rate: Percent,
    pub admin_expense_rate: Percent,
    /// Cap rate used to estimate value for percentage-based expenses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_rate: Option<Percent>,
    pub land_price: Money,
    pub construction_cost: Money,
    pub other_costs: Money,
    pub land_lease_annual: Money,
    pub land_lease_term: Years,
    pub loan_amount: Money,
    pub interest_rate: Percent,
    pub loan_term: Years,
    /// Loan fields that took a jurisdiction default
    pub defaulted_loan_fields: Vec<String>,
    pub annual_rental_income: Money,
    pub annual_operating_expenses: Money,
    pub annual_land_lease_cost: Money,
    pub loan_to_value: Decimal,
}

/// Output of [`calculate`]. Percent-valued fields are whole numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub total_investment: Money,
    /// Annual NOI
    pub annual_net_income: Money,
    pub actual_roi: Percent,
    pub leveraged_roi: Percent,
    pub unleveraged_roi: Percent,
    pub break_even_point: Decimal,
    pub net_present_value: Money,
    pub internal_rate_of_return: Percent,
    pub irr_converged: bool,
    pub debt_service_coverage_ratio: Decimal,
    pub max_affordable_land_price: Money,
    pub max_property_cost_for_reit: Money,
    pub adjusted_cap_rate: Percent,
    pub standardized_cap_rate: Percent,
    /// NOI / user-rate cap rate, before reconciliation
    pub property_value: Money,
    pub reconciled_to_benchmark: bool,
    pub monthly_payment: Money,
    pub annual_debt_service: Money,
    pub annual_cash_flow: Money,
    pub projected_cash_flows: Vec<Money>,
    pub terminal_value: Money,
    pub parameters: ParametersUsed,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run a full property calculation against the compiled regulation table.
pub fn calculate(input: &InvestmentInput) -> ReitCalcResult<ComputationOutput<CalculationResult>> {
    calculate_with(&StandardRegulations::default(), input)
}

/// Run a full property calculation against `table`.
///
/// Fails only when monthly rental income is missing or not positive; every
/// other anomaly, including out-of-range magnitudes, is reported as a warning.
pub fn calculate_with(
    table: &dyn RegulationTable,
    raw_input: &InvestmentInput,
) -> ReitCalcResult<ComputationOutput<CalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let bounded = bound_input(raw_input, &mut warnings);
    let input = &bounded;
    let rental_income = validate_input(input, &mut warnings)?;

    let (regulation, fallback) = table.lookup(&input.country);
    if fallback {
        tracing::warn!(country = %input.country, "unknown jurisdiction, using us");
        warnings.push(format!(
            "Unknown country '{}'; US REIT rules applied",
            input.country
        ));
    }

    let rates = UserRates::resolve(input, regulation);
    let caps = derive_cap_rates(&rates, regulation)?;

    let estimation_cap_rate = match input.expense_approach {
        ExpenseApproach::Percentage => Some(match input.cap_rate {
            Some(c) if c > Decimal::ZERO => c,
            _ => display_cap_rate(caps.user),
        }),
        ExpenseApproach::Direct => input.cap_rate,
    };

    let breakdown = compute_noi(
        input,
        rental_income,
        estimation_cap_rate.unwrap_or(Decimal::ZERO),
        rates.operating_expense_rate,
        &mut warnings,
    );

    let valuation = value_property(
        &ValuationInputs {
            noi: breakdown.noi,
            standardized_noi: standardized_noi(
                rental_income,
                input.occupancy_rate,
                breakdown.monthly_expenses,
            ),
            unadjusted_noi: (rental_income - breakdown.monthly_expenses) * Decimal::from(12),
            construction_cost: input.construction_cost,
            other_costs: input.other_costs,
            uses_default_rates: rates.matches_defaults(regulation),
        },
        &caps,
        &mut warnings,
    );

    let terms = resolve_loan_terms(input, regulation, valuation.property_value);
    let financing = finance(
        terms,
        breakdown.noi,
        breakdown.annual_land_lease_cost,
        valuation.property_value,
        &mut warnings,
    );

    let returns = compute_returns(
        &ReturnInputs {
            noi: breakdown.noi,
            property_value: valuation.property_value,
            total_investment: valuation.total_investment,
            loan_amount: financing.terms.loan_amount,
            annual_cash_flow: financing.annual_cash_flow,
            adjusted_cap_rate: caps.user,
            target_yield: rates.target_yield,
            appreciation_rate: input.appreciation_rate,
        },
        &mut warnings,
    );

    let parameters = ParametersUsed {
        country: regulation.jurisdiction.code().to_string(),
        regulation_name: regulation.name.clone(),
        property_type: input.property_type.clone(),
        land_ownership: input.land_ownership,
        expense_approach: input.expense_approach,
        distribution_requirement: regulation.distribution_requirement,
        rental_income,
        expenses: breakdown.monthly_expenses,
        occupancy_rate: input.occupancy_rate,
        appreciation_rate: effective_appreciation(input.appreciation_rate),
        target_reit_yield: rates.target_yield,
        operating_expense_rate: rates.operating_expense_rate,
        admin_expense_rate: rates.admin_expense_rate,
        cap_rate: estimation_cap_rate,
        land_price: input.land_price,
        construction_cost: input.construction_cost,
        other_costs: input.other_costs,
        land_lease_annual: input.land_lease_annual,
        land_lease_term: input.land_lease_term,
        loan_amount: financing.terms.loan_amount,
        interest_rate: financing.terms.interest_rate,
        loan_term: financing.terms.loan_term_years,
        defaulted_loan_fields: financing.terms.defaulted.clone(),
        annual_rental_income: breakdown.annual_rental_income,
        annual_operating_expenses: breakdown.annual_operating_expenses,
        annual_land_lease_cost: breakdown.annual_land_lease_cost,
        loan_to_value: financing.loan_to_value,
    };

    let result = CalculationResult {
        total_investment: valuation.total_investment,
        annual_net_income: breakdown.noi,
        actual_roi: returns.actual_roi,
        leveraged_roi: returns.leveraged_roi,
        unleveraged_roi: returns.unleveraged_roi,
        break_even_point: returns.break_even_point,
        net_present_value: returns.net_present_value,
        internal_rate_of_return: returns.internal_rate_of_return,
        irr_converged: returns.irr_converged,
        debt_service_coverage_ratio: financing.debt_service_coverage_ratio,
        max_affordable_land_price: valuation.max_affordable_land_price,
        max_property_cost_for_reit: valuation.max_property_cost_for_reit,
        adjusted_cap_rate: to_percent(caps.user),
        standardized_cap_rate: to_percent(caps.standardized),
        property_value: valuation.property_value,
        reconciled_to_benchmark: valuation.reconciled_to_benchmark,
        monthly_payment: financing.monthly_payment,
        annual_debt_service: financing.annual_debt_service,
        annual_cash_flow: financing.annual_cash_flow,
        projected_cash_flows: returns.projection.annual_cash_flows,
        terminal_value: returns.projection.terminal_value,
        parameters,
    };

    tracing::debug!(
        country = %result.parameters.country,
        total_investment = %result.total_investment,
        actual_roi = %result.actual_roi,
        warnings = warnings.len(),
        "calculation complete"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(METHODOLOGY, raw_input, warnings, elapsed, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReitCalcError;
    use crate::reit::regulation::{Jurisdiction, Regulation};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample_input() -> InvestmentInput {
        InvestmentInput {
            country: "us".into(),
            rental_income: Some(dec!(30000)),
            expenses: dec!(5000),
            expense_approach: ExpenseApproach::Direct,
            occupancy_rate: dec!(95),
            target_reit_yield: Some(dec!(5)),
            land_price: dec!(1000000),
            construction_cost: dec!(2000000),
            other_costs: dec!(200000),
            loan_amount: dec!(2000000),
            interest_rate: dec!(5),
            loan_term: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_rent_is_rejected() {
        let input = InvestmentInput {
            rental_income: None,
            ..sample_input()
        };
        let err = calculate(&input).unwrap_err();
        assert!(matches!(err, ReitCalcError::InvalidInput { ref field, .. } if field == "rental_income"));
    }

    #[test]
    fn test_direct_scenario_noi() {
        let out = calculate(&sample_input()).unwrap();
        let r = &out.result;
        assert_eq!(r.annual_net_income, dec!(300000));
        assert_eq!(r.parameters.expenses, dec!(5000));
        assert_eq!(r.parameters.country, "us");
        assert_eq!(r.projected_cash_flows.len(), 10);
        assert_eq!(out.methodology, METHODOLOGY);
    }

    #[test]
    fn test_default_rates_reconcile() {
        let out = calculate(&sample_input()).unwrap();
        assert!(out.result.reconciled_to_benchmark);
        assert_eq!(
            out.result.total_investment,
            out.result.max_property_cost_for_reit
        );
    }

    #[test]
    fn test_custom_rates_keep_user_valuation() {
        let input = InvestmentInput {
            operating_expense_rate: Some(dec!(4)),
            ..sample_input()
        };
        let out = calculate(&input).unwrap();
        assert!(!out.result.reconciled_to_benchmark);
        assert_eq!(out.result.total_investment, out.result.property_value);
        assert!(out.result.adjusted_cap_rate > out.result.standardized_cap_rate);
    }

    #[test]
    fn test_percentage_mode_writes_back_expenses() {
        let input = InvestmentInput {
            expense_approach: ExpenseApproach::Percentage,
            cap_rate: Some(dec!(10)),
            operating_expense_rate: Some(dec!(3)),
            ..sample_input()
        };
        let out = calculate(&input).unwrap();
        assert_eq!(out.result.parameters.expenses, dec!(8550));
        assert_eq!(out.result.annual_net_income, dec!(257400));
        assert_eq!(out.result.parameters.cap_rate, Some(dec!(10)));
    }

    #[test]
    fn test_percentage_mode_defaults_cap_rate_to_adjusted() {
        let input = InvestmentInput {
            expense_approach: ExpenseApproach::Percentage,
            ..sample_input()
        };
        let out = calculate(&input).unwrap();
        assert_eq!(out.result.parameters.cap_rate, Some(dec!(10.06)));
    }

    #[test]
    fn test_unknown_country_warns_and_uses_us() {
        let input = InvestmentInput {
            country: "atlantis".into(),
            ..sample_input()
        };
        let out = calculate(&input).unwrap();
        let us = calculate(&sample_input()).unwrap();
        assert_eq!(out.result, us.result);
        assert!(out.warnings.iter().any(|w| w.contains("atlantis")));
    }

    #[test]
    fn test_default_loan_is_sixty_percent_of_value() {
        let input = InvestmentInput {
            loan_amount: Decimal::ZERO,
            interest_rate: Decimal::ZERO,
            loan_term: 0,
            ..sample_input()
        };
        let out = calculate(&input).unwrap();
        let p = &out.result.parameters;
        assert_eq!(p.loan_amount, out.result.property_value * dec!(0.6));
        assert_eq!(p.interest_rate, dec!(5.5));
        assert_eq!(p.loan_term, 20);
    }

    #[test]
    fn test_zero_appreciation_echoes_fallback() {
        let input = InvestmentInput {
            appreciation_rate: Decimal::ZERO,
            ..sample_input()
        };
        let out = calculate(&input).unwrap();
        assert_eq!(out.result.parameters.appreciation_rate, dec!(2));
    }

    struct SingleRegime(Regulation);

    impl RegulationTable for SingleRegime {
        fn lookup(&self, _country: &str) -> (&Regulation, bool) {
            (&self.0, false)
        }

        fn all(&self) -> Vec<&Regulation> {
            vec![&self.0]
        }
    }

    #[test]
    fn test_injected_table_is_used() {
        let mut strict = StandardRegulations::default().resolve("us").clone();
        strict.jurisdiction = Jurisdiction::Peru;
        strict.distribution_requirement = dec!(0.99);
        let table = SingleRegime(strict);
        let custom = calculate_with(&table, &sample_input()).unwrap();
        let standard = calculate(&sample_input()).unwrap();
        assert!(custom.result.standardized_cap_rate < standard.result.standardized_cap_rate);
        assert_eq!(custom.result.parameters.country, "peru");
    }
}
