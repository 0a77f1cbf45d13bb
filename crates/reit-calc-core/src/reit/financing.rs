use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::time_value::amortizing_payment;
use crate::types::{to_rate, Money, Percent, Years};

use super::input::InvestmentInput;
use super::regulation::Regulation;

/// Loan-to-value applied when no loan amount is given.
pub const DEFAULT_LTV: Decimal = dec!(0.6);
/// DSCR reported when there is no debt service to cover.
pub const DSCR_FALLBACK: Decimal = dec!(1.5);

/// Loan terms after defaults have been substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_amount: Money,
    pub interest_rate: Percent,
    pub loan_term_years: Years,
    /// Names of the fields that took a default
    pub defaulted: Vec<String>,
}

/// Debt service and leveraged cash flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    pub terms: LoanTerms,
    pub monthly_payment: Money,
    pub annual_debt_service: Money,
    /// NOI less debt service less ground lease
    pub annual_cash_flow: Money,
    pub debt_service_coverage_ratio: Decimal,
    /// Loan / property value (zero when the value is not positive)
    pub loan_to_value: Decimal,
}

/// Substitute jurisdiction defaults for zero or negative loan fields.
pub fn resolve_loan_terms(
    input: &InvestmentInput,
    regulation: &Regulation,
    property_value: Money,
) -> LoanTerms {
    let mut defaulted = Vec::new();

    let loan_amount = if input.loan_amount > Decimal::ZERO {
        input.loan_amount
    } else {
        defaulted.push("loan_amount".to_string());
        (property_value * DEFAULT_LTV).max(Decimal::ZERO)
    };
    let interest_rate = if input.interest_rate > Decimal::ZERO {
        input.interest_rate
    } else {
        defaulted.push("interest_rate".to_string());
        regulation.default_interest_rate
    };
    let loan_term_years = if input.loan_term > 0 {
        input.loan_term
    } else {
        defaulted.push("loan_term".to_string());
        regulation.default_loan_term_years
    };

    LoanTerms {
        loan_amount,
        interest_rate,
        loan_term_years,
        defaulted,
    }
}

/// Amortise the loan and derive leveraged cash flow and DSCR.
pub fn finance(
    terms: LoanTerms,
    noi: Money,
    annual_land_lease_cost: Money,
    property_value: Money,
    warnings: &mut Vec<String>,
) -> Financing {
    let monthly_rate = to_rate(terms.interest_rate) / dec!(12);
    let total_months = terms.loan_term_years.saturating_mul(12);

    let monthly_payment = match amortizing_payment(terms.loan_amount, monthly_rate, total_months) {
        Some(p) => p,
        None => {
            warnings.push("Loan payment could not be computed; debt service set to zero".into());
            Decimal::ZERO
        }
    };

    let annual_debt_service = monthly_payment * dec!(12);
    let annual_cash_flow = noi - annual_debt_service - annual_land_lease_cost;

    let debt_service_coverage_ratio = if annual_debt_service > Decimal::ZERO {
        noi.checked_div(annual_debt_service).unwrap_or(DSCR_FALLBACK)
    } else {
        DSCR_FALLBACK
    };

    let loan_to_value = if property_value > Decimal::ZERO {
        terms
            .loan_amount
            .checked_div(property_value)
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    if annual_debt_service > Decimal::ZERO && debt_service_coverage_ratio < dec!(1.2) {
        warnings.push(format!(
            "DSCR of {debt_service_coverage_ratio:.2} is below 1.20x; lender covenant risk"
        ));
    }
    if loan_to_value > dec!(0.80) {
        warnings.push(format!(
            "LTV of {loan_to_value:.3} exceeds 0.80; high leverage"
        ));
    }

    tracing::debug!(
        loan_amount = %terms.loan_amount,
        %monthly_payment,
        %annual_debt_service,
        %annual_cash_flow,
        dscr = %debt_service_coverage_ratio,
        "financing"
    );

    Financing {
        terms,
        monthly_payment,
        annual_debt_service,
        annual_cash_flow,
        debt_service_coverage_ratio,
        loan_to_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reit::regulation::{RegulationTable, StandardRegulations};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_follow_jurisdiction() {
        let input = InvestmentInput::default();
        let table = StandardRegulations::default();
        let us = resolve_loan_terms(&input, table.resolve("us"), dec!(1000000));
        assert_eq!(us.loan_amount, dec!(600000));
        assert_eq!(us.interest_rate, dec!(5.5));
        assert_eq!(us.loan_term_years, 20);
        assert_eq!(us.defaulted.len(), 3);

        let peru = resolve_loan_terms(&input, table.resolve("peru"), dec!(1000000));
        assert_eq!(peru.interest_rate, dec!(7.5));
        assert_eq!(peru.loan_term_years, 15);
    }

    #[test]
    fn test_given_terms_are_kept() {
        let input = InvestmentInput {
            loan_amount: dec!(2000000),
            interest_rate: dec!(5),
            loan_term: 20,
            ..Default::default()
        };
        let table = StandardRegulations::default();
        let terms = resolve_loan_terms(&input, table.resolve("us"), dec!(3000000));
        assert_eq!(terms.loan_amount, dec!(2000000));
        assert!(terms.defaulted.is_empty());
    }

    #[test]
    fn test_debt_service_and_cash_flow() {
        let terms = LoanTerms {
            loan_amount: dec!(2000000),
            interest_rate: dec!(5),
            loan_term_years: 20,
            defaulted: vec![],
        };
        let mut w = Vec::new();
        let f = finance(terms, dec!(300000), Decimal::ZERO, dec!(3200000), &mut w);
        // ~$158,389 annual debt service on $2M at 5% over 20 years
        assert!((f.annual_debt_service - dec!(158389)).abs() < dec!(1));
        assert!((f.annual_cash_flow - dec!(141611)).abs() < dec!(1));
        assert!((f.debt_service_coverage_ratio - dec!(1.894)).abs() < dec!(0.001));
        assert_eq!(f.loan_to_value, dec!(0.625));
    }

    #[test]
    fn test_tiny_property_value_does_not_panic() {
        let terms = LoanTerms {
            loan_amount: dec!(1000000000000000),
            interest_rate: dec!(5),
            loan_term_years: 20,
            defaulted: vec![],
        };
        let mut w = Vec::new();
        let f = finance(
            terms,
            dec!(300000),
            Decimal::ZERO,
            dec!(0.0000000000000000000001),
            &mut w,
        );
        assert_eq!(f.loan_to_value, Decimal::ZERO);
        assert!(f.annual_debt_service > Decimal::ZERO);
    }

    #[test]
    fn test_lease_cost_reduces_cash_flow() {
        let terms = LoanTerms {
            loan_amount: Decimal::ZERO,
            interest_rate: dec!(5),
            loan_term_years: 20,
            defaulted: vec![],
        };
        let mut w = Vec::new();
        let f = finance(terms, dec!(220000), dec!(80000), dec!(2000000), &mut w);
        assert_eq!(f.annual_debt_service, Decimal::ZERO);
        assert_eq!(f.annual_cash_flow, dec!(140000));
        assert_eq!(f.debt_service_coverage_ratio, DSCR_FALLBACK);
    }
}
