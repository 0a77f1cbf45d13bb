use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ReitCalcError;
use crate::types::{Money, Percent, Years};
use crate::ReitCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the land under the property is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandOwnership {
    /// Land price is capitalised into the asset base
    #[default]
    Purchase,
    /// Ground lease: annual lease cost is deducted from income, land excluded from cost
    Lease,
}

/// Source of the operating expense figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseApproach {
    /// Monthly expenses taken as entered
    Direct,
    /// Expenses re-derived from estimated value × operating expense rate
    #[default]
    Percentage,
}

/// Parameters of a single property calculation.
///
/// Percentages are whole numbers (`5` = 5%). Absent numeric fields default to
/// zero, and zero loan terms fall back to jurisdiction financing defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentInput {
    /// Jurisdiction code (`us`, `peru`); unknown codes are treated as `us`
    pub country: String,
    /// Free-form property type label, echoed in the result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    pub land_ownership: LandOwnership,
    pub expense_approach: ExpenseApproach,
    pub land_price: Money,
    pub construction_cost: Money,
    pub other_costs: Money,
    /// Monthly gross rental income (required, > 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_income: Option<Money>,
    /// Monthly operating expenses
    pub expenses: Money,
    /// Annual ground lease payment (lease only)
    pub land_lease_annual: Money,
    pub land_lease_term: Years,
    pub occupancy_rate: Percent,
    /// Annual growth of cash flows; zero falls back to 2%
    pub appreciation_rate: Percent,
    /// Target investor yield; defaults per jurisdiction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_reit_yield: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_expense_rate: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_expense_rate: Option<Percent>,
    /// Cap rate used to estimate value in percentage-expense mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_rate: Option<Percent>,
    pub loan_amount: Money,
    pub interest_rate: Percent,
    pub loan_term: Years,
    /// DSCR a lender would require; used for the supportable-loan estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_dscr: Option<Decimal>,
}

impl Default for InvestmentInput {
    fn default() -> Self {
        Self {
            country: "us".into(),
            property_type: None,
            land_ownership: LandOwnership::Purchase,
            expense_approach: ExpenseApproach::Percentage,
            land_price: Decimal::ZERO,
            construction_cost: Decimal::ZERO,
            other_costs: Decimal::ZERO,
            rental_income: None,
            expenses: Decimal::ZERO,
            land_lease_annual: Decimal::ZERO,
            land_lease_term: 30,
            occupancy_rate: dec!(95),
            appreciation_rate: dec!(2),
            target_reit_yield: None,
            operating_expense_rate: None,
            admin_expense_rate: None,
            cap_rate: None,
            loan_amount: Decimal::ZERO,
            interest_rate: Decimal::ZERO,
            loan_term: 0,
            target_dscr: None,
        }
    }
}

impl InvestmentInput {
    /// Annual ground lease cost, zero unless the land is leased.
    pub fn annual_land_lease_cost(&self) -> Money {
        match self.land_ownership {
            LandOwnership::Lease => self.land_lease_annual,
            LandOwnership::Purchase => Decimal::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Largest magnitude accepted for a money field; larger values are capped.
pub const MAX_MONEY: Money = dec!(1000000000000000);
/// Largest magnitude accepted for a percentage field.
pub const MAX_PERCENT: Percent = dec!(1000);
/// Longest loan or ground lease term considered.
pub const MAX_TERM_YEARS: Years = 100;

fn bound(field: &str, value: Decimal, limit: Decimal, warnings: &mut Vec<String>) -> Decimal {
    if value.abs() <= limit {
        return value;
    }
    let capped = if value.is_sign_negative() { -limit } else { limit };
    warnings.push(format!("{field} of {value} is out of range; capped at {capped}"));
    capped
}

fn bound_term(field: &str, years: Years, warnings: &mut Vec<String>) -> Years {
    if years > MAX_TERM_YEARS {
        warnings.push(format!(
            "{field} of {years} years is out of range; capped at {MAX_TERM_YEARS}"
        ));
        MAX_TERM_YEARS
    } else {
        years
    }
}

/// Copy of `input` with every magnitude pulled inside [`MAX_MONEY`],
/// [`MAX_PERCENT`] and [`MAX_TERM_YEARS`]. Each capped field adds a warning.
pub fn bound_input(input: &InvestmentInput, warnings: &mut Vec<String>) -> InvestmentInput {
    let mut money = |field: &str, v: Money| bound(field, v, MAX_MONEY, warnings);
    let rental_income = input.rental_income.map(|r| money("rental_income", r));
    let land_price = money("land_price", input.land_price);
    let construction_cost = money("construction_cost", input.construction_cost);
    let other_costs = money("other_costs", input.other_costs);
    let expenses = money("expenses", input.expenses);
    let land_lease_annual = money("land_lease_annual", input.land_lease_annual);
    let loan_amount = money("loan_amount", input.loan_amount);

    let mut percent = |field: &str, v: Percent| bound(field, v, MAX_PERCENT, warnings);
    let occupancy_rate = percent("occupancy_rate", input.occupancy_rate);
    let appreciation_rate = percent("appreciation_rate", input.appreciation_rate);
    let interest_rate = percent("interest_rate", input.interest_rate);
    let target_reit_yield = input
        .target_reit_yield
        .map(|v| percent("target_reit_yield", v));
    let operating_expense_rate = input
        .operating_expense_rate
        .map(|v| percent("operating_expense_rate", v));
    let admin_expense_rate = input
        .admin_expense_rate
        .map(|v| percent("admin_expense_rate", v));
    let cap_rate = input.cap_rate.map(|v| percent("cap_rate", v));

    InvestmentInput {
        country: input.country.clone(),
        property_type: input.property_type.clone(),
        land_ownership: input.land_ownership,
        expense_approach: input.expense_approach,
        land_price,
        construction_cost,
        other_costs,
        rental_income,
        expenses,
        land_lease_annual,
        land_lease_term: bound_term("land_lease_term", input.land_lease_term, warnings),
        occupancy_rate,
        appreciation_rate,
        target_reit_yield,
        operating_expense_rate,
        admin_expense_rate,
        cap_rate,
        loan_amount,
        interest_rate,
        loan_term: bound_term("loan_term", input.loan_term, warnings),
        target_dscr: input.target_dscr,
    }
}

/// Check the single hard precondition and collect warnings for odd values.
///
/// Returns the monthly rental income on success.
pub fn validate_input(
    input: &InvestmentInput,
    warnings: &mut Vec<String>,
) -> ReitCalcResult<Money> {
    let rental_income = match input.rental_income {
        Some(r) if r > Decimal::ZERO => r,
        _ => {
            return Err(ReitCalcError::InvalidInput {
                field: "rental_income".into(),
                reason: "Monthly rental income is required to proceed with calculation".into(),
            })
        }
    };

    let monetary = [
        ("land_price", input.land_price),
        ("construction_cost", input.construction_cost),
        ("other_costs", input.other_costs),
        ("expenses", input.expenses),
        ("land_lease_annual", input.land_lease_annual),
        ("loan_amount", input.loan_amount),
    ];
    for (field, value) in monetary {
        if value < Decimal::ZERO {
            warnings.push(format!("{field} is negative ({value}); check the input"));
        }
    }

    if input.occupancy_rate > dec!(100) {
        warnings.push(format!(
            "Occupancy rate {}% exceeds 100%",
            input.occupancy_rate
        ));
    }

    if input.land_ownership == LandOwnership::Lease && input.land_lease_annual.is_zero() {
        warnings.push("Land is leased but annual lease cost is zero".into());
    }

    Ok(rental_income)
}
