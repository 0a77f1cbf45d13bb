use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use reit_calc_core::reit::{self, ExpenseApproach, InvestmentInput, LandOwnership};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LandArg {
    Purchase,
    Lease,
}

impl From<LandArg> for LandOwnership {
    fn from(arg: LandArg) -> Self {
        match arg {
            LandArg::Purchase => LandOwnership::Purchase,
            LandArg::Lease => LandOwnership::Lease,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExpenseArg {
    Direct,
    Percentage,
}

impl From<ExpenseArg> for ExpenseApproach {
    fn from(arg: ExpenseArg) -> Self {
        match arg {
            ExpenseArg::Direct => ExpenseApproach::Direct,
            ExpenseArg::Percentage => ExpenseApproach::Percentage,
        }
    }
}

/// Property parameters shared by `calculate` and `project-cost`.
///
/// Percentages are whole numbers (5 = 5%).
#[derive(Args)]
pub struct PropertyArgs {
    /// Jurisdiction code: us or peru
    #[arg(long, default_value = "us")]
    pub country: String,

    /// Free-form property type label
    #[arg(long)]
    pub property_type: Option<String>,

    /// Monthly gross rental income
    #[arg(long, alias = "rent")]
    pub rental_income: Option<Decimal>,

    /// Monthly operating expenses
    #[arg(long)]
    pub expenses: Option<Decimal>,

    /// How expenses are derived
    #[arg(long, value_enum)]
    pub expense_approach: Option<ExpenseArg>,

    /// Occupancy rate in percent
    #[arg(long)]
    pub occupancy: Option<Decimal>,

    /// Annual appreciation in percent
    #[arg(long)]
    pub appreciation: Option<Decimal>,

    /// Target investor yield in percent
    #[arg(long)]
    pub target_yield: Option<Decimal>,

    /// Operating expense rate in percent of value
    #[arg(long)]
    pub operating_expense_rate: Option<Decimal>,

    /// Administration expense rate in percent of value
    #[arg(long)]
    pub admin_expense_rate: Option<Decimal>,

    /// Cap rate in percent, used to estimate percentage-based expenses
    #[arg(long)]
    pub cap_rate: Option<Decimal>,

    #[arg(long, value_enum)]
    pub land: Option<LandArg>,

    #[arg(long)]
    pub land_price: Option<Decimal>,

    #[arg(long)]
    pub construction_cost: Option<Decimal>,

    #[arg(long)]
    pub other_costs: Option<Decimal>,

    /// Annual ground lease payment
    #[arg(long)]
    pub land_lease_annual: Option<Decimal>,

    /// Ground lease term in years
    #[arg(long)]
    pub land_lease_term: Option<u32>,

    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Loan interest rate in percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub loan_term: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a full REIT/FIBRA calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub property: PropertyArgs,
}

impl PropertyArgs {
    /// Build the input from `--input`, piped stdin, or the individual flags.
    pub fn resolve(&self) -> Result<InvestmentInput, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::file::read_json(path);
        }
        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(serde_json::from_value(data)?);
        }

        let defaults = InvestmentInput::default();
        Ok(InvestmentInput {
            country: self.country.clone(),
            property_type: self.property_type.clone(),
            land_ownership: self.land.map(Into::into).unwrap_or(defaults.land_ownership),
            expense_approach: self
                .expense_approach
                .map(Into::into)
                .unwrap_or(defaults.expense_approach),
            land_price: self.land_price.unwrap_or(defaults.land_price),
            construction_cost: self.construction_cost.unwrap_or(defaults.construction_cost),
            other_costs: self.other_costs.unwrap_or(defaults.other_costs),
            rental_income: self.rental_income,
            expenses: self.expenses.unwrap_or(Decimal::ZERO),
            land_lease_annual: self.land_lease_annual.unwrap_or(defaults.land_lease_annual),
            land_lease_term: self.land_lease_term.unwrap_or(defaults.land_lease_term),
            occupancy_rate: self.occupancy.unwrap_or(defaults.occupancy_rate),
            appreciation_rate: self.appreciation.unwrap_or(defaults.appreciation_rate),
            target_reit_yield: self.target_yield,
            operating_expense_rate: self.operating_expense_rate,
            admin_expense_rate: self.admin_expense_rate,
            cap_rate: self.cap_rate,
            loan_amount: self.loan_amount.unwrap_or(defaults.loan_amount),
            interest_rate: self.interest_rate.unwrap_or(defaults.interest_rate),
            loan_term: self.loan_term.unwrap_or(defaults.loan_term),
            target_dscr: None,
        })
    }
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let investment = args.property.resolve()?;
    if investment.rental_income.is_none() {
        return Err("--rental-income is required (or provide --input)".into());
    }
    let result = reit::calculate(&investment)?;
    Ok(serde_json::to_value(result)?)
}
