use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use reit_calc_core::development::project_cost;

use super::calculate::PropertyArgs;

/// Arguments for the cost-basis development analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ProjectCostArgs {
    #[command(flatten)]
    pub property: PropertyArgs,

    /// Lender DSCR for the supportable-loan estimate (default 1.25)
    #[arg(long)]
    pub target_dscr: Option<Decimal>,
}

pub fn run_project_cost(args: ProjectCostArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut investment = args.property.resolve()?;
    if args.target_dscr.is_some() {
        investment.target_dscr = args.target_dscr;
    }
    let result = project_cost::analyze_project_cost(&investment)?;
    Ok(serde_json::to_value(result)?)
}
