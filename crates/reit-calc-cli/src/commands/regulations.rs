use clap::Args;
use serde_json::Value;

use reit_calc_core::reit::{RegulationTable, StandardRegulations};

/// Arguments for the regulation listing
#[derive(Args)]
pub struct RegulationsArgs {
    /// Show a single jurisdiction (unknown codes show the US rules)
    #[arg(long)]
    pub country: Option<String>,
}

pub fn run_regulations(args: RegulationsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = StandardRegulations::default();
    let value = match args.country {
        Some(ref code) => serde_json::to_value(table.resolve(code))?,
        None => serde_json::to_value(table.all())?,
    };
    Ok(value)
}
