use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use reit_calc_core::market::{self, HospitalityInput, Seasonality};

use crate::input;

/// Arguments for the market cap rate lookup
#[derive(Args)]
pub struct CapRateArgs {
    #[arg(long, default_value = "us")]
    pub country: String,

    /// retail, office, hospitality, education, industrial or multifamily
    #[arg(long)]
    pub property_type: String,

    /// prime or secondary
    #[arg(long, default_value = "prime")]
    pub market_type: String,

    /// A, B or C
    #[arg(long, default_value = "B")]
    pub property_class: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeasonalityArg {
    Balanced,
    Seasonal,
    Weekend,
    Business,
    Events,
}

impl From<SeasonalityArg> for Seasonality {
    fn from(arg: SeasonalityArg) -> Self {
        match arg {
            SeasonalityArg::Balanced => Seasonality::Balanced,
            SeasonalityArg::Seasonal => Seasonality::Seasonal,
            SeasonalityArg::Weekend => Seasonality::Weekend,
            SeasonalityArg::Business => Seasonality::Business,
            SeasonalityArg::Events => Seasonality::Events,
        }
    }
}

/// Arguments for hotel REIT metrics
#[derive(Args)]
pub struct HospitalityArgs {
    #[arg(long, default_value = "us")]
    pub country: String,

    #[arg(long, value_enum, default_value = "balanced")]
    pub seasonality: SeasonalityArg,

    /// Occupancy rate in percent
    #[arg(long)]
    pub occupancy: Option<Decimal>,

    /// Average daily rate
    #[arg(long)]
    pub adr: Option<Decimal>,

    /// Revenue per available room
    #[arg(long)]
    pub rev_par: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_cap_rate(args: CapRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rate = market::recommended_cap_rate(
        &args.country,
        &args.property_type,
        &args.market_type,
        &args.property_class,
    );
    Ok(json!({
        "result": {
            "recommended_cap_rate": rate,
            "country": args.country,
            "property_type": args.property_type,
            "market_type": args.market_type,
            "property_class": args.property_class,
        }
    }))
}

pub fn run_hospitality(args: HospitalityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let hotel: HospitalityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let defaults = HospitalityInput::default();
        HospitalityInput {
            country: args.country,
            seasonality: args.seasonality.into(),
            occupancy_rate: args.occupancy.unwrap_or(defaults.occupancy_rate),
            adr: args.adr.unwrap_or(defaults.adr),
            rev_par: args.rev_par.ok_or("--rev-par is required (or provide --input)")?,
        }
    };
    let result = market::hospitality_metrics(&hotel)?;
    Ok(serde_json::to_value(result)?)
}
