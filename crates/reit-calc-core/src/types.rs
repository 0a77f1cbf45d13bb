use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Human-entered percentages (5 = 5%). Converted to a `Rate` exactly once,
/// through [`to_rate`], before entering any formula.
pub type Percent = Decimal;

/// Year counts
pub type Years = u32;

/// Convert a whole-number percentage into a decimal rate.
pub fn to_rate(p: Percent) -> Rate {
    p / dec!(100)
}

/// Convert a decimal rate back into a whole-number percentage.
pub fn to_percent(r: Rate) -> Percent {
    r * dec!(100)
}

/// Largest magnitude a capitalised value may take.
pub const MAX_CAPITALISED_VALUE: Money = dec!(100000000000000000000);

/// `numerator / denominator` as a whole-number percentage, or `None` when the
/// quotient is not representable.
pub fn percent_ratio(numerator: Money, denominator: Money) -> Option<Percent> {
    numerator.checked_div(denominator)?.checked_mul(dec!(100))
}

/// `income / rate`, or `None` when the rate is zero or the value would exceed
/// [`MAX_CAPITALISED_VALUE`].
pub fn capitalised(income: Money, rate: Rate) -> Option<Money> {
    income
        .checked_div(rate)
        .filter(|v| v.abs() <= MAX_CAPITALISED_VALUE)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
