pub mod cap_rate_benchmarks;
pub mod hospitality;

pub use cap_rate_benchmarks::{recommended_cap_rate, MarketType, PropertyClass, PropertyType};
pub use hospitality::{hospitality_metrics, HospitalityInput, HospitalityMetrics, Seasonality};
