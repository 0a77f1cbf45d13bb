pub mod calculator;
pub mod cap_rate;
pub mod financing;
pub mod input;
pub mod noi;
pub mod regulation;
pub mod returns;
pub mod valuation;

pub use calculator::{calculate, calculate_with, CalculationResult, ParametersUsed};
pub use input::{ExpenseApproach, InvestmentInput, LandOwnership};
pub use regulation::{Jurisdiction, Regulation, RegulationTable, StandardRegulations};
