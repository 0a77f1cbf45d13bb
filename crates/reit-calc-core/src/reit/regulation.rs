use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Percent, Rate, Years};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Regulatory regime selected by the caller's country code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jurisdiction {
    /// US REIT (Internal Revenue Code, Subchapter M)
    Us,
    /// Peru FIBRA
    Peru,
}

impl Jurisdiction {
    /// Parse a country code. Returns `None` for codes without a regulation record.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "us" | "usa" => Some(Jurisdiction::Us),
            "peru" | "pe" => Some(Jurisdiction::Peru),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Jurisdiction::Us => "us",
            Jurisdiction::Peru => "peru",
        }
    }
}

/// Static distribution and expense requirements of one REIT regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regulation {
    pub jurisdiction: Jurisdiction,
    pub name: String,
    /// Share of taxable income that must be distributed (0.90 = 90%)
    pub distribution_requirement: Rate,
    /// Property-level operating expenses as a share of property value
    pub default_operating_expense_rate: Rate,
    /// Vehicle administration and compliance cost as a share of property value
    pub default_admin_expense_rate: Rate,
    /// Target investor yield used when the caller does not supply one
    pub default_target_yield: Percent,
    /// Financing defaults when loan fields are zero or absent
    pub default_interest_rate: Percent,
    pub default_loan_term_years: Years,
    pub requirements: Vec<String>,
}

/// Read-only lookup from country code to regulation record.
///
/// Implementations must never fail: unknown codes resolve to a fallback record.
pub trait RegulationTable: Send + Sync {
    /// Resolve `country`, reporting whether the fallback record was used.
    fn lookup(&self, country: &str) -> (&Regulation, bool);

    fn resolve(&self, country: &str) -> &Regulation {
        self.lookup(country).0
    }

    fn all(&self) -> Vec<&Regulation>;
}

// ---------------------------------------------------------------------------
// Compiled table
// ---------------------------------------------------------------------------

/// The compiled US REIT / Peru FIBRA table. Unknown codes resolve to `us`.
#[derive(Debug, Clone)]
pub struct StandardRegulations {
    us: Regulation,
    peru: Regulation,
}

impl Default for StandardRegulations {
    fn default() -> Self {
        Self {
            us: Regulation {
                jurisdiction: Jurisdiction::Us,
                name: "US REIT".into(),
                distribution_requirement: dec!(0.90),
                default_operating_expense_rate: dec!(0.03),
                default_admin_expense_rate: dec!(0.015),
                default_target_yield: dec!(5),
                default_interest_rate: dec!(5.5),
                default_loan_term_years: 20,
                requirements: vec![
                    "Must distribute at least 90% of taxable income to shareholders".into(),
                    "75% of assets must be real estate-related".into(),
                    "75% of gross income must come from real estate".into(),
                    "Cannot be closely held (5 or fewer individuals cannot own >50%)".into(),
                    "Subject to entity-level taxation if requirements not met".into(),
                ],
            },
            peru: Regulation {
                jurisdiction: Jurisdiction::Peru,
                name: "Peru FIBRA".into(),
                distribution_requirement: dec!(0.95),
                default_operating_expense_rate: dec!(0.035),
                default_admin_expense_rate: dec!(0.02),
                default_target_yield: dec!(6.5),
                default_interest_rate: dec!(7.5),
                default_loan_term_years: 15,
                requirements: vec![
                    "Must distribute at least 95% of taxable income to shareholders".into(),
                    "70% of assets must be invested in real estate".into(),
                    "Must have at least 10 unrelated investors".into(),
                    "No investor can hold more than 20% of certificates".into(),
                    "Real estate assets must be held for at least 4 years".into(),
                ],
            },
        }
    }
}

impl RegulationTable for StandardRegulations {
    fn lookup(&self, country: &str) -> (&Regulation, bool) {
        match Jurisdiction::from_code(country) {
            Some(Jurisdiction::Us) => (&self.us, false),
            Some(Jurisdiction::Peru) => (&self.peru, false),
            None => (&self.us, true),
        }
    }

    fn all(&self) -> Vec<&Regulation> {
        vec![&self.us, &self.peru]
    }
}
