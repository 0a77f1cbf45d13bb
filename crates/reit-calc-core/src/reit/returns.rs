use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::time_value::{growth_factor, irr_linear_search, npv, IrrSearch};
use crate::types::{capitalised, percent_ratio, to_percent, to_rate, Money, Percent, Rate};

/// Holding period of the cash-flow projection.
pub const PROJECTION_YEARS: u32 = 10;
/// Exit cap rate sits this far below the entry cap rate.
pub const TERMINAL_CAP_COMPRESSION: Rate = dec!(0.005);
/// Growth applied when the appreciation rate is zero.
pub const DEFAULT_APPRECIATION: Percent = dec!(2);
/// Break-even reported when the division cannot be represented.
pub const BREAK_EVEN_FALLBACK: Decimal = dec!(5);
pub const IRR_FALLBACK_ABOVE: Decimal = dec!(1.5);
pub const IRR_FALLBACK_BELOW: Decimal = dec!(0.7);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything the return metrics depend on.
#[derive(Debug, Clone)]
pub struct ReturnInputs {
    pub noi: Money,
    /// Capitalised property value; the basis for ROI, NPV and IRR
    pub property_value: Money,
    /// Reported investment, possibly reconciled to the benchmark; the basis for break-even
    pub total_investment: Money,
    pub loan_amount: Money,
    pub annual_cash_flow: Money,
    pub adjusted_cap_rate: Rate,
    /// Target yield, also the discount rate
    pub target_yield: Percent,
    pub appreciation_rate: Percent,
}

/// Ten-year cash-flow projection with exit value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Year 1..=10 cash flows, excluding the terminal value
    pub annual_cash_flows: Vec<Money>,
    /// Exit value added to the year-10 cash flow
    pub terminal_value: Money,
}

impl Projection {
    /// Year 0..=10 flows: `-investment`, the annual flows, exit value in year 10.
    pub fn with_investment(&self, investment: Money) -> Vec<Money> {
        let mut flows = Vec::with_capacity(self.annual_cash_flows.len() + 1);
        flows.push(-investment);
        flows.extend(self.annual_cash_flows.iter().copied());
        if let Some(last) = flows.last_mut() {
            *last = last.saturating_add(self.terminal_value);
        }
        flows
    }
}

/// Investor return metrics. Percent-valued fields use whole numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnMetrics {
    pub unleveraged_roi: Percent,
    pub leveraged_roi: Percent,
    /// Leveraged ROI when positive, otherwise unleveraged
    pub actual_roi: Percent,
    /// Years of NOI needed to recover the investment
    pub break_even_point: Decimal,
    pub net_present_value: Money,
    pub internal_rate_of_return: Percent,
    /// False when the IRR is the yield-based approximation
    pub irr_converged: bool,
    pub projection: Projection,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Appreciation used by the projection; zero means "not given".
pub fn effective_appreciation(rate: Percent) -> Percent {
    if rate.is_zero() {
        DEFAULT_APPRECIATION
    } else {
        rate
    }
}

/// Compute ROI, break-even, NPV and IRR.
///
/// ROI, NPV and IRR are measured against `property_value`; only the break-even
/// point uses the reported `total_investment`. Anything that cannot be
/// represented takes its fallback and adds a warning.
pub fn compute_returns(inputs: &ReturnInputs, warnings: &mut Vec<String>) -> ReturnMetrics {
    let unleveraged_roi = if inputs.property_value > Decimal::ZERO {
        percent_ratio(inputs.noi, inputs.property_value).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let equity = inputs.property_value - inputs.loan_amount;
    let leveraged_roi = if equity > Decimal::ZERO {
        percent_ratio(inputs.annual_cash_flow, equity).unwrap_or(unleveraged_roi)
    } else {
        unleveraged_roi
    };

    let actual_roi = if leveraged_roi > Decimal::ZERO {
        leveraged_roi
    } else {
        unleveraged_roi
    };

    let break_even_point = if inputs.noi > Decimal::ZERO {
        inputs
            .total_investment
            .checked_div(inputs.noi)
            .unwrap_or(BREAK_EVEN_FALLBACK)
    } else {
        Decimal::ZERO
    };

    let projection = project_cash_flows(inputs, warnings);
    let flows = projection.with_investment(inputs.property_value);
    let net_present_value = match npv(to_rate(inputs.target_yield), &flows) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(error = %err, "NPV not computable at the target yield");
            warnings.push(format!(
                "NPV could not be computed at a {}% discount rate; reported as zero",
                inputs.target_yield
            ));
            Decimal::ZERO
        }
    };

    let search = irr_linear_search(&flows).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "IRR search failed");
        IrrSearch {
            rate: None,
            iterations: 0,
        }
    });
    let (internal_rate_of_return, irr_converged) = match search.rate {
        Some(rate) => (to_percent(rate), true),
        None => {
            let factor = if net_present_value > Decimal::ZERO {
                IRR_FALLBACK_ABOVE
            } else {
                IRR_FALLBACK_BELOW
            };
            tracing::warn!(
                iterations = search.iterations,
                "IRR search did not converge, using yield-based approximation"
            );
            warnings.push(format!(
                "IRR did not converge within 0-100%; approximated as {factor}x target yield"
            ));
            (inputs.target_yield * factor, false)
        }
    };

    tracing::debug!(
        %unleveraged_roi,
        %leveraged_roi,
        %net_present_value,
        %internal_rate_of_return,
        "return metrics"
    );

    ReturnMetrics {
        unleveraged_roi,
        leveraged_roi,
        actual_roi,
        break_even_point,
        net_present_value,
        internal_rate_of_return,
        irr_converged,
        projection,
    }
}

/// Project ten years of cash flow growing at the appreciation rate, plus an
/// exit value of `NOI × (1+g)^10 / (cap_rate − 0.5%)`.
///
/// Growth stops at the first year whose cash flow would not be representable.
pub fn project_cash_flows(inputs: &ReturnInputs, warnings: &mut Vec<String>) -> Projection {
    let growth = to_rate(effective_appreciation(inputs.appreciation_rate));
    let one_plus_g = Decimal::ONE + growth;

    let mut annual_cash_flows = Vec::with_capacity(PROJECTION_YEARS as usize);
    let mut current = inputs.annual_cash_flow;
    let mut growing = true;
    for year in 0..PROJECTION_YEARS {
        if year > 0 && growing {
            match current.checked_mul(one_plus_g) {
                Some(next) => current = next,
                None => {
                    growing = false;
                    warnings.push(format!(
                        "Cash flow growth overflows in year {}; later years held flat",
                        year + 1
                    ));
                }
            }
        }
        annual_cash_flows.push(current);
    }

    let terminal_cap = inputs.adjusted_cap_rate - TERMINAL_CAP_COMPRESSION;
    let terminal_value = if terminal_cap > Decimal::ZERO {
        let value = growth_factor(growth, PROJECTION_YEARS)
            .and_then(|f| inputs.noi.checked_mul(f))
            .and_then(|noi| capitalised(noi, terminal_cap));
        match value {
            Some(v) => v,
            None => {
                warnings.push("Terminal value is not representable; exit value excluded".into());
                Decimal::ZERO
            }
        }
    } else {
        warnings.push(format!(
            "Terminal cap rate {terminal_cap} is not positive; exit value excluded"
        ));
        Decimal::ZERO
    };

    Projection {
        annual_cash_flows,
        terminal_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base_inputs() -> ReturnInputs {
        ReturnInputs {
            noi: dec!(300000),
            property_value: dec!(3000000),
            total_investment: dec!(3000000),
            loan_amount: dec!(1800000),
            annual_cash_flow: dec!(120000),
            adjusted_cap_rate: dec!(0.10),
            target_yield: dec!(5),
            appreciation_rate: dec!(2),
        }
    }

    #[test]
    fn test_roi_and_break_even() {
        let mut w = Vec::new();
        let m = compute_returns(&base_inputs(), &mut w);
        assert_eq!(m.unleveraged_roi, dec!(10));
        assert_eq!(m.leveraged_roi, dec!(10));
        assert_eq!(m.actual_roi, dec!(10));
        assert_eq!(m.break_even_point, dec!(10));
    }

    #[test]
    fn test_reconciled_investment_only_moves_break_even() {
        let reconciled = ReturnInputs {
            total_investment: dec!(2400000),
            ..base_inputs()
        };
        let mut w = Vec::new();
        let base = compute_returns(&base_inputs(), &mut w);
        let m = compute_returns(&reconciled, &mut w);
        assert_eq!(m.break_even_point, dec!(8));
        assert_eq!(m.unleveraged_roi, base.unleveraged_roi);
        assert_eq!(m.leveraged_roi, base.leveraged_roi);
        assert_eq!(m.net_present_value, base.net_present_value);
        assert_eq!(m.internal_rate_of_return, base.internal_rate_of_return);
    }

    #[test]
    fn test_discount_rate_at_minus_hundred_percent_falls_back() {
        let inputs = ReturnInputs {
            target_yield: dec!(-100),
            ..base_inputs()
        };
        let mut w = Vec::new();
        let m = compute_returns(&inputs, &mut w);
        assert_eq!(m.net_present_value, Decimal::ZERO);
        assert!(w.iter().any(|msg| msg.contains("NPV could not be computed")));
    }

    #[test]
    fn test_explosive_growth_is_held_flat() {
        let inputs = ReturnInputs {
            annual_cash_flow: dec!(10000000000000000000000),
            appreciation_rate: dec!(100000),
            ..base_inputs()
        };
        let mut w = Vec::new();
        let m = compute_returns(&inputs, &mut w);
        let flows = &m.projection.annual_cash_flows;
        assert_eq!(flows.len(), 10);
        assert_eq!(flows[9], flows[8]);
        assert_eq!(m.projection.terminal_value, Decimal::ZERO);
        assert!(w.iter().any(|msg| msg.contains("held flat")));
    }

    #[test]
    fn test_leveraged_roi_falls_back_without_equity() {
        let inputs = ReturnInputs {
            loan_amount: dec!(3500000),
            ..base_inputs()
        };
        let mut w = Vec::new();
        let m = compute_returns(&inputs, &mut w);
        assert_eq!(m.leveraged_roi, m.unleveraged_roi);
    }

    #[test]
    fn test_negative_leverage_uses_unleveraged_actual_roi() {
        let inputs = ReturnInputs {
            annual_cash_flow: dec!(-10000),
            ..base_inputs()
        };
        let mut w = Vec::new();
        let m = compute_returns(&inputs, &mut w);
        assert!(m.leveraged_roi < Decimal::ZERO);
        assert_eq!(m.actual_roi, m.unleveraged_roi);
    }

    #[test]
    fn test_projection_grows_and_adds_terminal_value() {
        let mut w = Vec::new();
        let p = project_cash_flows(&base_inputs(), &mut w);
        assert_eq!(p.annual_cash_flows.len(), 10);
        assert_eq!(p.annual_cash_flows[0], dec!(120000));
        assert_eq!(p.annual_cash_flows[1], dec!(122400));
        // 300,000 × 1.02^10 / 0.095 ≈ 3,849,450
        assert!((p.terminal_value - dec!(3849450)).abs() < dec!(10));

        let flows = p.with_investment(dec!(3000000));
        assert_eq!(flows.len(), 11);
        assert_eq!(flows[0], dec!(-3000000));
        assert_eq!(flows[10], p.annual_cash_flows[9] + p.terminal_value);
    }

    #[test]
    fn test_npv_discounts_terminal_in_year_ten() {
        let mut w = Vec::new();
        let inputs = base_inputs();
        let m = compute_returns(&inputs, &mut w);
        let expected = npv(dec!(0.05), &m.projection.with_investment(dec!(3000000))).unwrap();
        assert_eq!(m.net_present_value, expected);
        assert!(m.net_present_value > Decimal::ZERO);
    }

    #[test]
    fn test_irr_converges_for_ordinary_investment() {
        let mut w = Vec::new();
        let m = compute_returns(&base_inputs(), &mut w);
        assert!(m.irr_converged);
        // Positive NPV at 5% puts the IRR above the discount rate
        assert!(m.internal_rate_of_return > dec!(5));
        assert!(m.internal_rate_of_return < dec!(15));
    }

    #[test]
    fn test_irr_fallback_uses_target_yield() {
        // Cash flows never push NPV below zero inside 0-100%
        let inputs = ReturnInputs {
            property_value: dec!(1000),
            total_investment: dec!(1000),
            annual_cash_flow: dec!(300000),
            ..base_inputs()
        };
        let mut w = Vec::new();
        let m = compute_returns(&inputs, &mut w);
        assert!(!m.irr_converged);
        assert_eq!(m.internal_rate_of_return, dec!(7.5));
        assert!(!w.is_empty());
    }

    #[test]
    fn test_zero_appreciation_falls_back_to_two_percent() {
        assert_eq!(effective_appreciation(Decimal::ZERO), dec!(2));
        assert_eq!(effective_appreciation(dec!(3)), dec!(3));
    }

    #[test]
    fn test_non_positive_terminal_cap_excludes_exit_value() {
        let inputs = ReturnInputs {
            adjusted_cap_rate: dec!(0.004),
            ..base_inputs()
        };
        let mut w = Vec::new();
        let p = project_cash_flows(&inputs, &mut w);
        assert_eq!(p.terminal_value, Decimal::ZERO);
        assert_eq!(w.len(), 1);
    }
}
