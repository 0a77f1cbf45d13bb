use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ReitCalcError;
use crate::types::{Money, Rate};
use crate::ReitCalcResult;

/// Step between candidate rates in the IRR search.
pub const IRR_STEP: Rate = dec!(0.001);
/// NPV magnitude (in currency units) accepted as "zero" by the IRR search.
pub const IRR_TOLERANCE: Money = dec!(100);
/// Upper bound on candidate rates (100%).
pub const IRR_MAX_RATE: Rate = dec!(1);
pub const MAX_IRR_ITERATIONS: u32 = 1000;

/// Net Present Value of a series of cash flows, `cash_flows[0]` at t = 0.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> ReitCalcResult<Money> {
    if rate <= dec!(-1) {
        return Err(ReitCalcError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount.checked_mul(one_plus_r).ok_or_else(|| {
                ReitCalcError::FinancialImpossibility(format!(
                    "NPV discount factor overflows at period {t}"
                ))
            })?;
        }
        let present = cf
            .checked_div(discount)
            .ok_or_else(|| ReitCalcError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            })?;
        result = result.checked_add(present).ok_or_else(|| {
            ReitCalcError::FinancialImpossibility(format!("NPV overflows at period {t}"))
        })?;
    }

    Ok(result)
}

/// `(1 + rate)^periods`, or `None` if the power overflows.
pub fn growth_factor(rate: Rate, periods: u32) -> Option<Decimal> {
    (Decimal::ONE + rate).checked_powu(u64::from(periods))
}

/// Level payment on a fully amortising loan: `P * r(1+r)^n / ((1+r)^n - 1)`.
///
/// A zero principal needs no payment and a zero rate amortises straight-line.
/// Returns `None` when there are no periods or the arithmetic overflows.
pub fn amortizing_payment(principal: Money, periodic_rate: Rate, periods: u32) -> Option<Money> {
    if principal.is_zero() {
        return Some(Decimal::ZERO);
    }
    if periods == 0 {
        return None;
    }
    if periodic_rate.is_zero() {
        return principal.checked_div(Decimal::from(periods));
    }

    let compound = growth_factor(periodic_rate, periods)?;
    let numerator = principal.checked_mul(periodic_rate)?.checked_mul(compound)?;
    numerator.checked_div(compound - Decimal::ONE)
}

/// Present value of `periods` level payments: `pmt * (1 - (1+r)^-n) / r`.
pub fn annuity_present_value(payment: Money, periodic_rate: Rate, periods: u32) -> Option<Money> {
    if periodic_rate.is_zero() {
        return payment.checked_mul(Decimal::from(periods));
    }
    let compound = growth_factor(periodic_rate, periods)?;
    let discount = Decimal::ONE.checked_div(compound)?;
    payment
        .checked_mul(Decimal::ONE - discount)?
        .checked_div(periodic_rate)
}

/// Outcome of the bounded IRR search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrSearch {
    /// Rate found, or `None` when the search ran out of range or iterations.
    pub rate: Option<Rate>,
    pub iterations: u32,
}

/// Internal Rate of Return by bounded linear search.
///
/// Walks candidate rates upward from 0 in steps of [`IRR_STEP`]. Stops when
/// `|NPV| < IRR_TOLERANCE`, or steps back one increment as soon as NPV turns
/// negative. Gives up at [`IRR_MAX_RATE`] or [`MAX_IRR_ITERATIONS`].
pub fn irr_linear_search(cash_flows: &[Money]) -> ReitCalcResult<IrrSearch> {
    if cash_flows.len() < 2 {
        return Err(ReitCalcError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let mut rate = Decimal::ZERO;
    let mut iterations = 0u32;

    while rate < IRR_MAX_RATE && iterations < MAX_IRR_ITERATIONS {
        let npv_val = npv(rate, cash_flows)?;

        if npv_val.abs() < IRR_TOLERANCE {
            break;
        }

        if npv_val < Decimal::ZERO && rate > Decimal::ZERO {
            rate -= IRR_STEP;
            break;
        }

        rate += IRR_STEP;
        iterations += 1;
    }

    let rate = if iterations >= MAX_IRR_ITERATIONS || rate >= IRR_MAX_RATE {
        None
    } else {
        Some(rate)
    };

    Ok(IrrSearch { rate, iterations })
}
