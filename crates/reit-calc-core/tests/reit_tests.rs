use proptest::prelude::*;
use reit_calc_core::reit::{calculate, ExpenseApproach, InvestmentInput, LandOwnership};
use reit_calc_core::ReitCalcError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference_input() -> InvestmentInput {
    InvestmentInput {
        country: "us".into(),
        rental_income: Some(dec!(30000)),
        expenses: dec!(5000),
        expense_approach: ExpenseApproach::Direct,
        occupancy_rate: dec!(95),
        target_reit_yield: Some(dec!(5)),
        land_ownership: LandOwnership::Purchase,
        land_price: dec!(1000000),
        construction_cost: dec!(2000000),
        other_costs: dec!(200000),
        loan_amount: dec!(2000000),
        interest_rate: dec!(5),
        loan_term: 20,
        ..Default::default()
    }
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn test_non_positive_rent_is_rejected() {
    for rent in [None, Some(Decimal::ZERO), Some(dec!(-100))] {
        let input = InvestmentInput {
            rental_income: rent,
            ..reference_input()
        };
        match calculate(&input) {
            Err(ReitCalcError::InvalidInput { field, reason }) => {
                assert_eq!(field, "rental_income");
                assert!(reason.contains("required"));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}

#[test]
fn test_input_from_json_uses_defaults() {
    let input: InvestmentInput = serde_json::from_str(
        r#"{"country": "peru", "rental_income": 30000, "expenses": 5000, "expense_approach": "direct"}"#,
    )
    .unwrap();
    let out = calculate(&input).unwrap();
    let p = &out.result.parameters;
    assert_eq!(p.country, "peru");
    assert_eq!(p.target_reit_yield, dec!(6.5));
    assert_eq!(p.operating_expense_rate, dec!(3.5));
    assert_eq!(p.occupancy_rate, dec!(95));
    assert_eq!(p.interest_rate, dec!(7.5));
    assert_eq!(p.loan_term, 15);
}

// ===========================================================================
// Reference scenario
// ===========================================================================

#[test]
fn test_reference_scenario() {
    let out = calculate(&reference_input()).unwrap();
    let r = &out.result;

    // 360,000 rent - 60,000 expenses, no occupancy on this path
    assert_eq!(r.annual_net_income, dec!(300000));

    // US: 0.05 / 0.90 + 0.03 + 0.015
    assert!((r.adjusted_cap_rate - dec!(10.0556)).abs() < dec!(0.001));
    assert_eq!(r.adjusted_cap_rate, r.standardized_cap_rate);

    // Benchmark NOI = 30,000 × 12 × 0.95 - 60,000 = 282,000
    let expected_benchmark = dec!(282000) / (dec!(0.05) / dec!(0.90) + dec!(0.045));
    assert!((r.max_property_cost_for_reit - expected_benchmark).abs() < dec!(1));
    assert!(r.reconciled_to_benchmark);
    assert_eq!(r.total_investment, r.max_property_cost_for_reit);

    // Debt service on the 2M loan
    assert!((r.annual_debt_service - dec!(158389)).abs() < dec!(1));
    assert!((r.debt_service_coverage_ratio - dec!(1.894)).abs() < dec!(0.001));

    assert!(r.break_even_point > Decimal::ZERO);
    assert_eq!(r.projected_cash_flows.len(), 10);
    assert!(r.terminal_value > Decimal::ZERO);
}

#[test]
fn test_reconciled_scenario_measures_returns_on_property_value() {
    let r = calculate(&reference_input()).unwrap().result;
    assert!(r.reconciled_to_benchmark);
    assert_ne!(r.total_investment, r.property_value);

    let equity = r.property_value - r.parameters.loan_amount;
    assert_eq!(r.leveraged_roi, r.annual_cash_flow / equity * dec!(100));
    assert_eq!(
        r.unleveraged_roi,
        r.annual_net_income / r.property_value * dec!(100)
    );
    // 141,611 / (2,983,425 - 2,000,000) and 300,000 / 2,983,425
    assert!((r.leveraged_roi - dec!(14.400)).abs() < dec!(0.01), "got {}", r.leveraged_roi);
    assert!((r.unleveraged_roi - dec!(10.056)).abs() < dec!(0.01), "got {}", r.unleveraged_roi);
    assert_eq!(r.actual_roi, r.leveraged_roi);

    // Break-even alone follows the reconciled investment
    assert_eq!(r.break_even_point, r.total_investment / r.annual_net_income);
}

#[test]
fn test_extreme_fields_warn_instead_of_failing() {
    let cases = [
        InvestmentInput {
            target_reit_yield: Some(dec!(-100)),
            ..reference_input()
        },
        InvestmentInput {
            appreciation_rate: dec!(100000),
            ..reference_input()
        },
        InvestmentInput {
            rental_income: Some(Decimal::MAX / dec!(2)),
            ..reference_input()
        },
        InvestmentInput {
            expense_approach: ExpenseApproach::Percentage,
            cap_rate: Some(dec!(0.0000000000000000000001)),
            ..reference_input()
        },
        InvestmentInput {
            operating_expense_rate: Some(dec!(-8.5)),
            admin_expense_rate: Some(dec!(-2.05)),
            loan_amount: Decimal::ZERO,
            ..reference_input()
        },
    ];
    for input in cases {
        let out = calculate(&input);
        assert!(out.is_ok(), "{input:?} failed with {out:?}");
        assert!(!out.unwrap().warnings.is_empty());
    }
}

#[test]
fn test_lease_scenario_deducts_lease_from_noi() {
    let input = InvestmentInput {
        land_ownership: LandOwnership::Lease,
        land_price: Decimal::ZERO,
        land_lease_annual: dec!(80000),
        land_lease_term: 30,
        loan_amount: dec!(1500000),
        ..reference_input()
    };
    let r = calculate(&input).unwrap().result;
    assert_eq!(r.annual_net_income, dec!(220000));
    assert_eq!(r.parameters.annual_land_lease_cost, dec!(80000));
    // Lease is deducted again below the NOI line
    assert_eq!(
        r.annual_cash_flow,
        r.annual_net_income - r.annual_debt_service - dec!(80000)
    );
}

#[test]
fn test_custom_rates_report_both_valuations() {
    let input = InvestmentInput {
        operating_expense_rate: Some(dec!(5)),
        admin_expense_rate: Some(dec!(2)),
        ..reference_input()
    };
    let r = calculate(&input).unwrap().result;
    assert!(!r.reconciled_to_benchmark);
    assert_eq!(r.total_investment, r.property_value);
    assert_ne!(r.total_investment, r.max_property_cost_for_reit);
}

#[test]
fn test_default_rates_given_explicitly_still_reconcile() {
    let input = InvestmentInput {
        operating_expense_rate: Some(dec!(3)),
        admin_expense_rate: Some(dec!(1.5)),
        ..reference_input()
    };
    let r = calculate(&input).unwrap().result;
    assert_eq!(r.total_investment, r.max_property_cost_for_reit);
}

#[test]
fn test_calculation_is_deterministic() {
    let a = calculate(&reference_input()).unwrap();
    let b = calculate(&reference_input()).unwrap();
    assert_eq!(a.result, b.result);
    assert_eq!(a.warnings, b.warnings);
}

#[test]
fn test_peru_benchmark_below_us_in_percentage_mode() {
    let us = InvestmentInput {
        expense_approach: ExpenseApproach::Percentage,
        ..reference_input()
    };
    let peru = InvestmentInput {
        country: "peru".into(),
        ..us.clone()
    };
    let us_r = calculate(&us).unwrap().result;
    let peru_r = calculate(&peru).unwrap().result;
    assert!(peru_r.max_property_cost_for_reit < us_r.max_property_cost_for_reit);
}

#[test]
fn test_result_serializes_without_error() {
    let out = calculate(&reference_input()).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert!(json["result"]["total_investment"].is_string());
    assert_eq!(json["result"]["parameters"]["country"], "us");
    assert_eq!(
        json["methodology"],
        "REIT/FIBRA Regulation-Adjusted Income Valuation"
    );
}

// ===========================================================================
// Properties
// ===========================================================================

fn direct_input(rent: u32, expenses: u32, occupancy: u32, yield_bp: u32) -> InvestmentInput {
    InvestmentInput {
        rental_income: Some(Decimal::from(rent)),
        expenses: Decimal::from(expenses),
        occupancy_rate: Decimal::from(occupancy),
        target_reit_yield: Some(Decimal::new(i64::from(yield_bp), 2)),
        ..reference_input()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_positive_rent_never_errors(
        rent in 1u32..500_000,
        expenses in 0u32..500_000,
        occupancy in 0u32..=100,
        yield_bp in 0u32..1500,
        appreciation in 0u32..10,
        loan in 0u32..20_000_000,
        percentage in any::<bool>(),
        lease in any::<bool>(),
    ) {
        let mut input = direct_input(rent, expenses, occupancy, yield_bp);
        input.appreciation_rate = Decimal::from(appreciation);
        input.loan_amount = Decimal::from(loan);
        if percentage {
            input.expense_approach = ExpenseApproach::Percentage;
        }
        if lease {
            input.land_ownership = LandOwnership::Lease;
            input.land_lease_annual = dec!(50000);
        }
        prop_assert!(calculate(&input).is_ok());
    }

    #[test]
    fn prop_extreme_inputs_never_error(
        rent_scale in 0u32..20,
        expenses in -1_000_000_000i64..1_000_000_000_000,
        occupancy in -5_000i64..5_000,
        yield_pct in -20_000i64..20_000,
        op_rate in -2_000i64..2_000,
        appreciation in -200_000i64..200_000,
        cap_rate in -1_000i64..1_000,
        loan in -1_000_000_000i64..i64::MAX,
        interest in -500i64..500,
        loan_term in 0u32..u32::MAX,
        percentage in any::<bool>(),
        lease in any::<bool>(),
    ) {
        let input = InvestmentInput {
            rental_income: Some(Decimal::from(10u64.pow(rent_scale))),
            expenses: Decimal::from(expenses),
            occupancy_rate: Decimal::from(occupancy),
            target_reit_yield: Some(Decimal::from(yield_pct)),
            operating_expense_rate: Some(Decimal::new(op_rate, 1)),
            appreciation_rate: Decimal::from(appreciation),
            cap_rate: Some(Decimal::new(cap_rate, 2)),
            loan_amount: Decimal::from(loan),
            interest_rate: Decimal::from(interest),
            loan_term,
            expense_approach: if percentage {
                ExpenseApproach::Percentage
            } else {
                ExpenseApproach::Direct
            },
            land_ownership: if lease { LandOwnership::Lease } else { LandOwnership::Purchase },
            land_lease_annual: dec!(50000),
            land_lease_term: loan_term,
            ..reference_input()
        };
        let out = calculate(&input);
        prop_assert!(out.is_ok(), "{:?}", out.err());
    }

    #[test]
    fn prop_more_rent_raises_noi_and_investment(
        rent in 10_000u32..200_000,
        bump in 1u32..50_000,
        expenses in 0u32..5_000,
        occupancy in 50u32..=100,
    ) {
        let low = calculate(&direct_input(rent, expenses, occupancy, 500)).unwrap().result;
        let high = calculate(&direct_input(rent + bump, expenses, occupancy, 500)).unwrap().result;
        prop_assert!(high.annual_net_income > low.annual_net_income);
        prop_assert!(high.total_investment > low.total_investment);
    }

    #[test]
    fn prop_higher_target_yield_lowers_valuation(
        rent in 10_000u32..200_000,
        expenses in 0u32..5_000,
        yield_bp in 100u32..1000,
        bump in 1u32..500,
    ) {
        let low = calculate(&direct_input(rent, expenses, 95, yield_bp)).unwrap().result;
        let high = calculate(&direct_input(rent, expenses, 95, yield_bp + bump)).unwrap().result;
        prop_assert!(high.adjusted_cap_rate > low.adjusted_cap_rate);
        prop_assert!(high.total_investment < low.total_investment);
        prop_assert!(high.max_property_cost_for_reit < low.max_property_cost_for_reit);
    }

    #[test]
    fn prop_peru_benchmark_below_us(
        rent in 10_000u32..200_000,
        expenses in 0u32..5_000,
        yield_bp in 100u32..1000,
    ) {
        let us = direct_input(rent, expenses, 95, yield_bp);
        let peru = InvestmentInput { country: "peru".into(), ..us.clone() };
        let us_r = calculate(&us).unwrap().result;
        let peru_r = calculate(&peru).unwrap().result;
        prop_assert!(peru_r.max_property_cost_for_reit < us_r.max_property_cost_for_reit);
    }

    #[test]
    fn prop_default_rates_reconcile(
        rent in 1u32..200_000,
        expenses in 0u32..50_000,
        peru in any::<bool>(),
    ) {
        let mut input = direct_input(rent, expenses, 95, 500);
        if peru {
            input.country = "peru".into();
        }
        let r = calculate(&input).unwrap().result;
        prop_assert_eq!(r.total_investment, r.max_property_cost_for_reit);
    }
}
