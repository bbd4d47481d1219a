//! Invalidation rules of the simulator form state.

use rust_decimal_macros::dec;

use crate::calculator::CalculatorState;
use crate::model::{
    DepositQuote, FrequencyCode, InvestmentParameters, PaymentFrequency, ProductCode,
    TermBound, TermRange,
};

fn params() -> InvestmentParameters {
    InvestmentParameters {
        product: ProductCode("07".into()),
        product_label: "Term deposit".into(),
        term: TermRange {
            min_days: 30,
            max: TermBound::Bounded(720),
        },
        amount_min: dec!(500.00),
        amount_max: dec!(250000.00),
        rate_min: dec!(3.50),
        rate_max: dec!(7.25),
    }
}

fn monthly() -> PaymentFrequency {
    PaymentFrequency {
        code: FrequencyCode("M".into()),
        description: "Monthly".into(),
    }
}

fn at_maturity() -> PaymentFrequency {
    PaymentFrequency {
        code: FrequencyCode("V".into()),
        description: "At maturity".into(),
    }
}

fn quote() -> DepositQuote {
    DepositQuote {
        principal: dec!(2500.00),
        gross_interest: dec!(30.82),
        withholding: dec!(0.00),
        total_payable: dec!(2530.82),
        frequency: FrequencyCode("M".into()),
    }
}

fn ready_calc() -> CalculatorState {
    let mut calc = CalculatorState::new();
    calc.set_amount("2500.00");
    calc.set_term(90, "90 days");
    calc.set_frequencies(vec![monthly(), at_maturity()]);
    calc.choose_frequency(0);
    calc.store_quote(quote());
    calc
}

#[test]
fn changing_amount_drops_quote_and_frequencies() {
    let mut calc = ready_calc();
    calc.set_amount("3000.00");
    assert!(calc.quote().is_none());
    assert!(calc.frequencies().is_empty());
    assert!(calc.frequency().is_none());
}

#[test]
fn changing_term_drops_quote_and_frequencies() {
    let mut calc = ready_calc();
    calc.set_term(180, "180 days");
    assert!(calc.quote().is_none());
    assert!(calc.frequencies().is_empty());
}

#[test]
fn changing_frequency_drops_only_the_quote() {
    let mut calc = ready_calc();
    calc.choose_frequency(1);
    assert!(calc.quote().is_none());
    assert_eq!(calc.frequencies().len(), 2);
    assert_eq!(calc.frequency().unwrap().code, FrequencyCode("V".into()));
}

#[test]
fn a_sole_frequency_option_is_selected_outright() {
    let mut calc = CalculatorState::new();
    calc.set_amount("2500.00");
    calc.set_term(90, "90 days");
    calc.set_frequencies(vec![at_maturity()]);
    assert_eq!(calc.frequency().unwrap().code, FrequencyCode("V".into()));
}

#[test]
fn can_calculate_needs_valid_inputs_and_a_frequency() {
    let p = params();
    let mut calc = CalculatorState::new();
    assert!(!calc.can_calculate(&p));

    calc.set_amount("2500.00");
    calc.set_term(90, "90 days");
    assert!(!calc.can_calculate(&p), "no frequency picked yet");

    calc.set_frequencies(vec![monthly()]);
    assert!(calc.can_calculate(&p));

    calc.set_amount("100000000");
    calc.set_frequencies(vec![monthly()]);
    assert!(!calc.can_calculate(&p), "amount above maximum");
}

#[test]
fn reset_leaves_no_residue() {
    let mut calc = ready_calc();
    calc.reset();
    assert_eq!(calc.amount_text(), "");
    assert!(calc.term_days().is_none());
    assert!(calc.frequencies().is_empty());
    assert!(calc.quote().is_none());
}

#[test]
fn effective_rates_derive_from_authoritative_figures() {
    let q = quote();
    // (2530.82 - 2500.00) / 2500.00 * 100 = 1.2328%
    assert_eq!(q.effective_period_rate().round_dp(4), dec!(1.2328));
    // 1.2328 * 360 / 90 = 4.9312%
    assert_eq!(q.effective_annual_rate(90).round_dp(4), dec!(4.9312));
}
