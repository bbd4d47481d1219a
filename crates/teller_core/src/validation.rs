//! Pure, synchronous validation of the simulator inputs.
//!
//! Both checks are independent; the caller combines `is_valid` flags with
//! logical AND to gate the calculate action.

use rust_decimal::Decimal;

use crate::model::money::{format_currency, parse_amount};
use crate::model::{InvestmentParameters, TermBound};

/// Minimum raw keystrokes before a custom term entry may commit.
///
/// The semantic minimum is still the product's `min_days`; this only keeps
/// obviously-unfinished input from committing on a stray Enter.
pub const MIN_CUSTOM_TERM_DIGITS: usize = 2;

/// Result of a single field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    pub message: Option<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }
}

/// Validate the deposit amount against the product bounds.
pub fn validate_amount(text: &str, params: &InvestmentParameters) -> Validation {
    let Some(amount) = parse_amount(text) else {
        return Validation::fail("Enter a valid amount");
    };
    if amount <= Decimal::ZERO {
        return Validation::fail("Enter a valid amount");
    }
    if amount < params.amount_min {
        return Validation::fail(format!(
            "Amount is below the minimum of {}",
            format_currency(params.amount_min)
        ));
    }
    if amount > params.amount_max {
        return Validation::fail(format!(
            "Amount is above the maximum of {}",
            format_currency(params.amount_max)
        ));
    }
    Validation::ok()
}

/// Validate a committed term against the product bounds.
///
/// No upper check applies when the product term is unbounded.
pub fn validate_term(days: u32, params: &InvestmentParameters) -> Validation {
    if days == 0 {
        return Validation::fail("Enter a valid term in days");
    }
    if days < params.term.min_days {
        return Validation::fail(format!(
            "Term is below the minimum of {} days",
            params.term.min_days
        ));
    }
    match params.term.max {
        TermBound::Bounded(max) if days > max => {
            Validation::fail(format!("Term is above the maximum of {} days", max))
        }
        _ => Validation::ok(),
    }
}

/// A custom term entry in progress.
///
/// Validation is skipped entirely while the user is mid-keystroke; the raw
/// text never reaches the calculator until [`CustomTermEntry::commit`]
/// succeeds. This state is deliberately distinct from
/// [`TermBound::Unbounded`] — the two concepts share nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomTermEntry {
    raw: String,
}

impl CustomTermEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_digit(&mut self, c: char) {
        if c.is_ascii_digit() && self.raw.len() < 4 {
            self.raw.push(c);
        }
    }

    pub fn pop(&mut self) {
        self.raw.pop();
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Commit the entry into a day count, or `None` if it is still too
    /// short to be a finished term.
    pub fn commit(&self) -> Option<u32> {
        if self.raw.len() < MIN_CUSTOM_TERM_DIGITS {
            return None;
        }
        self.raw.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::model::{ProductCode, TermRange};

    fn params(max_term: TermBound) -> InvestmentParameters {
        InvestmentParameters {
            product: ProductCode("07".into()),
            product_label: "Term deposit".into(),
            term: TermRange {
                min_days: 30,
                max: max_term,
            },
            amount_min: dec!(500.00),
            amount_max: dec!(250000.00),
            rate_min: dec!(3.50),
            rate_max: dec!(7.25),
        }
    }

    #[test]
    fn amount_within_bounds_is_valid() {
        let p = params(TermBound::Bounded(360));
        assert!(validate_amount("2500.00", &p).is_valid);
        assert!(validate_amount("500", &p).is_valid);
        assert!(validate_amount("250000", &p).is_valid);
    }

    #[test]
    fn amount_below_minimum_names_the_bound() {
        let p = params(TermBound::Bounded(360));
        let v = validate_amount("499.99", &p);
        assert!(!v.is_valid);
        assert!(v.message.unwrap().contains("$500.00"));
    }

    #[test]
    fn amount_above_maximum_names_the_bound() {
        let p = params(TermBound::Bounded(360));
        let v = validate_amount("100000000", &p);
        assert!(!v.is_valid);
        assert!(v.message.unwrap().contains("$250,000.00"));
    }

    #[test]
    fn amount_rejects_garbage_and_non_positive() {
        let p = params(TermBound::Bounded(360));
        assert!(!validate_amount("", &p).is_valid);
        assert!(!validate_amount("abc", &p).is_valid);
        assert!(!validate_amount("-10", &p).is_valid);
        assert!(!validate_amount("0", &p).is_valid);
    }

    #[test]
    fn term_bounds_are_enforced() {
        let p = params(TermBound::Bounded(360));
        assert!(!validate_term(0, &p).is_valid);
        assert!(!validate_term(29, &p).is_valid);
        assert!(validate_term(30, &p).is_valid);
        assert!(validate_term(360, &p).is_valid);
        assert!(!validate_term(361, &p).is_valid);
    }

    #[test]
    fn unbounded_term_has_no_upper_check() {
        let p = params(TermBound::Unbounded);
        assert!(validate_term(30, &p).is_valid);
        assert!(validate_term(9999, &p).is_valid);
        assert!(validate_term(20000, &p).is_valid);
        assert!(!validate_term(29, &p).is_valid);
    }

    #[test]
    fn custom_entry_needs_two_digits_to_commit() {
        let mut entry = CustomTermEntry::new();
        entry.push_digit('9');
        assert_eq!(entry.commit(), None);
        entry.push_digit('0');
        assert_eq!(entry.commit(), Some(90));
    }

    #[test]
    fn custom_entry_ignores_non_digits() {
        let mut entry = CustomTermEntry::new();
        entry.push_digit('a');
        entry.push_digit('-');
        assert_eq!(entry.raw(), "");
        entry.push_digit('1');
        entry.push_digit('8');
        entry.push_digit('0');
        assert_eq!(entry.commit(), Some(180));
    }
}
