//! Client-side state of the deposit simulator form.
//!
//! The calculator owns the mutable form inputs and the derived quote, and
//! enforces the invalidation rules: the quote is only ever valid for the
//! exact (amount, term, frequency) triple it was computed from, and the
//! frequency list is only valid for the (amount, term) pair it was fetched
//! for.

use rust_decimal::Decimal;

use crate::model::money::parse_amount;
use crate::model::{DepositQuote, InvestmentParameters, PaymentFrequency};
use crate::validation::{validate_amount, validate_term};

#[derive(Debug, Clone, Default)]
pub struct CalculatorState {
    amount_text: String,
    term_days: Option<u32>,
    term_label: Option<String>,
    frequencies: Vec<PaymentFrequency>,
    frequency_index: Option<usize>,
    quote: Option<DepositQuote>,
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount_text(&self) -> &str {
        &self.amount_text
    }

    pub fn amount(&self) -> Option<Decimal> {
        parse_amount(&self.amount_text)
    }

    pub fn term_days(&self) -> Option<u32> {
        self.term_days
    }

    pub fn term_label(&self) -> Option<&str> {
        self.term_label.as_deref()
    }

    pub fn frequencies(&self) -> &[PaymentFrequency] {
        &self.frequencies
    }

    pub fn frequency_index(&self) -> Option<usize> {
        self.frequency_index
    }

    pub fn frequency(&self) -> Option<&PaymentFrequency> {
        self.frequency_index.and_then(|i| self.frequencies.get(i))
    }

    pub fn quote(&self) -> Option<&DepositQuote> {
        self.quote.as_ref()
    }

    /// Replace the amount text. Invalidates the quote and the frequency
    /// list, which were keyed by the previous amount.
    pub fn set_amount(&mut self, text: impl Into<String>) {
        self.amount_text = text.into();
        self.clear_derived();
    }

    /// Replace the committed term. Same invalidation as the amount.
    pub fn set_term(&mut self, days: u32, label: impl Into<String>) {
        self.term_days = Some(days);
        self.term_label = Some(label.into());
        self.clear_derived();
    }

    pub fn clear_term(&mut self) {
        self.term_days = None;
        self.term_label = None;
        self.clear_derived();
    }

    /// Install a freshly fetched frequency list for the current
    /// (amount, term) pair. A sole option is selected outright.
    pub fn set_frequencies(&mut self, frequencies: Vec<PaymentFrequency>) {
        self.frequency_index = if frequencies.len() == 1 { Some(0) } else { None };
        self.frequencies = frequencies;
        self.quote = None;
    }

    /// Pick a frequency option. The quote was computed for the previous
    /// pick, so it is dropped.
    pub fn choose_frequency(&mut self, index: usize) {
        if index < self.frequencies.len() {
            self.frequency_index = Some(index);
            self.quote = None;
        }
    }

    pub fn store_quote(&mut self, quote: DepositQuote) {
        self.quote = Some(quote);
    }

    /// Whether the calculate action is allowed: both validations pass and
    /// a frequency has been picked.
    pub fn can_calculate(&self, params: &InvestmentParameters) -> bool {
        let amount_ok = validate_amount(&self.amount_text, params).is_valid;
        let term_ok = self
            .term_days
            .map(|d| validate_term(d, params).is_valid)
            .unwrap_or(false);
        amount_ok && term_ok && self.frequency().is_some()
    }

    /// Reset the whole form. Called on clear and on process completion;
    /// no residual input or quote survives.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn clear_derived(&mut self) {
        self.frequencies.clear();
        self.frequency_index = None;
        self.quote = None;
    }
}
