//! The deposit quote returned by the backend simulator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::FrequencyCode;

/// Days in the banking year used to annualize period rates for display.
const BANKING_YEAR_DAYS: u32 = 360;

/// A simulated deposit breakdown.
///
/// Principal, interest, withholding, and total are authoritative backend
/// figures and are never recomputed locally; only the effective rates are
/// derived on this side, purely for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositQuote {
    pub principal: Decimal,
    pub gross_interest: Decimal,
    pub withholding: Decimal,
    pub total_payable: Decimal,
    /// Frequency the figures were computed for. A quote is only valid for
    /// the exact option it was requested with.
    pub frequency: FrequencyCode,
}

impl DepositQuote {
    /// Net yield over the term, as a percentage of principal.
    pub fn effective_period_rate(&self) -> Decimal {
        if self.principal.is_zero() {
            return Decimal::ZERO;
        }
        (self.total_payable - self.principal) / self.principal * Decimal::from(100)
    }

    /// Period rate annualized over a 360-day banking year.
    pub fn effective_annual_rate(&self, term_days: u32) -> Decimal {
        if term_days == 0 {
            return Decimal::ZERO;
        }
        self.effective_period_rate() * Decimal::from(BANKING_YEAR_DAYS)
            / Decimal::from(term_days)
    }
}
