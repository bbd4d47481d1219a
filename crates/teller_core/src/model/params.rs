//! Product parameters that bound the deposit simulator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{FrequencyCode, ProductCode};

/// Wire sentinel the backend uses for "no upper term limit".
///
/// Resolved to [`TermBound::Unbounded`] at parse time; the raw value never
/// circulates past the response parser.
pub const UNBOUNDED_TERM_SENTINEL: u32 = 9999;

/// Upper bound on the deposit term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermBound {
    Bounded(u32),
    Unbounded,
}

impl TermBound {
    /// Interpret the backend's encoding of the maximum term.
    pub fn from_backend(days: u32) -> Self {
        if days == UNBOUNDED_TERM_SENTINEL {
            TermBound::Unbounded
        } else {
            TermBound::Bounded(days)
        }
    }

    /// Whether a term of `days` satisfies this bound.
    pub fn permits(&self, days: u32) -> bool {
        match self {
            TermBound::Bounded(max) => days <= *max,
            TermBound::Unbounded => true,
        }
    }
}

/// Valid term window for the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRange {
    pub min_days: u32,
    pub max: TermBound,
}

/// Bounds and identity of the investment product, fetched once per
/// session view and immutable until re-fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentParameters {
    pub product: ProductCode,
    pub product_label: String,
    pub term: TermRange,
    pub amount_min: Decimal,
    pub amount_max: Decimal,
    pub rate_min: Decimal,
    pub rate_max: Decimal,
}

/// An interest payment frequency option.
///
/// The available options depend on the current (amount, term) pair and are
/// re-fetched whenever either changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFrequency {
    pub code: FrequencyCode,
    pub description: String,
}
