//! Commit payload and the receipt of a committed investment.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{AccountCode, CustomerId, FrequencyCode, InvestmentCode};

/// The outbound commit payload.
///
/// Assembled exactly once when the process enters the security phase and
/// immutable from then on; the commit request is built from this and
/// nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOrder {
    pub customer: CustomerId,
    pub frequency: FrequencyCode,
    pub amount: Decimal,
    pub term_days: u32,
    pub rate: Decimal,
    pub funding_account: AccountCode,
}

/// Terminal artifact of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentReceipt {
    pub investment_code: InvestmentCode,
    pub principal: Decimal,
    pub interest: Decimal,
    pub withholding: Decimal,
    pub total_receivable: Decimal,
    pub start_date: Date,
    pub maturity_date: Date,
}
