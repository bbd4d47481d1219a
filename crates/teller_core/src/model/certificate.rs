//! Account-certificate product records.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{AccountCode, CustomerId};

/// Fee quoted by the backend for issuing a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateQuote {
    pub fee: Decimal,
}

/// An issued account certificate.
///
/// Only produced after the backend explicitly confirms both the fee debit
/// and the issuance; an ambiguous status never yields a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub certificate_number: String,
    pub customer: CustomerId,
    pub debited_account: AccountCode,
    pub fee: Decimal,
    pub issued_on: Date,
    /// Certified account standing lines, as reported by the backend.
    pub statements: Vec<String>,
}
