//! Domain model for the deposit portal.

pub mod accounts;
pub mod certificate;
pub mod ids;
pub mod investment;
pub mod money;
pub mod params;
pub mod simulation;

pub use accounts::{FundingAccount, FundingChoice};
pub use certificate::{CertificateQuote, CertificateRecord};
pub use ids::{
    AccountCode, CustomerId, FrequencyCode, InvestmentCode, ProductCode, QuestionId,
};
pub use investment::{CommitOrder, InvestmentReceipt};
pub use params::{
    InvestmentParameters, PaymentFrequency, TermBound, TermRange, UNBOUNDED_TERM_SENTINEL,
};
pub use simulation::DepositQuote;
