//! Funding accounts eligible to debit the deposit principal.

use serde::{Deserialize, Serialize};

use super::ids::AccountCode;

/// A deposit account with sufficient balance to fund the investment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingAccount {
    pub code: AccountCode,
    pub product_label: String,
    pub masked_number: String,
    pub status: String,
}

/// Outcome of an eligibility fetch.
///
/// Zero results is not an error: it is a terminal insufficient-funds
/// condition for this attempt. Exactly one result auto-selects; more than
/// one requires an explicit user choice before the process may start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingChoice {
    NoneEligible,
    Selected(FundingAccount),
    Choose {
        options: Vec<FundingAccount>,
        selected: Option<usize>,
    },
}

impl FundingChoice {
    pub fn from_fetch(mut accounts: Vec<FundingAccount>) -> Self {
        match accounts.len() {
            0 => FundingChoice::NoneEligible,
            1 => FundingChoice::Selected(accounts.remove(0)),
            _ => FundingChoice::Choose {
                options: accounts,
                selected: None,
            },
        }
    }

    /// The account the process will debit, if one is settled on.
    pub fn selected(&self) -> Option<&FundingAccount> {
        match self {
            FundingChoice::NoneEligible => None,
            FundingChoice::Selected(account) => Some(account),
            FundingChoice::Choose { options, selected } => {
                selected.and_then(|i| options.get(i))
            }
        }
    }

    /// Settle on one of the offered accounts. Out-of-range indices and
    /// calls on non-choice variants are ignored.
    pub fn select(&mut self, index: usize) {
        if let FundingChoice::Choose { options, selected } = self {
            if index < options.len() {
                *selected = Some(index);
            }
        }
    }

    pub fn options(&self) -> &[FundingAccount] {
        match self {
            FundingChoice::NoneEligible => &[],
            FundingChoice::Selected(account) => std::slice::from_ref(account),
            FundingChoice::Choose { options, .. } => options,
        }
    }
}
