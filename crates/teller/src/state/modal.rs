//! Modal types for the investment workflow overlays.

use std::path::PathBuf;

use teller_core::model::InvestmentReceipt;

#[derive(Debug)]
pub enum ModalState {
    None,
    Security(SecurityModal),
    /// Commit request in flight; nothing to interact with.
    Processing,
    Outcome(OutcomeModal),
    Message(MessageModal),
}

/// The security challenge overlay.
#[derive(Debug)]
pub struct SecurityModal {
    /// `None` while the question is still being fetched.
    pub question: Option<String>,
    pub input: String,
    pub error: Option<String>,
    pub remaining: u8,
    /// An answer is being validated remotely; input is locked.
    pub busy: bool,
}

impl SecurityModal {
    pub fn loading(remaining: u8) -> Self {
        Self {
            question: None,
            input: String::new(),
            error: None,
            remaining,
            busy: false,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.busy && !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.busy {
            self.input.pop();
        }
    }
}

/// Terminal view of a finished commit: the receipt on success, the
/// failure message (with the funds-did-not-move notice) otherwise.
#[derive(Debug)]
pub struct OutcomeModal {
    pub receipt: Option<InvestmentReceipt>,
    pub term_days: u32,
    pub failure: Option<String>,
    /// Where the confirmation document was written, once exported.
    pub exported: Option<PathBuf>,
}

impl OutcomeModal {
    pub fn success(receipt: InvestmentReceipt, term_days: u32) -> Self {
        Self {
            receipt: Some(receipt),
            term_days,
            failure: None,
            exported: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            receipt: None,
            term_days: 0,
            failure: Some(message.into()),
            exported: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug)]
pub struct MessageModal {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

impl MessageModal {
    pub fn info(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            is_error: false,
        }
    }

    pub fn error(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            is_error: true,
        }
    }
}
