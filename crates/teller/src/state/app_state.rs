//! Owned state of the portal session.
//!
//! Everything mutable lives here, behind the controller's methods; there
//! are no ambient singletons. One `AppState` per form session.

use teller_core::CalculatorState;
use teller_core::model::{FundingChoice, InvestmentParameters};
use teller_core::process::InvestmentProcess;
use teller_core::validation::CustomTermEntry;

use super::modal::ModalState;

/// Term preset options offered by the simulator; the last slot in the
/// picker is the custom entry.
pub const TERM_PRESETS: &[(u32, &str)] = &[
    (30, "30 days"),
    (60, "60 days"),
    (90, "90 days"),
    (180, "180 days"),
    (360, "360 days"),
];

/// Lifecycle of a remotely fetched value with a retry affordance.
#[derive(Debug)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Amount,
    Term,
    Frequency,
    Accounts,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Amount => Focus::Term,
            Focus::Term => Focus::Frequency,
            Focus::Frequency => Focus::Accounts,
            Focus::Accounts => Focus::Amount,
        }
    }
}

/// UI state of the simulator form that is not part of the validated
/// calculator: focus, the term picker cursor, an in-progress custom term
/// entry, and the inline validation messages.
#[derive(Debug)]
pub struct SimulatorState {
    pub focus: Focus,
    /// Cursor into [`TERM_PRESETS`]; one past the end is "Custom".
    pub preset_index: usize,
    /// `Some` while the user is typing a custom term. Never validated
    /// until committed.
    pub custom_entry: Option<CustomTermEntry>,
    pub amount_error: Option<String>,
    pub term_error: Option<String>,
    pub account_cursor: usize,
}

impl Default for SimulatorState {
    fn default() -> Self {
        Self {
            focus: Focus::Amount,
            preset_index: 0,
            custom_entry: None,
            amount_error: None,
            term_error: None,
            account_cursor: 0,
        }
    }
}

/// Main application state.
#[derive(Debug)]
pub struct AppState {
    pub institution: String,
    pub customer_label: String,

    pub params: LoadState<InvestmentParameters>,
    pub calc: CalculatorState,
    pub funding: LoadState<FundingChoice>,
    pub process: InvestmentProcess,

    pub sim: SimulatorState,
    pub frequencies_pending: bool,
    pub quote_pending: bool,

    pub modal: ModalState,
    pub banner: Option<String>,
    pub exit: bool,
}

impl AppState {
    pub fn new(institution: String, customer_label: String) -> Self {
        Self {
            institution,
            customer_label,
            params: LoadState::Idle,
            calc: CalculatorState::new(),
            funding: LoadState::Idle,
            process: InvestmentProcess::new(),
            sim: SimulatorState::default(),
            frequencies_pending: false,
            quote_pending: false,
            modal: ModalState::None,
            banner: None,
            exit: false,
        }
    }

    pub fn set_banner(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// Whether the start-investment action is currently allowed. The
    /// process re-checks its own preconditions; this only drives the
    /// enabled/disabled rendering.
    pub fn can_start(&self) -> bool {
        self.calc.quote().is_some()
            && self
                .funding
                .ready()
                .and_then(FundingChoice::selected)
                .is_some()
            && !self.process.is_active()
    }

    /// Forget everything tied to the finished attempt: form, quote,
    /// funding selection, picker cursors. Called when the confirmation
    /// or failure view is dismissed.
    pub fn reset_workflow(&mut self) {
        self.calc.reset();
        self.funding = LoadState::Idle;
        self.sim = SimulatorState::default();
        self.frequencies_pending = false;
        self.quote_pending = false;
    }
}
