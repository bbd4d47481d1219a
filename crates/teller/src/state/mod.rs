mod app_state;
mod modal;

pub use app_state::{AppState, Focus, LoadState, SimulatorState, TERM_PRESETS};
pub use modal::{MessageModal, ModalState, OutcomeModal, SecurityModal};
