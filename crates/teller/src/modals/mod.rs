mod helpers;
mod message;
mod outcome;
mod security;

use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::state::{AppState, ModalState};

pub use helpers::centered_rect;
pub use message::render_message_modal;
pub use outcome::render_outcome_modal;
pub use security::render_security_modal;

/// What a modal key press asks the controller to do.
#[derive(Debug, PartialEq, Eq)]
pub enum ModalIntent {
    /// Key was handled, modal still active.
    Continue,
    SubmitAnswer,
    CancelSecurity,
    /// Dismiss the outcome view (triggers the full workflow reset).
    Dismiss,
    DismissMessage,
    Export,
}

/// Render the active modal as an overlay.
pub fn render_modal(frame: &mut Frame, state: &AppState) {
    match &state.modal {
        ModalState::None => {}
        ModalState::Security(modal) => render_security_modal(frame, modal),
        ModalState::Processing => render_processing(frame),
        ModalState::Outcome(modal) => render_outcome_modal(frame, modal),
        ModalState::Message(modal) => render_message_modal(frame, modal),
    }
}

fn render_processing(frame: &mut Frame) {
    let area = centered_rect(44, 5, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Processing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new("Submitting the investment, please wait..."),
        inner,
    );
}

/// Handle key events for the active modal.
pub fn handle_modal_key(key: KeyEvent, state: &mut AppState) -> ModalIntent {
    match &mut state.modal {
        ModalState::None => ModalIntent::Continue,
        ModalState::Security(modal) => security::handle_security_key(key, modal),
        // A commit is in flight; there is nothing to interact with.
        ModalState::Processing => ModalIntent::Continue,
        ModalState::Outcome(modal) => outcome::handle_outcome_key(key, modal),
        ModalState::Message(_) => message::handle_message_key(key),
    }
}
