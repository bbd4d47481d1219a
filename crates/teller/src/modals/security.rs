//! The security challenge overlay.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Constraint,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::SecurityModal;

use super::ModalIntent;
use super::helpers::{HelpText, render_modal_frame};

const MODAL_WIDTH: u16 = 56;
const MODAL_HEIGHT: u16 = 11;

pub fn render_security_modal(frame: &mut Frame, modal: &SecurityModal) {
    let mf = render_modal_frame(
        frame,
        "Security Verification",
        MODAL_WIDTH,
        MODAL_HEIGHT,
        Color::Cyan,
        &[
            Constraint::Length(1), // Question (or loading notice)
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Answer input
            Constraint::Length(1), // Error / attempts line
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Help text
        ],
    );

    let question = match (&modal.question, modal.busy) {
        (_, true) => Line::from(Span::styled(
            "Checking your answer...",
            Style::default().fg(Color::Yellow),
        )),
        (Some(q), _) => Line::from(q.as_str()),
        (None, _) => Line::from(Span::styled(
            "Fetching security question...",
            Style::default().fg(Color::Yellow),
        )),
    };
    frame.render_widget(Paragraph::new(question), mf.chunks[0]);

    // The answer is always rendered masked.
    let masked: String = modal.input.chars().map(|_| '*').collect();
    let input = Paragraph::new(format!("Answer: {masked}_"));
    frame.render_widget(input, mf.chunks[2]);

    let status = if let Some(error) = &modal.error {
        Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
    } else {
        Line::from(Span::styled(
            format!("{} attempt(s) remaining", modal.remaining),
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(status), mf.chunks[3]);

    let help = HelpText::new()
        .key("[Enter]", Color::Green, "Submit")
        .key("[Esc]", Color::Yellow, "Cancel")
        .build();
    frame.render_widget(help, mf.chunks[5]);
}

pub fn handle_security_key(key: KeyEvent, modal: &mut SecurityModal) -> ModalIntent {
    match key.code {
        KeyCode::Enter => ModalIntent::SubmitAnswer,
        KeyCode::Esc => ModalIntent::CancelSecurity,
        KeyCode::Backspace => {
            modal.backspace();
            ModalIntent::Continue
        }
        KeyCode::Char(c) => {
            modal.insert_char(c);
            ModalIntent::Continue
        }
        _ => ModalIntent::Continue,
    }
}
