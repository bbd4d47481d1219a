//! Bottom bar: key hints, or the active error banner.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::state::{AppState, ModalState};

pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }

    fn help_text(state: &AppState) -> &'static str {
        match state.modal {
            ModalState::None => {
                "Tab: field | c: calculate | i: accounts | s: start | r: retry | x: clear | q: quit"
            }
            _ => "",
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let content = if let Some(banner) = &state.banner {
            Line::from(vec![
                Span::styled("Error: ", Style::default().fg(Color::Red)),
                Span::raw(banner.as_str()),
            ])
        } else {
            Line::from(Span::styled(
                Self::help_text(state),
                Style::default().fg(Color::DarkGray),
            ))
        };

        let paragraph = Paragraph::new(content).block(Block::default().borders(Borders::TOP));
        frame.render_widget(paragraph, area);
    }
}
