//! Confirmation and failure views of a finished commit.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Constraint,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use teller_core::model::money::format_currency;

use crate::state::OutcomeModal;

use super::ModalIntent;
use super::helpers::{HelpText, render_modal_frame};

const MODAL_WIDTH: u16 = 60;

pub fn render_outcome_modal(frame: &mut Frame, modal: &OutcomeModal) {
    if modal.is_success() {
        render_success(frame, modal);
    } else {
        render_failure(frame, modal);
    }
}

fn render_success(frame: &mut Frame, modal: &OutcomeModal) {
    let Some(receipt) = &modal.receipt else {
        return;
    };

    let mf = render_modal_frame(
        frame,
        "Investment Confirmed",
        MODAL_WIDTH,
        16,
        Color::Green,
        &[
            Constraint::Length(1),  // Investment code
            Constraint::Length(1),  // Spacing
            Constraint::Length(6),  // Figures
            Constraint::Length(2),  // Dates
            Constraint::Length(1),  // Export notice
            Constraint::Length(1),  // Spacing
            Constraint::Length(1),  // Help text
        ],
    );

    frame.render_widget(
        Paragraph::new(format!("Investment {}", receipt.investment_code)),
        mf.chunks[0],
    );

    let figures = vec![
        figure_line("Principal", format_currency(receipt.principal)),
        figure_line("Gross interest", format_currency(receipt.interest)),
        figure_line("Withholding", format_currency(receipt.withholding)),
        figure_line(
            "Total at maturity",
            format_currency(receipt.total_receivable),
        ),
    ];
    frame.render_widget(Paragraph::new(figures), mf.chunks[2]);

    let dates = vec![
        Line::from(format!("Start date:  {}", receipt.start_date)),
        Line::from(format!("Maturity:    {}", receipt.maturity_date)),
    ];
    frame.render_widget(Paragraph::new(dates), mf.chunks[3]);

    if let Some(path) = &modal.exported {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("Saved to {}", path.display()),
                Style::default().fg(Color::Green),
            ))),
            mf.chunks[4],
        );
    }

    let help = HelpText::new()
        .key("[e]", Color::Cyan, "Export document")
        .key("[Enter]", Color::Green, "Done")
        .build();
    frame.render_widget(help, mf.chunks[6]);
}

fn render_failure(frame: &mut Frame, modal: &OutcomeModal) {
    let mf = render_modal_frame(
        frame,
        "Investment Failed",
        MODAL_WIDTH,
        11,
        Color::Red,
        &[
            Constraint::Length(3), // Backend message
            Constraint::Length(1), // Spacing
            Constraint::Length(2), // Funds notice
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Help text
        ],
    );

    let message = modal.failure.as_deref().unwrap_or("The operation failed.");
    frame.render_widget(
        Paragraph::new(message).wrap(Wrap { trim: true }),
        mf.chunks[0],
    );

    frame.render_widget(
        Paragraph::new(
            "No funds were moved. To try again, run a new simulation \
             and start over.",
        )
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Yellow)),
        mf.chunks[2],
    );

    let help = HelpText::new()
        .key("[Enter]", Color::Green, "or")
        .key("[Esc]", Color::Yellow, "to dismiss")
        .build();
    frame.render_widget(help, mf.chunks[4]);
}

fn figure_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<20}"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value),
    ])
}

pub fn handle_outcome_key(key: KeyEvent, modal: &OutcomeModal) -> ModalIntent {
    match key.code {
        KeyCode::Char('e') | KeyCode::Char('E') if modal.is_success() => ModalIntent::Export,
        KeyCode::Enter | KeyCode::Esc => ModalIntent::Dismiss,
        _ => ModalIntent::Continue,
    }
}
