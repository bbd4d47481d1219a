//! The deposit simulator screen: the form on the left, the funding
//! account selector on the right, the quote panel underneath the form.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use teller_core::document::quote_summary_lines;
use teller_core::model::FundingChoice;

use crate::controller::DepositController;
use crate::state::{AppState, Focus, LoadState, TERM_PRESETS};

pub fn handle_key(key: KeyEvent, state: &mut AppState, ctl: &mut DepositController) {
    // A custom term entry in progress captures digit input first.
    if state.sim.focus == Focus::Term && state.sim.custom_entry.is_some() {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                ctl.custom_term_push(state, c);
                return;
            }
            KeyCode::Backspace => {
                ctl.custom_term_pop(state);
                return;
            }
            KeyCode::Enter => {
                ctl.term_apply(state);
                return;
            }
            KeyCode::Esc => {
                ctl.custom_term_abort(state);
                return;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Tab => ctl.focus_next(state),
        KeyCode::Char('c') => ctl.calculate(state),
        KeyCode::Char('i') => ctl.request_funding(state),
        KeyCode::Char('s') => ctl.start_investment(state),
        KeyCode::Char('r') => ctl.retry(state),
        KeyCode::Char('x') => ctl.clear_form(state),
        _ => match state.sim.focus {
            Focus::Amount => match key.code {
                KeyCode::Char(c) => ctl.amount_push(state, c),
                KeyCode::Backspace => ctl.amount_pop(state),
                _ => {}
            },
            Focus::Term => match key.code {
                KeyCode::Left => ctl.term_move(state, -1),
                KeyCode::Right => ctl.term_move(state, 1),
                KeyCode::Enter => ctl.term_apply(state),
                _ => {}
            },
            Focus::Frequency => match key.code {
                KeyCode::Left | KeyCode::Up => cycle_frequency(state, ctl, -1),
                KeyCode::Right | KeyCode::Down => cycle_frequency(state, ctl, 1),
                _ => {}
            },
            Focus::Accounts => match key.code {
                KeyCode::Up => ctl.account_cursor_move(state, -1),
                KeyCode::Down => ctl.account_cursor_move(state, 1),
                KeyCode::Enter => ctl.account_select(state),
                _ => {}
            },
        },
    }
}

fn cycle_frequency(state: &mut AppState, ctl: &mut DepositController, delta: i64) {
    let len = state.calc.frequencies().len();
    if len == 0 {
        return;
    }
    let current = state.calc.frequency_index().unwrap_or(0) as i64;
    let next = (current + delta).clamp(0, len as i64 - 1) as usize;
    ctl.choose_frequency(state, next);
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(0)])
        .split(columns[0]);

    render_form(frame, left[0], state);
    render_quote(frame, left[1], state);
    render_accounts(frame, columns[1], state);
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = match state.params.ready() {
        Some(params) => format!(" {} ", params.product_label),
        None => " Deposit Simulator ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    match &state.params {
        LoadState::Idle | LoadState::Loading => {
            lines.push(Line::from(Span::styled(
                "Loading product parameters...",
                Style::default().fg(Color::Yellow),
            )));
        }
        LoadState::Failed(message) => {
            lines.push(Line::from(Span::styled(
                format!("Could not load parameters: {message}"),
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::from(Span::styled(
                "Press r to retry",
                Style::default().fg(Color::DarkGray),
            )));
        }
        LoadState::Ready(params) => {
            lines.push(field_line(
                "Amount",
                &format!("{}_", state.calc.amount_text()),
                state.sim.focus == Focus::Amount,
            ));
            if let Some(error) = &state.sim.amount_error {
                lines.push(error_line(error));
            }

            lines.push(field_line(
                "Term",
                &term_display(state),
                state.sim.focus == Focus::Term,
            ));
            if let Some(error) = &state.sim.term_error {
                lines.push(error_line(error));
            }

            lines.push(field_line(
                "Payment",
                &frequency_display(state),
                state.sim.focus == Focus::Frequency,
            ));

            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(
                    "Rate {}  |  Amount {} - {}",
                    teller_core::model::money::format_percentage(params.rate_max),
                    teller_core::model::money::format_currency(params.amount_min),
                    teller_core::model::money::format_currency(params.amount_max),
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn term_display(state: &AppState) -> String {
    if let Some(entry) = &state.sim.custom_entry {
        return format!("custom: {}_", entry.raw());
    }
    let cursor = state.sim.preset_index;
    let mut parts: Vec<String> = TERM_PRESETS
        .iter()
        .enumerate()
        .map(|(i, (_, label))| {
            if i == cursor {
                format!("[{label}]")
            } else {
                label.to_string()
            }
        })
        .collect();
    parts.push(if cursor == TERM_PRESETS.len() {
        "[custom]".to_string()
    } else {
        "custom".to_string()
    });
    let selected = state
        .calc
        .term_label()
        .map(|l| format!("  ({l})"))
        .unwrap_or_default();
    format!("{}{}", parts.join(" "), selected)
}

fn frequency_display(state: &AppState) -> String {
    if state.frequencies_pending {
        return "loading...".to_string();
    }
    if state.calc.frequencies().is_empty() {
        return "enter a valid amount and term".to_string();
    }
    state
        .calc
        .frequencies()
        .iter()
        .enumerate()
        .map(|(i, f)| {
            if state.calc.frequency_index() == Some(i) {
                format!("[{}]", f.description)
            } else {
                f.description.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_quote(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title(" Quote ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    if state.quote_pending {
        lines.push(Line::from(Span::styled(
            "Simulating...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let (Some(quote), Some(term_days)) = (state.calc.quote(), state.calc.term_days())
    {
        for (label, value) in quote_summary_lines(quote, term_days) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{label:<24}"),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(value),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press i to pick a funding account",
            Style::default().fg(Color::Cyan),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Fill in the form and press c to calculate",
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_accounts(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.sim.focus == Focus::Accounts;
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Funding Account ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &state.funding {
        LoadState::Idle => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Calculate a quote, then press i",
                    Style::default().fg(Color::DarkGray),
                )),
                inner,
            );
        }
        LoadState::Loading => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Looking up eligible accounts...",
                    Style::default().fg(Color::Yellow),
                )),
                inner,
            );
        }
        LoadState::Failed(message) => {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(
                        message.as_str(),
                        Style::default().fg(Color::Red),
                    )),
                    Line::from(Span::styled(
                        "Press r to retry",
                        Style::default().fg(Color::DarkGray),
                    )),
                ]),
                inner,
            );
        }
        LoadState::Ready(FundingChoice::NoneEligible) => {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(
                        "No eligible accounts",
                        Style::default().fg(Color::Red),
                    )),
                    Line::from(Span::styled(
                        "None of your accounts can cover this amount.",
                        Style::default().fg(Color::DarkGray),
                    )),
                ]),
                inner,
            );
        }
        LoadState::Ready(choice) => {
            let selected = choice.selected();
            let items: Vec<ListItem> = choice
                .options()
                .iter()
                .enumerate()
                .map(|(i, account)| {
                    let marker = if selected.map(|a| &a.code) == Some(&account.code) {
                        "(*)"
                    } else {
                        "( )"
                    };
                    let line = format!(
                        "{marker} {} {} [{}]",
                        account.product_label, account.masked_number, account.status
                    );
                    let style = if focused && i == state.sim.account_cursor {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    ListItem::new(line).style(style)
                })
                .collect();
            let footer = if selected.is_some() {
                "Press s to start the investment"
            } else {
                "Up/Down and Enter to choose the account to debit"
            };

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(inner);
            frame.render_widget(List::new(items), chunks[0]);
            frame.render_widget(
                Paragraph::new(Span::styled(footer, Style::default().fg(Color::Cyan))),
                chunks[1],
            );
        }
    }
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::styled(format!("{label:<10}"), label_style),
        Span::raw(value.to_string()),
    ])
}

fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("          {message}"),
        Style::default().fg(Color::Red),
    ))
}
