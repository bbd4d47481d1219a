//! Application shell: the event loop, drawing, and key dispatch.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use teller_core::api::Gateway;

use crate::components::status_bar::StatusBar;
use crate::config::PortalConfig;
use crate::controller::DepositController;
use crate::modals::{ModalIntent, handle_modal_key, render_modal};
use crate::screens::simulator;
use crate::state::{AppState, ModalState};
use crate::worker::GatewayWorker;

/// How long to block on terminal input before polling worker replies.
const TICK: Duration = Duration::from_millis(100);

pub struct App {
    state: AppState,
    controller: DepositController,
    status_bar: StatusBar,
}

impl App {
    pub fn new(config: &PortalConfig, data_dir: PathBuf, gateway: Box<dyn Gateway>) -> Self {
        let customer = gateway.session().customer.clone();
        let worker = GatewayWorker::new(gateway);
        let mut state = AppState::new(config.institution.clone(), config.customer_label());
        let mut controller = DepositController::new(worker, customer, data_dir);

        controller.load_parameters(&mut state);

        Self {
            state,
            controller,
            status_bar: StatusBar::new(),
        }
    }

    /// Runs the application's main loop until the user quits.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        while !self.state.exit {
            self.controller.poll(&mut self.state);
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title bar
                Constraint::Min(0),    // Content
                Constraint::Length(2), // Status bar
            ])
            .split(frame.area());

        self.render_title(frame, chunks[0]);
        simulator::render(frame, chunks[1], &self.state);
        self.status_bar.render(frame, chunks[2], &self.state);

        render_modal(frame, &self.state);
    }

    fn render_title(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let title = Line::from(vec![
            Span::styled(
                format!(" {} ", self.state.institution),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("— Term Deposits  "),
            Span::styled(
                self.state.customer_label.clone(),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(title).block(Block::default().borders(Borders::BOTTOM)),
            area,
        );
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if !event::poll(TICK)? {
            return Ok(());
        }
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        // Modal captures everything while active.
        if !matches!(self.state.modal, ModalState::None) {
            match handle_modal_key(key_event, &mut self.state) {
                ModalIntent::SubmitAnswer => {
                    self.controller.submit_answer(&mut self.state);
                }
                ModalIntent::CancelSecurity => {
                    self.controller.cancel_security(&mut self.state);
                }
                ModalIntent::Dismiss => {
                    self.controller.dismiss_outcome(&mut self.state);
                }
                ModalIntent::DismissMessage => {
                    self.controller.dismiss_message(&mut self.state);
                }
                ModalIntent::Export => {
                    self.controller.export_confirmation(&mut self.state);
                }
                ModalIntent::Continue => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') if key_event.modifiers.is_empty() => {
                self.state.exit = true;
            }
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.exit = true;
            }
            KeyCode::Esc => {
                if self.state.sim.custom_entry.is_some() {
                    simulator::handle_key(key_event, &mut self.state, &mut self.controller);
                } else {
                    self.state.clear_banner();
                }
            }
            _ => simulator::handle_key(key_event, &mut self.state, &mut self.controller),
        }
    }
}
