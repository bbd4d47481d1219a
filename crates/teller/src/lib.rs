//! Terminal customer portal for term deposits.
//!
//! Wraps the `teller_core` domain library in a ratatui front end: a
//! simulator form, a funding-account selector, the security-challenge and
//! confirmation overlays, and a background worker for the backend calls.

pub mod app;
pub mod components;
pub mod config;
pub mod controller;
pub mod logging;
pub mod modals;
pub mod screens;
pub mod state;
pub mod worker;

#[cfg(test)]
mod tests;

pub use app::App;
pub use config::PortalConfig;
pub use logging::init_logging;
