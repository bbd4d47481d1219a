//! Core test suite.

mod calculator;
mod support;
