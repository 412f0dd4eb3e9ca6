//! Core domain + application logic for the join-request gatekeeper bot.
//!
//! This crate is intentionally framework-agnostic. The Telegram Bot API lives
//! behind a port (trait) implemented in the adapter crate, so the poll loop
//! can be driven by a scripted fake in tests.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod poller;
pub mod ports;

pub use errors::{Error, Result};
