//! Usage: Application layer (service wiring, notices, window shell, logging).

pub mod app_state;
pub mod logging;
pub mod notice;
pub mod shell;
