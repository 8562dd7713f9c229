//! Usage: Domain layer (session state machine).

pub mod session;
