//! Usage: Cross-cutting utilities shared across layers (low-level helpers, error types).

pub(crate) mod error;
pub(crate) mod fs;
pub(crate) mod mutex_ext;

#[cfg(test)]
pub(crate) mod test_server;
