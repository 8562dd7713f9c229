//! Usage: Infrastructure adapters (data directory, persistent storage, remote API access).

pub mod api_client;
pub mod app_paths;
pub mod kv_store;
