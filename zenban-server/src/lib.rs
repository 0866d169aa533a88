//! Zenban REST server library.
//!
//! Exposes the HTTP API, configuration and server startup for use in tests
//! and embedding. All board logic lives in `zenban-core`; this crate only
//! decodes requests, serializes access to the board and maps errors onto
//! HTTP statuses.

pub mod api;
pub mod config;
pub mod server;
pub mod state;
