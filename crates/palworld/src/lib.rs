//! The shared library for the Palworld front-end.
//!
//! This library provides the API client used by the browser application, the transport
//! and interceptor seams it is built on, the wire data structures, error handling, logging, and macros.

pub mod api;
pub mod config;
pub mod data;
pub mod errors;
pub mod interceptor;
pub mod log;
pub mod macros;
pub mod transport;

pub use serde;
pub use serde_json;
pub use tracing;
