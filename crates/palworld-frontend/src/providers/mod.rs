//! Context providers for shared application state and services.

pub mod api;

pub use api::{ApiProvider, use_api};
