//! Shared error types and utilities for the palworld front-end.
#[cfg(not(target_arch = "wasm32"))]
pub use color_eyre::Report;

pub use crate::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("Failed to install color_eyre: {0}")]
    ColorEyre(String),
    #[error("Failed to install tracing-subscriber")]
    TracingSubscriber(#[from] Box<dyn std::error::Error + Send + Sync>),
}
