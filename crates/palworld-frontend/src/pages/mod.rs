//! Page components for different routes in the application.

pub mod home;
pub mod login;

pub use home::*;
pub use login::*;
