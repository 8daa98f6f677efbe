//! Request handlers.

mod analyze;
mod health;

pub use analyze::{analyze_get, analyze_post};
pub use health::health_handler;
