pub mod core;
pub mod logging;

// Re-export the counter module so tests and callers can use it directly.
pub use crate::core::rolling;
