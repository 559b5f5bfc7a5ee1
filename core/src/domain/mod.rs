//! Domain layer containing the verification record entity.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
