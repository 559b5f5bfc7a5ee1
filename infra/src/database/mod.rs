//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management
//! - Embedded schema migrations
//! - The MySQL verification record store

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{run_migrations, DatabasePool};
pub use mysql::MySqlOtpStore;
