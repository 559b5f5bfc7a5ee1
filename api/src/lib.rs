//! # Phone Verify API
//!
//! Actix-web surface for the OTP lifecycle: request DTOs and validation,
//! error-to-status mapping, the `/store/auth/phone/*` routes, configuration
//! loading and startup wiring.

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
