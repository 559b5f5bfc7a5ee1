//! Error translation for HTTP responses

pub mod error;

pub use error::{error_response, json_error_handler, status_for, validation_error_response};
