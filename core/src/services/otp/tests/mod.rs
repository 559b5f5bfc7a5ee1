//! Tests for the OTP lifecycle

#[cfg(test)]
mod cleanup_tests;
