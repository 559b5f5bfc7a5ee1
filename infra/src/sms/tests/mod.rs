//! Unit tests for SMS module

#[cfg(test)]
mod create_sender_tests;
