#[cfg(test)]
mod otp_error_tests;
