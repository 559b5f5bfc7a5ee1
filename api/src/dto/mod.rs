//! Request and response bodies

pub mod otp;

pub use otp::{
    OtpResponse, ResendOtpRequest, SendOtpRequest, ValidationErrorResponse, VerifyOtpRequest,
};
