//! Phone number validation and canonicalization

mod codec;

pub use codec::{hash_phone, mask_phone, PhoneNumberCodec, RegexPhoneCodec};
