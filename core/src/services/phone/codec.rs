//! Phone number codec
//!
//! Turns user-supplied phone strings into one canonical national form so
//! that records, rate limit keys and lookups agree on the same number
//! however it was typed.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

/// Nepal mobile numbers: 10 digits starting with 97 or 98
static NEPAL_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(98|97)\d{8}$").unwrap());

/// Country calling code for Nepal
const NEPAL_COUNTRY_CODE: &str = "977";

/// Validation and canonicalization for one country's mobile numbers
pub trait PhoneNumberCodec: Send + Sync {
    /// Whether `raw` names a valid mobile number once formatting and any
    /// country prefix are removed
    fn validate(&self, raw: &str) -> bool;

    /// Canonical national form of `raw`
    ///
    /// Idempotent. Meaningful only for inputs that pass [`validate`].
    ///
    /// [`validate`]: PhoneNumberCodec::validate
    fn normalize(&self, raw: &str) -> String;

    /// Country calling code without the leading `+`
    fn country_code(&self) -> &str;

    /// International dialing form of a canonical number
    fn to_international(&self, canonical: &str) -> String {
        format!("+{}{}", self.country_code(), canonical)
    }
}

/// Codec driven by a national-number regex and a country calling code
///
/// Accepted prefixes are `+<cc>` and `<cc>`. Spaces, hyphens and
/// parentheses are ignored.
#[derive(Debug, Clone)]
pub struct RegexPhoneCodec {
    country_code: String,
    national_pattern: Regex,
}

impl RegexPhoneCodec {
    /// Build a codec for an arbitrary country
    pub fn new(
        country_code: impl Into<String>,
        national_pattern: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            country_code: country_code.into(),
            national_pattern: Regex::new(national_pattern)?,
        })
    }

    /// Codec for Nepal mobile numbers
    pub fn nepal() -> Self {
        Self {
            country_code: NEPAL_COUNTRY_CODE.to_string(),
            national_pattern: NEPAL_MOBILE_REGEX.clone(),
        }
    }

    fn strip_formatting(raw: &str) -> String {
        raw.chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
            .collect()
    }

    /// National part of an already-cleaned number
    ///
    /// A bare `<cc>` prefix is only stripped when the number is not already
    /// a valid national number, since some national numbers start with the
    /// country code digits.
    fn national_part<'a>(&self, cleaned: &'a str) -> &'a str {
        if let Some(rest) = cleaned
            .strip_prefix('+')
            .and_then(|s| s.strip_prefix(self.country_code.as_str()))
        {
            return rest;
        }

        if self.national_pattern.is_match(cleaned) {
            return cleaned;
        }

        cleaned
            .strip_prefix(self.country_code.as_str())
            .unwrap_or(cleaned)
    }
}

impl Default for RegexPhoneCodec {
    fn default() -> Self {
        Self::nepal()
    }
}

impl PhoneNumberCodec for RegexPhoneCodec {
    fn validate(&self, raw: &str) -> bool {
        let cleaned = Self::strip_formatting(raw);
        self.national_pattern.is_match(self.national_part(&cleaned))
    }

    fn normalize(&self, raw: &str) -> String {
        let cleaned = Self::strip_formatting(raw);
        self.national_part(&cleaned).to_string()
    }

    fn country_code(&self) -> &str {
        &self.country_code
    }
}

/// Mask a phone number for logging, keeping the last four digits
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("***{}", tail)
}

/// SHA-256 hex digest of a phone number, used in cache keys
pub fn hash_phone(phone: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(phone.as_bytes());
    format!("{:x}", hasher.finalize())
}
