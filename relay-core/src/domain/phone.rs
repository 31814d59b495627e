//! Jordanian phone number normalization and validation.
//!
//! Every phone number sent to Meta or WhatsApp goes through here first.
//! Raw input arrives in whatever shape the storefront collected it
//! (`+962 79 123 4567`, `0791234567`, `00962791234567`, …) and leaves as a
//! canonical international digit string, or as a flagged best-effort value
//! when the shape is not recognized.
//!
//! An invalid phone number is a normal outcome, not a fault: the result
//! carries the reason instead of this module returning `Err`. Callers decide
//! whether an invalid number blocks their request or is merely logged.

use crate::constants::{
    BARE_PHONE_LENGTH, CANONICAL_PHONE_LENGTH, COUNTRY_CODE, INTERNATIONAL_PREFIX, MOBILE_PREFIX,
    NATIONAL_PHONE_LENGTH, TRUNK_PREFIX,
};
use log::warn;
use thiserror::Error;

/// Why a phone number failed validation. Carried inside
/// [`PhoneNormalization`], never propagated as a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    /// No usable characters supplied.
    #[error("phone number is required")]
    Empty,

    /// Input had characters but none of them were digits.
    #[error("no digits found in {raw:?}")]
    NoDigits { raw: String },

    /// Digits present but no supported shape or length matched, or the
    /// candidate failed the mobile-prefix check after an otherwise
    /// plausible branch.
    #[error("unrecognized phone format {raw:?} (normalized {normalized:?})")]
    UnrecognizedFormat { raw: String, normalized: String },
}

/// Outcome of normalizing one raw phone number.
///
/// `normalized` is always composed solely of ASCII digits and is populated
/// best-effort even when invalid, for diagnostic logging. The "error present
/// iff invalid" invariant holds by construction: validity is derived from
/// the absence of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNormalization {
    normalized: String,
    error: Option<PhoneError>,
}

impl PhoneNormalization {
    fn valid(normalized: String) -> Self {
        Self { normalized, error: None }
    }

    fn invalid(normalized: String, error: PhoneError) -> Self {
        Self { normalized, error: Some(error) }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Canonical digit string (country code + subscriber number, no
    /// separators). Best-effort when invalid.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn error(&self) -> Option<&PhoneError> {
        self.error.as_ref()
    }

    /// Consumes the result, returning the canonical string regardless of
    /// validity.
    pub fn into_normalized(self) -> String {
        self.normalized
    }
}

/// Keeps the ASCII digits of `raw` in order, dropping spaces, `+`, `-`,
/// parentheses, letters and anything else.
pub fn extract_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strict entry point: normalize `raw` into canonical international form
/// and validate it against the accepted numbering pattern.
///
/// Rules, in order, on the extracted digit string:
/// 1. strip a leading `00` international dialing prefix;
/// 2. `962`-prefixed and exactly 12 digits → candidate as-is;
/// 3. `07…` and exactly 10 digits → drop the trunk `0`, prepend `962`;
/// 4. `7…` and exactly 9 digits → prepend `962`;
/// 5. anything else → best-effort `962` + digits, flagged invalid.
///
/// Candidates from branches 2–4 must still carry the accepted mobile prefix
/// (`79`) after the country code; right length with the wrong prefix digit
/// is rejected, not silently accepted.
pub fn normalize_phone(raw: Option<&str>) -> PhoneNormalization {
    let raw = match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ => return PhoneNormalization::invalid(String::new(), PhoneError::Empty),
    };

    let digits = extract_digits(raw);
    if digits.is_empty() {
        return PhoneNormalization::invalid(String::new(), PhoneError::NoDigits { raw: raw.to_string() });
    }

    let digits = digits.strip_prefix(INTERNATIONAL_PREFIX).unwrap_or(&digits).to_string();

    let candidate = if digits.starts_with(COUNTRY_CODE) && digits.len() == CANONICAL_PHONE_LENGTH {
        Some(digits.clone())
    } else if national_mobile_shape(&digits) {
        Some(format!("{}{}", COUNTRY_CODE, &digits[1..]))
    } else if bare_mobile_shape(&digits) {
        Some(format!("{}{}", COUNTRY_CODE, digits))
    } else {
        None
    };

    match candidate {
        Some(candidate) if is_canonical(&candidate) => PhoneNormalization::valid(candidate),
        Some(candidate) => {
            PhoneNormalization::invalid(candidate.clone(), PhoneError::UnrecognizedFormat {
                raw: raw.to_string(),
                normalized: candidate,
            })
        }
        None => {
            let best_effort = format!("{}{}", COUNTRY_CODE, digits);
            PhoneNormalization::invalid(best_effort.clone(), PhoneError::UnrecognizedFormat {
                raw: raw.to_string(),
                normalized: best_effort,
            })
        }
    }
}

/// Legacy lenient view over [`normalize_phone`]: returns the best-effort
/// canonical string even when invalid, logging a diagnostic instead of
/// surfacing the failure. Kept for call sites that pre-date validation.
pub fn normalize_phone_compat(raw: Option<&str>) -> String {
    let result = normalize_phone(raw);
    if let Some(err) = result.error() {
        warn!("unusual phone format raw={:?} normalized={:?} reason={}", raw.unwrap_or(""), result.normalized(), err);
    }
    result.into_normalized()
}

/// National mobile format: trunk `0`, mobile digit `7`, 10 digits total.
fn national_mobile_shape(digits: &str) -> bool {
    let mut chars = digits.chars();
    chars.next() == Some(TRUNK_PREFIX) && chars.next() == Some('7') && digits.len() == NATIONAL_PHONE_LENGTH
}

/// Bare mobile format: mobile digit `7` first, 9 digits total.
fn bare_mobile_shape(digits: &str) -> bool {
    digits.starts_with('7') && digits.len() == BARE_PHONE_LENGTH
}

/// The accepted canonical pattern: `962` + `79` + 7 digits, 12 digits total.
fn is_canonical(candidate: &str) -> bool {
    candidate.len() == CANONICAL_PHONE_LENGTH
        && candidate.starts_with(COUNTRY_CODE)
        && candidate[COUNTRY_CODE.len()..].starts_with(MOBILE_PREFIX)
        && candidate.chars().all(|c| c.is_ascii_digit())
}
