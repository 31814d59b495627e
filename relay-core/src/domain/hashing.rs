//! SHA-256 hashing of personal data for Meta Conversion API user_data.
//!
//! Meta requires PII fields to be lowercased, trimmed and SHA-256 hashed
//! before transmission. Blank values produce no hash at all so that empty
//! fields can be filtered out of the payload instead of sending the hash
//! of an empty string.

use sha2::{Digest, Sha256};

fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hashes a PII value per Meta's rules, or `None` when it is blank.
pub fn hash_pii(value: &str) -> Option<String> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    Some(sha256_hex(&normalized))
}

/// Hashes unconditionally. Used for fields Meta always expects, such as
/// the normalized phone and the country code.
pub fn hash_pii_required(value: &str) -> String {
    sha256_hex(&value.trim().to_lowercase())
}
