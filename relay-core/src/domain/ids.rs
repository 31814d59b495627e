//! Fallback event ID generation.
//!
//! The storefront normally supplies its own event ID so browser pixel and
//! server events deduplicate; this is the server-side fallback when it
//! does not.

use rand::distr::Alphanumeric;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

const RANDOM_SUFFIX_LEN: usize = 9;

/// Returns `<unix-millis>_<9 alphanumeric chars>`, unique enough for event
/// deduplication windows.
pub fn generate_event_id() -> String {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0);
    let suffix: String =
        rand::rng().sample_iter(&Alphanumeric).take(RANDOM_SUFFIX_LEN).map(char::from).collect();
    format!("{}_{}", millis, suffix.to_lowercase())
}
