//! System-wide constants for the commerce relay.

/// Country calling code for Jordan. The only country the relay serves;
/// every canonical phone number starts with this.
pub const COUNTRY_CODE: &str = "962";

/// International dialing prefix stripped before normalization (`00962…`).
pub const INTERNATIONAL_PREFIX: &str = "00";

/// National trunk prefix dropped when converting `07…` to international form.
pub const TRUNK_PREFIX: char = '0';

/// Accepted mobile prefix directly after the country code.
///
/// The relay accepts `962` + `79` + 7 subscriber digits. Widening to the
/// full Jordanian operator set (`77`, `78`) is a one-constant change.
pub const MOBILE_PREFIX: &str = "79";

/// Total digits in a canonical number: `962` + 9-digit subscriber number.
pub const CANONICAL_PHONE_LENGTH: usize = 12;

/// Digits in the national mobile format (`07` + 8 subscriber digits).
pub const NATIONAL_PHONE_LENGTH: usize = 10;

/// Digits in the bare mobile format (`7` + 8 subscriber digits).
pub const BARE_PHONE_LENGTH: usize = 9;

/// ISO currency code attached to every Conversion API event.
pub const CURRENCY: &str = "JOD";

/// Lowercase two-letter country hashed into Meta user_data.
pub const COUNTRY_ISO: &str = "jo";

/// WhatsApp caps template body parameters at 1024 characters; the products
/// block is truncated below that with room for the ellipsis marker.
pub const MAX_PRODUCTS_TEXT_LENGTH: usize = 900;

/// Rate limit window (seconds).
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// How often stale per-IP rate limit buckets are swept (seconds).
pub const RATE_LIMIT_CLEANUP_INTERVAL_SECS: u64 = 300;

/// Idle TTL after which a per-IP rate limit bucket is dropped (seconds).
pub const RATE_LIMIT_ENTRY_TTL_SECS: u64 = 600;
