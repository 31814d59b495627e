//! Domain layer: pure relay logic with no I/O.

pub mod conversion;
pub mod hashing;
pub mod ids;
pub mod phone;
pub mod requests;
