//! Card number and expiry helpers.
//!
//! Everything in here is permissive: input comes from noisy OCR text or
//! keyboard entry, so malformed values degrade to an empty string,
//! `CardBrand::Other` or `false` instead of failing.

pub mod brand;
pub mod expiry;
pub mod number;

pub use brand::{detect_brand, limit_for_brand, CardBrand};
pub use expiry::{format_expiry_input, normalize_expiry};
pub use number::{format_detected, format_grouped, looks_like_card_number, passes_luhn, sanitize};
