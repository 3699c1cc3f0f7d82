//! Card number capture core for the wallet app.
//!
//! Turns per-frame OCR text into a confirmed card number (and, when it
//! shows up often enough, an expiry date):
//!
//! - [`card`]: digit sanitizing, brand detection, grouping, Luhn.
//! - [`ocr`]: recognized text model and candidate extraction.
//! - [`stabilizer`]: multi-frame confirmation of candidates.
//! - [`scanner`]: the interval-driven, single-flight capture loop.
//! - [`prefill`]: handoff of a confirmed card to the entry form.

pub mod card;
pub mod error;
pub mod ocr;
pub mod prefill;
pub mod scanner;
pub mod settings;
pub mod stabilizer;
mod utils;

pub use card::CardBrand;
pub use error::ScanError;
pub use ocr::{extract_card_data, ExtractedCardData, RecognizedText};
pub use prefill::{CardPrefill, CardVariant, VariantPicker};
pub use scanner::{
    CameraCapture, CapturedFrame, DetectedCard, PermissionState, ScanController, ScanSnapshot,
    ScanStatus, TextRecognizer,
};
pub use settings::ScannerSettings;
pub use stabilizer::{CardStabilizer, StabilizationBuffer};
pub use utils::init_logging;
