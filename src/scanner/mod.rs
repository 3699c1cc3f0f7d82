//! Capture scheduler: drives capture → OCR → extraction → stabilization on
//! a fixed interval, one cycle at a time.

pub mod capability;
pub mod controller;
pub mod flight;
pub(crate) mod loop_worker;
pub mod state;

pub use capability::{CameraCapture, CapturedFrame, PermissionState, TextRecognizer};
pub use controller::ScanController;
pub use flight::{InFlight, InFlightGuard};
pub use state::{status_message, DetectedCard, ScanSnapshot, ScanState, ScanStatus};
