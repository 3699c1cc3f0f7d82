use thiserror::Error;

pub const PERMISSION_MESSAGE: &str = "We need access to the camera to scan cards.";
pub const RETRY_MESSAGE: &str = "Unable to read the digits. Give it another try.";
pub const UNAVAILABLE_MESSAGE: &str =
    "Camera scan requires the text recognition module. Rebuild the app to continue.";

/// Failures surfaced by the scanner.
///
/// None of these escape a scan cycle; they are folded into the status
/// projection. They are returned directly only by controller actions.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Camera access refused. The user can grant it and retry.
    #[error("camera permission denied")]
    PermissionDenied,

    /// No text recognizer is linked into this build. Fatal for the session.
    #[error("text recognition module unavailable")]
    DependencyUnavailable,

    /// A single capture or recognition call failed. Retried on the next tick.
    #[error("capture failed: {0}")]
    CaptureFailure(String),

    /// A prefill was requested before any number was confirmed.
    #[error("no confirmed card number")]
    NoDetection,
}

impl ScanError {
    /// Copy shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            ScanError::PermissionDenied => PERMISSION_MESSAGE,
            ScanError::DependencyUnavailable => UNAVAILABLE_MESSAGE,
            ScanError::CaptureFailure(_) | ScanError::NoDetection => RETRY_MESSAGE,
        }
    }

    /// Whether the scan loop can keep going after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScanError::CaptureFailure(_))
    }
}

/// A `ScanError` anywhere in the chain keeps its kind; anything else is a
/// transient capture failure.
impl From<anyhow::Error> for ScanError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ScanError>() {
            Ok(scan_err) => scan_err,
            Err(err) => ScanError::CaptureFailure(format!("{err:#}")),
        }
    }
}
