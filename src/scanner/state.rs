use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::capability::PermissionState;
use crate::{
    card::{detect_brand, format_grouped, CardBrand},
    error::{ScanError, PERMISSION_MESSAGE, UNAVAILABLE_MESSAGE},
    ocr::ExtractedCardData,
    stabilizer::{CardStabilizer, StabilizeOutcome},
};

const MESSAGE_ALLOW_CAMERA: &str = "Allow camera access to start scanning.";
const MESSAGE_DETECTED: &str = "We locked onto the digits.";
const MESSAGE_GENERIC_ERROR: &str = "Something went wrong while reading the card.";
const MESSAGE_HOLD_STEADY: &str = "Hold steady while we confirm the numbers.";
const MESSAGE_LINE_UP: &str = "Line up the card number in the frame.";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScanStatus {
    Requesting,
    Scanning,
    Detected,
    Error,
}

/// A confirmed number, with whatever expiry was confirmed alongside it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectedCard {
    pub number: String,
    pub expiry: Option<String>,
    pub brand: CardBrand,
    pub detected_at: DateTime<Utc>,
}

impl DetectedCard {
    pub fn formatted_number(&self) -> String {
        format_grouped(&self.number, self.brand)
    }
}

/// Read-only projection for the UI.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanSnapshot {
    pub session_id: String,
    pub status: ScanStatus,
    pub error_message: Option<String>,
    /// `min(hits, threshold) / threshold` of the number buffer.
    pub stability_progress: f64,
    pub detected_number: Option<String>,
    pub detected_expiry: Option<String>,
    pub message: String,
    pub can_rescan: bool,
}

/// Mutable scanner state, owned by the controller and updated by cycles.
#[derive(Debug, Clone)]
pub struct ScanState {
    pub status: ScanStatus,
    pub error_message: Option<String>,
    pub permission: PermissionState,
    pub focused: bool,
    pub recognizer_unavailable: bool,
    /// Bumped on every reset; cycles from older generations are discarded.
    pub generation: u64,
    pub session_id: String,
    pub stabilizer: CardStabilizer,
    pub detected_at: Option<DateTime<Utc>>,
}

impl ScanState {
    pub fn new(threshold: u32, recognizer_available: bool) -> Self {
        let mut state = Self {
            status: ScanStatus::Requesting,
            error_message: None,
            permission: PermissionState::Undetermined,
            focused: true,
            recognizer_unavailable: !recognizer_available,
            generation: 0,
            session_id: Uuid::new_v4().to_string(),
            stabilizer: CardStabilizer::new(threshold),
            detected_at: None,
        };
        state.settle_status();
        state
    }

    /// True when the sampling loop should be running.
    pub fn should_scan(&self) -> bool {
        self.permission.is_granted()
            && self.focused
            && !self.recognizer_unavailable
            && !self.stabilizer.number().is_confirmed()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Derives the resting status from permission and recognizer availability.
    pub fn settle_status(&mut self) {
        if self.recognizer_unavailable {
            self.status = ScanStatus::Error;
            self.error_message = Some(UNAVAILABLE_MESSAGE.to_string());
            return;
        }

        match self.permission {
            PermissionState::Granted if self.stabilizer.number().is_confirmed() => {
                self.status = ScanStatus::Detected;
                self.error_message = None;
            }
            PermissionState::Granted => {
                self.status = ScanStatus::Scanning;
                self.error_message = None;
            }
            PermissionState::Undetermined => {
                self.status = ScanStatus::Requesting;
                self.error_message = None;
            }
            PermissionState::Denied => {
                self.status = ScanStatus::Error;
                self.error_message = Some(PERMISSION_MESSAGE.to_string());
            }
        }
    }

    /// Records a permission change. Losing a grant discards the session.
    ///
    /// Returns false if nothing changed.
    pub fn set_permission(&mut self, permission: PermissionState) -> bool {
        if self.permission == permission {
            return false;
        }

        let lost_grant = self.permission.is_granted();
        self.permission = permission;
        if lost_grant {
            self.reset_detection();
        } else {
            self.settle_status();
        }
        true
    }

    /// Clears both buffers and starts a new generation.
    pub fn reset_detection(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.session_id = Uuid::new_v4().to_string();
        self.stabilizer.reset();
        self.detected_at = None;
        self.settle_status();
    }

    pub fn begin_cycle(&mut self) {
        self.status = ScanStatus::Scanning;
        self.error_message = None;
    }

    pub fn apply(&mut self, extracted: &ExtractedCardData) -> StabilizeOutcome {
        let outcome = self.stabilizer.observe(extracted);
        if outcome.number_confirmed {
            self.status = ScanStatus::Detected;
            self.error_message = None;
            self.detected_at = Some(Utc::now());
        }
        outcome
    }

    pub fn record_failure(&mut self, err: &ScanError) {
        match err {
            ScanError::DependencyUnavailable => self.mark_unavailable(),
            ScanError::PermissionDenied => {
                self.set_permission(PermissionState::Denied);
            }
            ScanError::CaptureFailure(_) | ScanError::NoDetection => {
                self.status = ScanStatus::Error;
                self.error_message = Some(err.user_message().to_string());
            }
        }
    }

    pub fn mark_unavailable(&mut self) {
        self.recognizer_unavailable = true;
        self.settle_status();
    }

    pub fn detection(&self) -> Option<DetectedCard> {
        let number = self.stabilizer.confirmed_number()?;
        Some(DetectedCard {
            number: number.to_string(),
            expiry: self.stabilizer.confirmed_expiry().map(str::to_string),
            brand: detect_brand(number),
            detected_at: self.detected_at.unwrap_or_else(Utc::now),
        })
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        ScanSnapshot {
            session_id: self.session_id.clone(),
            status: self.status,
            error_message: self.error_message.clone(),
            stability_progress: self.stabilizer.number_progress(),
            detected_number: self.stabilizer.confirmed_number().map(str::to_string),
            detected_expiry: self.stabilizer.confirmed_expiry().map(str::to_string),
            message: status_message(self).to_string(),
            can_rescan: !self.recognizer_unavailable
                && self.permission != PermissionState::Denied,
        }
    }
}

/// Status line copy for the scan screen.
pub fn status_message(state: &ScanState) -> &str {
    if state.recognizer_unavailable {
        return UNAVAILABLE_MESSAGE;
    }
    if !state.permission.is_granted() {
        return MESSAGE_ALLOW_CAMERA;
    }
    match state.status {
        ScanStatus::Detected => MESSAGE_DETECTED,
        ScanStatus::Error => state
            .error_message
            .as_deref()
            .unwrap_or(MESSAGE_GENERIC_ERROR),
        _ if state.stabilizer.number_progress() > 0.0 => MESSAGE_HOLD_STEADY,
        _ => MESSAGE_LINE_UP,
    }
}
