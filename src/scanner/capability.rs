//! Seams to the platform camera and text recognizer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ocr::RecognizedText;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PermissionState {
    Undetermined,
    Granted,
    Denied,
}

impl Default for PermissionState {
    fn default() -> Self {
        PermissionState::Undetermined
    }
}

impl PermissionState {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

/// A still taken by the camera, addressed by uri so the recognizer can load it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapturedFrame {
    pub uri: String,
    pub captured_at: DateTime<Utc>,
}

impl CapturedFrame {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            captured_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait CameraCapture: Send + Sync {
    /// Asks the platform for camera access.
    async fn request_permission(&self) -> Result<PermissionState>;

    /// Takes one still. May suspend for as long as the platform needs.
    async fn capture(&self) -> Result<CapturedFrame>;
}

#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, frame: &CapturedFrame) -> Result<RecognizedText>;
}
