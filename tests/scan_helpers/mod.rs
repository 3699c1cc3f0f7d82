//! Fake camera and recognizer for driving the scan loop under a paused clock.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use cardscan_lib::{
    CameraCapture, CapturedFrame, PermissionState, RecognizedText, ScanError, TextRecognizer,
};
use tokio::sync::Semaphore;

pub struct FakeCamera {
    permission: PermissionState,
    permission_fails: bool,
    gate: Option<Semaphore>,
    failures_left: AtomicUsize,
    captures: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl FakeCamera {
    pub fn new() -> Self {
        Self {
            permission: PermissionState::Granted,
            permission_fails: false,
            gate: None,
            failures_left: AtomicUsize::new(0),
            captures: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    /// Every capture blocks until [`FakeCamera::release`] hands out a permit.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub fn failing_first(failures: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(failures),
            ..Self::new()
        }
    }

    pub fn with_permission(permission: PermissionState) -> Self {
        Self {
            permission,
            ..Self::new()
        }
    }

    pub fn with_broken_permission_prompt() -> Self {
        Self {
            permission_fails: true,
            ..Self::new()
        }
    }

    pub fn release(&self, captures: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(captures);
        }
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    async fn take_frame(&self, index: usize) -> Result<CapturedFrame> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.context("camera gate closed")?.forget();
        }

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if should_fail {
            bail!("shutter did not fire");
        }

        Ok(CapturedFrame::new(format!("file:///tmp/frame-{index}.jpg")))
    }
}

#[async_trait]
impl CameraCapture for FakeCamera {
    async fn request_permission(&self) -> Result<PermissionState> {
        if self.permission_fails {
            bail!("permission prompt crashed");
        }
        Ok(self.permission)
    }

    async fn capture(&self) -> Result<CapturedFrame> {
        let index = self.captures.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        let result = self.take_frame(index).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Replays a fixed list of OCR results, repeating the last one forever.
pub struct ScriptedRecognizer {
    frames: Vec<RecognizedText>,
    calls: AtomicUsize,
}

impl ScriptedRecognizer {
    pub fn script(frames: Vec<RecognizedText>) -> Self {
        Self {
            frames,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every frame yields the same segments.
    pub fn repeating(segments: &[&str]) -> Self {
        Self::script(vec![RecognizedText::from_segments(segments.iter().copied())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for ScriptedRecognizer {
    async fn recognize(&self, _frame: &CapturedFrame) -> Result<RecognizedText> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let frame = self
            .frames
            .get(index)
            .or_else(|| self.frames.last())
            .cloned()
            .unwrap_or_default();
        Ok(frame)
    }
}

/// Loads fine at startup but reports the recognition module missing on every call.
pub struct UnlinkedRecognizer {
    calls: AtomicUsize,
}

impl UnlinkedRecognizer {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for UnlinkedRecognizer {
    async fn recognize(&self, _frame: &CapturedFrame) -> Result<RecognizedText> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ScanError::DependencyUnavailable.into())
    }
}

/// Lets the paused clock run forward, driving any due ticks and cycles.
pub async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
