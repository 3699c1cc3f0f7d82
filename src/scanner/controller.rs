use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use super::{
    capability::{CameraCapture, PermissionState, TextRecognizer},
    flight::InFlight,
    loop_worker::{scan_loop, ScanContext},
    state::{DetectedCard, ScanSnapshot, ScanState},
};
use crate::{
    error::ScanError,
    prefill::{CardPrefill, VariantPicker},
    settings::ScannerSettings,
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Owns the scan loop for one camera screen.
///
/// The loop runs only while permission is granted, the screen is focused,
/// no number is confirmed and a recognizer is available. Every action below
/// re-evaluates that condition and starts or cancels the loop to match.
pub struct ScanController {
    ctx: Arc<ScanContext>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    loop_generation: Option<u64>,
}

impl ScanController {
    /// Creates an idle controller. The screen is assumed focused.
    ///
    /// Passing no recognizer puts the session in the fatal unavailable state.
    pub fn new(
        camera: Arc<dyn CameraCapture>,
        recognizer: Option<Arc<dyn TextRecognizer>>,
        settings: ScannerSettings,
    ) -> Self {
        let state = ScanState::new(settings.min_stable_matches(), recognizer.is_some());
        if recognizer.is_none() {
            log_error!("no text recognizer available, card scanning disabled");
        }

        Self {
            ctx: Arc::new(ScanContext {
                state: Mutex::new(state),
                in_flight: InFlight::new(),
                camera,
                recognizer,
                settings,
            }),
            handle: None,
            cancel_token: None,
            loop_generation: None,
        }
    }

    pub async fn snapshot(&self) -> ScanSnapshot {
        self.ctx.state.lock().await.snapshot()
    }

    pub async fn detection(&self) -> Option<DetectedCard> {
        self.ctx.state.lock().await.detection()
    }

    /// Whether the interval loop is currently scheduling cycles.
    pub fn is_scanning(&self) -> bool {
        match (&self.handle, &self.cancel_token) {
            (Some(handle), Some(token)) => !handle.is_finished() && !token.is_cancelled(),
            _ => false,
        }
    }

    /// Whether a capture cycle is running right now.
    pub fn is_cycle_in_flight(&self) -> bool {
        self.ctx.in_flight.is_busy()
    }

    /// Asks the camera for access and applies the answer.
    pub async fn request_permission(&mut self) -> Result<PermissionState> {
        let permission = match self.ctx.camera.request_permission().await {
            Ok(permission) => permission,
            Err(err) => {
                log_warn!("camera permission request failed: {err:#}");
                self.apply_permission(PermissionState::Denied).await?;
                return Err(err.context(ScanError::PermissionDenied));
            }
        };

        self.apply_permission(permission).await?;
        Ok(permission)
    }

    /// Applies a permission change reported by the platform.
    pub async fn set_permission(&mut self, permission: PermissionState) -> Result<()> {
        self.apply_permission(permission).await
    }

    /// Screen came to the foreground.
    pub async fn focus(&mut self) -> Result<()> {
        self.ctx.state.lock().await.focused = true;
        self.sync_loop().await
    }

    /// Screen left the foreground: stop ticking and drop the session.
    ///
    /// A cycle already in flight finishes, but its result belongs to the
    /// old generation and is discarded.
    pub async fn blur(&mut self) -> Result<()> {
        self.stop_loop().await?;
        {
            let mut state = self.ctx.state.lock().await;
            state.focused = false;
            state.reset_detection();
        }
        log_info!("scan screen blurred, detection state cleared");
        Ok(())
    }

    /// Clears both buffers and starts over from the first cycle.
    pub async fn rescan(&mut self) -> Result<()> {
        if self.ctx.state.lock().await.recognizer_unavailable {
            return Err(ScanError::DependencyUnavailable.into());
        }

        self.stop_loop().await?;
        self.ctx.state.lock().await.reset_detection();
        log_info!("rescan requested");
        self.sync_loop().await
    }

    /// Hands the confirmed card to the entry form and resets the screen.
    pub async fn take_prefill(&mut self, picker: &mut VariantPicker) -> Result<CardPrefill> {
        let detection = self
            .ctx
            .state
            .lock()
            .await
            .detection()
            .ok_or(ScanError::NoDetection)?;

        self.stop_loop().await?;
        self.ctx.state.lock().await.reset_detection();

        let prefill = CardPrefill::from_detection(&detection, picker);
        log_info!(
            "prefill ready for {} card (expiry {})",
            prefill.brand.as_str(),
            if prefill.expiry.is_some() { "present" } else { "missing" }
        );

        self.sync_loop().await?;
        Ok(prefill)
    }

    /// Stops the loop for good. In-flight cycles are left to finish.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.stop_loop().await
    }

    async fn apply_permission(&mut self, permission: PermissionState) -> Result<()> {
        let changed = self.ctx.state.lock().await.set_permission(permission);
        if changed {
            log_info!("camera permission is now {permission:?}");
        }
        self.sync_loop().await
    }

    async fn sync_loop(&mut self) -> Result<()> {
        let (should_scan, generation) = {
            let state = self.ctx.state.lock().await;
            (state.should_scan(), state.generation)
        };

        if !should_scan {
            return self.stop_loop().await;
        }

        if self.is_scanning() && self.loop_generation == Some(generation) {
            return Ok(());
        }

        self.stop_loop().await?;
        self.start_loop(generation);
        Ok(())
    }

    fn start_loop(&mut self, generation: u64) {
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(scan_loop(
            Arc::clone(&self.ctx),
            generation,
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.loop_generation = Some(generation);
    }

    async fn stop_loop(&mut self) -> Result<()> {
        self.loop_generation = None;
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle.await.context("scan loop task failed to join")
        } else {
            Ok(())
        }
    }
}

impl Drop for ScanController {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}
