use std::sync::Arc;

use anyhow::Context;
use tokio::{
    sync::Mutex,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use super::{
    capability::{CameraCapture, TextRecognizer},
    flight::InFlight,
    state::ScanState,
};
use crate::{
    error::ScanError,
    ocr::{extract_card_data, ExtractedCardData},
    settings::ScannerSettings,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Everything a scan loop and its cycles share with the controller.
pub(crate) struct ScanContext {
    pub(crate) state: Mutex<ScanState>,
    pub(crate) in_flight: InFlight,
    pub(crate) camera: Arc<dyn CameraCapture>,
    pub(crate) recognizer: Option<Arc<dyn TextRecognizer>>,
    pub(crate) settings: ScannerSettings,
}

/// Ticks on the configured interval and spawns one cycle per tick.
///
/// The first tick fires immediately. Ticks that land while a cycle is still
/// running are dropped. Cancelling the token only stops the ticker; a cycle
/// already in flight runs to completion.
pub(crate) async fn scan_loop(
    ctx: Arc<ScanContext>,
    generation: u64,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(ctx.settings.scan_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log_info!(
        "scan loop started (generation {generation}, every {}ms)",
        ctx.settings.scan_interval().as_millis()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                {
                    let state = ctx.state.lock().await;
                    if !state.is_current(generation) || !state.should_scan() {
                        log_info!("scan loop no longer needed (generation {generation})");
                        break;
                    }
                }

                match ctx.in_flight.try_acquire() {
                    Some(guard) => {
                        let ctx = Arc::clone(&ctx);
                        let token = cancel_token.clone();
                        tokio::spawn(async move {
                            let _guard = guard;
                            run_cycle(&ctx, generation, &token).await;
                        });
                    }
                    None => log_debug!("previous scan cycle still in flight, skipping tick"),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("scan loop shutting down (generation {generation})");
                break;
            }
        }
    }
}

/// One capture → recognize → extract → stabilize pass.
///
/// The result is applied only if the session generation is unchanged.
pub(crate) async fn run_cycle(ctx: &ScanContext, generation: u64, cancel_token: &CancellationToken) {
    let session_id = {
        let mut state = ctx.state.lock().await;
        if !state.is_current(generation) || !state.should_scan() {
            return;
        }
        state.begin_cycle();
        state.session_id.clone()
    };

    let result = capture_and_extract(ctx.camera.as_ref(), ctx.recognizer.as_deref()).await;

    let mut state = ctx.state.lock().await;
    if !state.is_current(generation) {
        log_info!(
            "discarding result from generation {generation} (current {})",
            state.generation
        );
        return;
    }

    match result {
        Ok(extracted) => {
            let outcome = state.apply(&extracted);
            if outcome.expiry_confirmed {
                log_info!("expiry confirmed for session {session_id}");
            }
            if outcome.number_confirmed {
                log_info!(
                    "card number confirmed for session {session_id} after {} matching reads",
                    state.stabilizer.number().hits()
                );
                cancel_token.cancel();
            }
        }
        Err(err) if err.is_transient() => {
            log_warn!("card scan failed for session {session_id}: {err}");
            state.record_failure(&err);
        }
        Err(err) => {
            log_error!("stopping scan session {session_id}: {err}");
            state.record_failure(&err);
            cancel_token.cancel();
        }
    }
}

async fn capture_and_extract(
    camera: &dyn CameraCapture,
    recognizer: Option<&dyn TextRecognizer>,
) -> Result<ExtractedCardData, ScanError> {
    let recognizer = recognizer.ok_or(ScanError::DependencyUnavailable)?;

    let capture_start = Instant::now();
    let frame = camera.capture().await.context("camera capture failed")?;
    if frame.uri.is_empty() {
        return Err(ScanError::CaptureFailure("missing capture uri".into()));
    }
    let capture_ms = capture_start.elapsed().as_millis();

    let ocr_start = Instant::now();
    let recognized = recognizer
        .recognize(&frame)
        .await
        .with_context(|| format!("text recognition failed for {}", frame.uri))?;
    let ocr_ms = ocr_start.elapsed().as_millis();

    let extracted = extract_card_data(Some(&recognized));
    log_debug!(
        "scan cycle: number={} expiry={} (capture: {}ms, ocr: {}ms)",
        extracted.number.is_some(),
        extracted.expiry.is_some(),
        capture_ms,
        ocr_ms
    );

    Ok(extracted)
}
