// Repetition counter - countdown plus a fixed-length polling loop over frames and poses

use crate::core::config::Config;
use crate::core::geometry::{self, Thresholds};
use crate::core::repetition_gate::{self, GateState};
use crate::core::session_clock::SessionClock;
use crate::models::capture::CaptureError;
use crate::models::pose::{Pose, PoseError};
use crate::models::session::{
    CounterStatus, SessionError, SessionOutcome, SessionPhase, SessionResult, SessionSummary,
};
use crate::platform::capture::FrameSource;
use crate::platform::display::DisplaySink;
use crate::platform::pose::PoseOracle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

pub const NO_CAMERA_NOTICE: &str =
    "No camera found. Please use a device with a camera.";

// ==============================================================================
// Display Text
// ==============================================================================

pub fn countdown_text(seconds: u32) -> String {
    format!("Starting in {}...", seconds)
}

pub fn remaining_text(seconds: u64) -> String {
    format!("{} seconds remaining", seconds)
}

pub fn count_text(label: &str, repetitions: u32) -> String {
    format!("{} {}(s) counted", repetitions, label)
}

pub fn finished_text(label: &str, repetitions: u32) -> String {
    format!("{}, click to restart", count_text(label, repetitions))
}

// ==============================================================================
// Repetition Counter
// ==============================================================================

/// Published view of the running session, readable from other tasks
#[derive(Debug, Default)]
struct Progress {
    phase: SessionPhase,
    gate: GateState,
    clock: Option<SessionClock>,
}

impl Progress {
    fn finish(&mut self) {
        self.phase = SessionPhase::Finished;
        self.clock = None;
    }
}

/// Finishes a session whose future was dropped before it returned
///
/// The phase moves to `Finished` right away so the counter can be reset. The
/// frame source is released on a spawned task unless a newer session owns it
/// by then.
struct SessionGuard {
    progress: Arc<RwLock<Progress>>,
    frame_source: Arc<Mutex<Box<dyn FrameSource>>>,
    done: bool,
}

impl SessionGuard {
    fn done(mut self) {
        self.done = true;
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        warn!("Counting session dropped before it finished");

        let marked = match self.progress.try_write() {
            Ok(mut progress) => {
                progress.finish();
                true
            }
            Err(_) => false,
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let progress = self.progress.clone();
        let frame_source = self.frame_source.clone();
        runtime.spawn(async move {
            if !marked {
                progress.write().await.finish();
            }
            let mut source = frame_source.lock().await;
            if progress.read().await.phase.is_active() {
                return;
            }
            if let Err(e) = source.stop().await {
                warn!(error = %e, "Failed to release capture device");
            }
        });
    }
}

pub struct RepCounter {
    config: Config,
    frame_source: Arc<Mutex<Box<dyn FrameSource>>>,
    oracle: Mutex<Box<dyn PoseOracle>>,
    display: Mutex<Box<dyn DisplaySink>>,
    progress: Arc<RwLock<Progress>>,
    cancel_requested: AtomicBool,
    notice_shown: AtomicBool,
}

impl RepCounter {
    /// Create a counter and acquire the capture device
    ///
    /// A missing device is reported once on the display and returned as
    /// `CaptureError::DeviceUnavailable`.
    pub async fn new(
        config: Config,
        mut frame_source: Box<dyn FrameSource>,
        oracle: Box<dyn PoseOracle>,
        mut display: Box<dyn DisplaySink>,
    ) -> SessionResult<Self> {
        config
            .validate()
            .map_err(|e| SessionError::InvalidConfig(e.to_string()))?;

        if let Err(e) = frame_source.open().await {
            warn!(error = %e, "Capture device unavailable");
            display.show_notice(NO_CAMERA_NOTICE);
            return Err(e.into());
        }

        info!(oracle = %oracle.model_info(), "Repetition counter ready");

        Ok(Self {
            config,
            frame_source: Arc::new(Mutex::new(frame_source)),
            oracle: Mutex::new(oracle),
            display: Mutex::new(display),
            progress: Arc::new(RwLock::new(Progress::default())),
            cancel_requested: AtomicBool::new(false),
            notice_shown: AtomicBool::new(false),
        })
    }

    /// Run one session: countdown, then count until the window closes
    pub async fn run_session(&self) -> SessionResult<SessionSummary> {
        {
            let mut progress = self.progress.write().await;
            match progress.phase {
                phase if phase.is_active() => return Err(SessionError::AlreadyRunning),
                SessionPhase::Finished => return Err(SessionError::NotReset),
                _ => {}
            }
            progress.phase = SessionPhase::Countdown(self.config.countdown_seconds);
            progress.gate.reset();
            progress.clock = None;
        }
        let guard = SessionGuard {
            progress: self.progress.clone(),
            frame_source: self.frame_source.clone(),
            done: false,
        };

        let mut source = self.frame_source.lock().await;
        let mut oracle = self.oracle.lock().await;
        let mut display = self.display.lock().await;

        if !source.is_capturing() {
            if let Err(e) = source.open().await {
                self.report_missing_device(&mut **display, &e);
                self.progress.write().await.phase = SessionPhase::Idle;
                self.cancel_requested.store(false, Ordering::SeqCst);
                guard.done();
                return Err(e.into());
            }
        }

        let session_id = Uuid::new_v4().to_string();
        let started_at = chrono::Utc::now();
        info!(%session_id, duration_ms = self.config.session_duration_ms, "Starting counting session");

        if self.config.warm_up {
            // First inference is slow; get it out of the way before the countdown
            if let Err(e) = self.observe(&mut **source, &mut **oracle).await {
                debug!(error = %e, "Warm-up observation failed");
            }
        }

        let mut outcome = self.run_countdown(&mut **display).await;

        let mut gate = GateState::new();
        let mut iterations: u64 = 0;
        let mut skipped_iterations: u64 = 0;
        let clock = SessionClock::start(self.config.session_duration());

        if outcome.is_none() {
            {
                let mut progress = self.progress.write().await;
                progress.phase = SessionPhase::Running;
                progress.clock = Some(clock);
            }

            let thresholds = self.config.thresholds();

            outcome = loop {
                if clock.is_expired() {
                    break Some(SessionOutcome::Completed);
                }
                if self.is_cancelled() {
                    break Some(SessionOutcome::Cancelled);
                }

                iterations += 1;

                match self.observe(&mut **source, &mut **oracle).await {
                    Ok(pose) => {
                        let counted = self.feed_gate(&mut gate, &pose, &thresholds);
                        if counted > 0 {
                            debug!(repetitions = gate.repetition_count(), "Repetition counted");
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "Skipping iteration");
                        skipped_iterations += 1;
                    }
                }

                display.set_remaining_text(&remaining_text(clock.remaining_seconds()));
                display.set_count_text(&count_text(&self.config.exercise_label, gate.repetition_count()));
                display.set_straighten_visible(!gate.armed());

                self.progress.write().await.gate = gate;
            };
        }

        let outcome = outcome.unwrap_or(SessionOutcome::Cancelled);
        // A session cancelled during the countdown never started its clock
        let elapsed_ms = if outcome == SessionOutcome::Cancelled && iterations == 0 {
            0
        } else {
            clock.elapsed().as_millis() as u64
        };

        if let Err(e) = source.stop().await {
            warn!(error = %e, "Failed to release capture device");
        }

        display.set_count_text(&finished_text(&self.config.exercise_label, gate.repetition_count()));

        {
            let mut progress = self.progress.write().await;
            progress.finish();
            progress.gate = gate;
        }
        // A request that arrived before the first boundary check belongs to this session
        self.cancel_requested.store(false, Ordering::SeqCst);
        guard.done();

        info!(
            %session_id,
            repetitions = gate.repetition_count(),
            iterations,
            skipped_iterations,
            ?outcome,
            "Counting session finished"
        );

        Ok(SessionSummary {
            id: session_id,
            started_at,
            repetitions: gate.repetition_count(),
            iterations,
            skipped_iterations,
            elapsed_ms,
            outcome,
        })
    }

    /// Clear the finished session so a new one can start
    pub async fn reset(&self) -> SessionResult<()> {
        let mut progress = self.progress.write().await;
        if progress.phase.is_active() {
            return Err(SessionError::AlreadyRunning);
        }
        *progress = Progress::default();
        self.cancel_requested.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Reset and immediately run a new session
    pub async fn restart(&self) -> SessionResult<SessionSummary> {
        self.reset().await?;
        self.run_session().await
    }

    /// Ask the running session to stop at the next iteration boundary
    ///
    /// A request made before a spawned session reaches its first check still
    /// applies to that session.
    pub fn cancel(&self) {
        self.cancel_requested.store(true, Ordering::SeqCst);
    }

    /// Get current counter status
    pub async fn status(&self) -> CounterStatus {
        let progress = self.progress.read().await;
        CounterStatus {
            phase: progress.phase,
            repetitions: progress.gate.repetition_count(),
            armed: progress.gate.armed(),
            remaining_seconds: progress.clock.map(|clock| clock.remaining_seconds()),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_requested.load(Ordering::SeqCst)
    }

    /// Countdown before counting; `Some(Cancelled)` if cancelled part way
    async fn run_countdown(&self, display: &mut dyn DisplaySink) -> Option<SessionOutcome> {
        for seconds in (1..=self.config.countdown_seconds).rev() {
            if self.is_cancelled() {
                return Some(SessionOutcome::Cancelled);
            }
            self.progress.write().await.phase = SessionPhase::Countdown(seconds);
            display.set_countdown_text(&countdown_text(seconds));
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        if self.is_cancelled() {
            return Some(SessionOutcome::Cancelled);
        }
        None
    }

    /// One capture followed by one estimate, each bounded by its timeout
    async fn observe(
        &self,
        source: &mut dyn FrameSource,
        oracle: &mut dyn PoseOracle,
    ) -> SessionResult<Pose> {
        let frame = timeout(self.config.capture_timeout(), source.capture())
            .await
            .map_err(|_| CaptureError::Timeout)??;

        let estimate = oracle.estimate(&frame, self.config.estimate_confidence_hint);
        let pose = timeout(self.config.oracle_timeout(), estimate)
            .await
            .map_err(|_| PoseError::Timeout)??;
        Ok(pose)
    }

    /// Evaluate every configured limb and run it through the shared gate
    fn feed_gate(&self, gate: &mut GateState, pose: &Pose, thresholds: &Thresholds) -> u32 {
        let evaluations = self.config.limbs.iter().map(|limb| {
            let evaluation = geometry::evaluate(pose, limb, thresholds);
            trace!(?limb, ?evaluation, "Limb evaluated");
            evaluation
        });
        repetition_gate::on_frame_limbs(gate, evaluations)
    }

    fn report_missing_device(&self, display: &mut dyn DisplaySink, error: &CaptureError) {
        warn!(error = %error, "Capture device unavailable");
        if !self.notice_shown.swap(true, Ordering::SeqCst) {
            display.show_notice(NO_CAMERA_NOTICE);
        }
    }
}
