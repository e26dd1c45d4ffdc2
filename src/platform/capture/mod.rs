// Camera frame sources
// The counter only needs `open`, `capture`, and `stop`; real camera backends implement the same trait

use crate::models::capture::{CaptureError, CaptureResult, Frame};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Source of camera frames
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Acquire the capture device. Fails with `DeviceUnavailable` when there is none.
    async fn open(&mut self) -> CaptureResult<()>;

    /// Capture the next frame
    async fn capture(&mut self) -> CaptureResult<Frame>;

    /// Release the capture device
    async fn stop(&mut self) -> CaptureResult<()>;

    /// Check if the device is currently held
    fn is_capturing(&self) -> bool;
}

/// Frame source producing blank frames of a fixed size
///
/// Used when poses come from a recording rather than a live camera.
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    device_present: bool,
    is_capturing: Arc<AtomicBool>,
    frames_captured: Arc<AtomicU64>,
}

impl SyntheticFrameSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            device_present: true,
            is_capturing: Arc::new(AtomicBool::new(false)),
            frames_captured: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A source whose device is missing; `open` always fails
    pub fn unavailable() -> Self {
        Self {
            device_present: false,
            ..Self::new(0, 0)
        }
    }

    /// Shared flag that stays readable after the source is moved into a counter
    pub fn capturing_flag(&self) -> Arc<AtomicBool> {
        self.is_capturing.clone()
    }

    pub fn frames_captured(&self) -> u64 {
        self.frames_captured.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameSource for SyntheticFrameSource {
    async fn open(&mut self) -> CaptureResult<()> {
        if !self.device_present {
            return Err(CaptureError::DeviceUnavailable);
        }
        self.is_capturing.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn capture(&mut self) -> CaptureResult<Frame> {
        if !self.is_capturing.load(Ordering::SeqCst) {
            return Err(CaptureError::NotCapturing);
        }

        self.frames_captured.fetch_add(1, Ordering::SeqCst);
        Ok(Frame::blank(
            self.width,
            self.height,
            chrono::Utc::now().timestamp_millis(),
        ))
    }

    async fn stop(&mut self) -> CaptureResult<()> {
        self.is_capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.is_capturing.load(Ordering::SeqCst)
    }
}
