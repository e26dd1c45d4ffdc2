// Data structures for camera frame capture

/// A captured camera frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub timestamp: i64, // Milliseconds since the Unix epoch
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Frame {
    /// Black frame of the given size
    pub fn blank(width: u32, height: u32, timestamp: i64) -> Self {
        Self {
            timestamp,
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            format: PixelFormat::RGBA8,
        }
    }
}

/// Pixel format of captured frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    RGBA8,
}

/// Error types for frame capture operations
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No camera found")]
    DeviceUnavailable,

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Frame capture timed out")]
    Timeout,

    #[error("Not currently capturing")]
    NotCapturing,
}

pub type CaptureResult<T> = Result<T, CaptureError>;
