// Data models for timed counting sessions

use crate::models::capture::CaptureError;
use crate::models::pose::PoseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Session Phase
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "seconds")]
pub enum SessionPhase {
    #[default]
    Idle,
    Countdown(u32),
    Running,
    Finished,
}

impl SessionPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionPhase::Countdown(_) | SessionPhase::Running)
    }
}

/// Counter status for UI polling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterStatus {
    pub phase: SessionPhase,
    pub repetitions: u32,
    pub armed: bool,
    pub remaining_seconds: Option<u64>,
}

// ==============================================================================
// Session Summary
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Completed,
    Cancelled,
}

/// Result of one finished session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub repetitions: u32,
    pub iterations: u64,
    pub skipped_iterations: u64,
    pub elapsed_ms: u64,
    pub outcome: SessionOutcome,
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session already running")]
    AlreadyRunning,

    #[error("Previous session must be reset before starting again")]
    NotReset,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Pose(#[from] PoseError),
}

pub type SessionResult<T> = Result<T, SessionError>;
