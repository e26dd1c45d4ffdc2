// Replay oracle - serves poses from a recorded stream instead of running a model

use super::PoseOracle;
use crate::models::capture::Frame;
use crate::models::pose::{Pose, PoseError, PoseResult};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// What to do once every recorded pose has been served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayMode {
    /// Start again from the first pose
    Loop,
    /// Keep returning the last pose
    HoldLast,
}

pub struct ReplayOracle {
    poses: Vec<Pose>,
    next: usize,
    mode: ReplayMode,
    latency: Duration,
}

impl ReplayOracle {
    pub fn from_poses(poses: Vec<Pose>, mode: ReplayMode) -> PoseResult<Self> {
        if poses.is_empty() {
            return Err(PoseError::ReplayLoadFailed("recording contains no poses".to_string()));
        }

        Ok(Self {
            poses,
            next: 0,
            mode,
            latency: Duration::ZERO,
        })
    }

    /// Parse a JSON array of poses
    pub fn from_json(json: &str, mode: ReplayMode) -> PoseResult<Self> {
        let poses: Vec<Pose> = serde_json::from_str(json)
            .map_err(|e| PoseError::ReplayLoadFailed(format!("invalid pose JSON: {}", e)))?;
        Self::from_poses(poses, mode)
    }

    pub fn from_file(path: &Path, mode: ReplayMode) -> PoseResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PoseError::ReplayLoadFailed(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents, mode)
    }

    /// Simulated inference time added to every estimate
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    fn next_pose(&mut self) -> Pose {
        let pose = self.poses[self.next].clone();

        self.next = match self.mode {
            ReplayMode::Loop => (self.next + 1) % self.poses.len(),
            ReplayMode::HoldLast => (self.next + 1).min(self.poses.len() - 1),
        };

        pose
    }
}

#[async_trait]
impl PoseOracle for ReplayOracle {
    async fn estimate(&mut self, _frame: &Frame, _confidence_hint: f32) -> PoseResult<Pose> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.next_pose())
    }

    fn model_info(&self) -> String {
        format!("Replay oracle ({} recorded poses, {:?})", self.poses.len(), self.mode)
    }
}
