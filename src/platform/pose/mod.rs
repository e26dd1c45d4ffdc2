// Pose oracle integration
// The estimator itself is opaque; anything that turns a frame into a `Pose` can back the counter

pub mod replay;

pub use replay::{ReplayMode, ReplayOracle};

use crate::models::capture::Frame;
use crate::models::pose::{Pose, PoseResult};
use async_trait::async_trait;

/// Single-person pose estimator
#[async_trait]
pub trait PoseOracle: Send + Sync {
    /// Estimate one pose for a frame
    ///
    /// `confidence_hint` is passed through to the estimator; keypoint scores in
    /// the result are not guaranteed to be meaningful.
    async fn estimate(&mut self, frame: &Frame, confidence_hint: f32) -> PoseResult<Pose>;

    /// Get model info
    fn model_info(&self) -> String;
}
