// Data models for single-person pose observations used by the repetition counter

use serde::{Deserialize, Serialize};

// ==============================================================================
// Pose (one observation instant)
// ==============================================================================

/// One skeleton observation as produced by the pose oracle.
/// Keypoints are ordered by `BodyLandmark` index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
    #[serde(default)]
    pub score: f32, // Overall pose score reported by the oracle, informational only
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self {
            keypoints,
            score: 0.0,
        }
    }

    /// Pose with every landmark at the origin and zero confidence
    pub fn empty() -> Self {
        Self::new(vec![Keypoint::default(); BodyLandmark::COUNT])
    }

    pub fn keypoint(&self, landmark: BodyLandmark) -> Option<&Keypoint> {
        self.keypoints.get(landmark as usize)
    }

    pub fn get(&self, index: usize) -> Option<&Keypoint> {
        self.keypoints.get(index)
    }

    /// Replace one landmark, growing the keypoint list if it is short
    pub fn with_keypoint(mut self, landmark: BodyLandmark, keypoint: Keypoint) -> Self {
        let index = landmark as usize;
        if self.keypoints.len() <= index {
            self.keypoints.resize(index + 1, Keypoint::default());
        }
        self.keypoints[index] = keypoint;
        self
    }
}

// ==============================================================================
// Keypoint
// ==============================================================================

/// A 2D keypoint with confidence score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32, // Pixel space
    pub y: f32, // Pixel space, grows downward
    pub confidence: f32, // Detection confidence [0, 1]
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// Strictly above the threshold; a score equal to it is not trusted
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }

    pub fn distance_to(&self, other: &Keypoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Single-pose landmark indices (17 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl BodyLandmark {
    pub const COUNT: usize = 17;
}

// ==============================================================================
// Limb Triple
// ==============================================================================

/// Shoulder/elbow/wrist keypoint indices identifying one arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimbTriple {
    pub shoulder: usize,
    pub elbow: usize,
    pub wrist: usize,
}

impl LimbTriple {
    pub const LEFT_ARM: LimbTriple = LimbTriple {
        shoulder: BodyLandmark::LeftShoulder as usize,
        elbow: BodyLandmark::LeftElbow as usize,
        wrist: BodyLandmark::LeftWrist as usize,
    };

    pub const RIGHT_ARM: LimbTriple = LimbTriple {
        shoulder: BodyLandmark::RightShoulder as usize,
        elbow: BodyLandmark::RightElbow as usize,
        wrist: BodyLandmark::RightWrist as usize,
    };

    pub fn new(shoulder: usize, elbow: usize, wrist: usize) -> Self {
        Self {
            shoulder,
            elbow,
            wrist,
        }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.shoulder, self.elbow, self.wrist]
    }

    /// Resolve the three keypoints, or `None` if the pose is too short
    pub fn resolve<'a>(&self, pose: &'a Pose) -> Option<(&'a Keypoint, &'a Keypoint, &'a Keypoint)> {
        Some((pose.get(self.shoulder)?, pose.get(self.elbow)?, pose.get(self.wrist)?))
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Pose estimation timed out")]
    Timeout,

    #[error("Failed to load recorded poses: {0}")]
    ReplayLoadFailed(String),
}

pub type PoseResult<T> = Result<T, PoseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_confidence_is_strict() {
        let keypoint = Keypoint::new(10.0, 20.0, 0.7);
        assert!(keypoint.is_confident(0.5));
        assert!(!keypoint.is_confident(0.7));
        assert!(!keypoint.is_confident(0.9));
    }

    #[test]
    fn test_keypoint_distance() {
        let a = Keypoint::new(0.0, 0.0, 1.0);
        let b = Keypoint::new(3.0, 4.0, 1.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn test_limb_triples_match_landmarks() {
        assert_eq!(LimbTriple::LEFT_ARM.indices(), [5, 7, 9]);
        assert_eq!(LimbTriple::RIGHT_ARM.indices(), [6, 8, 10]);
    }

    #[test]
    fn test_resolve_short_pose() {
        let pose = Pose::new(vec![Keypoint::default(); 8]);
        assert!(LimbTriple::LEFT_ARM.resolve(&pose).is_none());

        let pose = Pose::empty();
        assert!(LimbTriple::RIGHT_ARM.resolve(&pose).is_some());
    }

    #[test]
    fn test_with_keypoint_grows_pose() {
        let pose = Pose::new(vec![]).with_keypoint(BodyLandmark::LeftWrist, Keypoint::new(1.0, 2.0, 0.9));
        assert_eq!(pose.keypoints.len(), 10);
        assert_eq!(pose.keypoint(BodyLandmark::LeftWrist), Some(&Keypoint::new(1.0, 2.0, 0.9)));
    }

    #[test]
    fn test_pose_deserializes_without_score() {
        let json = r#"{"keypoints":[{"x":1.0,"y":2.0,"confidence":0.5}]}"#;
        let pose: Pose = serde_json::from_str(json).unwrap();
        assert_eq!(pose.keypoints.len(), 1);
        assert_eq!(pose.score, 0.0);
    }
}
