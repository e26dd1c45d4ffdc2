// Elbow angle evaluation - classifies one arm of a pose as bent, straight, or neither

use crate::models::pose::{Keypoint, LimbTriple, Pose};

/// Angle below which an arm counts as bent (degrees, strict)
pub const ANGLE_THRESHOLD: f32 = 80.0;

/// Angle above which an arm counts as straightened (degrees, strict)
pub const STRAIGHTEN_THRESHOLD: f32 = 150.0;

/// Minimum keypoint confidence; scores at or below it are ignored
pub const CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Classification of one limb triple in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimbEvaluation {
    /// At least one keypoint is not trustworthy this frame
    BelowConfidence,
    /// Elbow angle under the bend threshold with the wrist below shoulder and elbow
    Bent(f32),
    /// Elbow angle over the straighten threshold
    Straight(f32),
    Neither,
}

/// Thresholds used by the evaluator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub confidence: f32,
    pub bend_angle: f32,
    pub straighten_angle: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            confidence: CONFIDENCE_THRESHOLD,
            bend_angle: ANGLE_THRESHOLD,
            straighten_angle: STRAIGHTEN_THRESHOLD,
        }
    }
}

/// Evaluate one arm of a pose
///
/// A pose missing any of the limb's indices is treated like a low-confidence
/// limb: no signal for this frame.
pub fn evaluate(pose: &Pose, limb: &LimbTriple, thresholds: &Thresholds) -> LimbEvaluation {
    let (shoulder, elbow, wrist) = match limb.resolve(pose) {
        Some(points) => points,
        None => return LimbEvaluation::BelowConfidence,
    };

    if !shoulder.is_confident(thresholds.confidence)
        || !elbow.is_confident(thresholds.confidence)
        || !wrist.is_confident(thresholds.confidence)
    {
        return LimbEvaluation::BelowConfidence;
    }

    let angle = match elbow_angle(shoulder, elbow, wrist) {
        Some(angle) => angle,
        None => return LimbEvaluation::Neither,
    };

    classify(angle, shoulder, elbow, wrist, thresholds)
}

/// Included angle at the elbow in degrees, via the law of cosines
///
/// Returns `None` when the shoulder or wrist coincides with the elbow, since
/// the angle is undefined there.
pub fn elbow_angle(shoulder: &Keypoint, elbow: &Keypoint, wrist: &Keypoint) -> Option<f32> {
    let upper_arm = shoulder.distance_to(elbow);
    let forearm = elbow.distance_to(wrist);
    let span = shoulder.distance_to(wrist);

    let denominator = 2.0 * upper_arm * forearm;
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    let cosine = (upper_arm * upper_arm + forearm * forearm - span * span) / denominator;
    if cosine.is_nan() {
        return None;
    }

    // Rounding can push the ratio just outside acos's domain
    Some(cosine.clamp(-1.0, 1.0).acos().to_degrees())
}

fn classify(
    angle: f32,
    shoulder: &Keypoint,
    elbow: &Keypoint,
    wrist: &Keypoint,
    thresholds: &Thresholds,
) -> LimbEvaluation {
    // Image y grows downward: the wrist must sit lower than shoulder and elbow
    let wrist_lowest = shoulder.y < wrist.y && elbow.y < wrist.y;

    if angle < thresholds.bend_angle && wrist_lowest {
        LimbEvaluation::Bent(angle)
    } else if angle > thresholds.straighten_angle {
        LimbEvaluation::Straight(angle)
    } else {
        LimbEvaluation::Neither
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pose::BodyLandmark;

    fn arm_pose(shoulder: (f32, f32), elbow: (f32, f32), wrist: (f32, f32), confidence: f32) -> Pose {
        Pose::empty()
            .with_keypoint(BodyLandmark::LeftShoulder, Keypoint::new(shoulder.0, shoulder.1, confidence))
            .with_keypoint(BodyLandmark::LeftElbow, Keypoint::new(elbow.0, elbow.1, confidence))
            .with_keypoint(BodyLandmark::LeftWrist, Keypoint::new(wrist.0, wrist.1, confidence))
    }

    fn left(pose: &Pose) -> LimbEvaluation {
        evaluate(pose, &LimbTriple::LEFT_ARM, &Thresholds::default())
    }

    #[test]
    fn test_colinear_arm_is_straight() {
        let pose = arm_pose((0.0, 0.0), (0.0, 10.0), (0.0, 20.0), 0.9);

        match left(&pose) {
            LimbEvaluation::Straight(angle) => assert!((angle - 180.0).abs() < 0.01),
            other => panic!("expected straight, got {:?}", other),
        }
    }

    #[test]
    fn test_right_angle_is_neither() {
        let pose = arm_pose((0.0, 0.0), (10.0, 0.0), (10.0, 10.0), 0.9);

        assert_eq!(left(&pose), LimbEvaluation::Neither);

        let angle = elbow_angle(
            &Keypoint::new(0.0, 0.0, 0.9),
            &Keypoint::new(10.0, 0.0, 0.9),
            &Keypoint::new(10.0, 10.0, 0.9),
        )
        .unwrap();
        assert!((angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_acute_angle_with_wrist_below_is_bent() {
        // Shoulder and elbow level, wrist folded back under the shoulder
        let pose = arm_pose((0.0, 0.0), (10.0, 0.0), (2.0, 6.0), 0.9);

        match left(&pose) {
            LimbEvaluation::Bent(angle) => assert!(angle < ANGLE_THRESHOLD),
            other => panic!("expected bent, got {:?}", other),
        }
    }

    #[test]
    fn test_acute_angle_with_wrist_above_is_not_bent() {
        // Same shape mirrored vertically: wrist above the shoulder
        let pose = arm_pose((0.0, 0.0), (10.0, 0.0), (2.0, -6.0), 0.9);
        assert_eq!(left(&pose), LimbEvaluation::Neither);
    }

    #[test]
    fn test_low_confidence_on_any_keypoint() {
        let pose = arm_pose((0.0, 0.0), (0.0, 10.0), (0.0, 20.0), 0.9)
            .with_keypoint(BodyLandmark::LeftElbow, Keypoint::new(0.0, 10.0, 0.3));
        assert_eq!(left(&pose), LimbEvaluation::BelowConfidence);

        // Equal to the threshold is still not confident
        let pose = arm_pose((0.0, 0.0), (0.0, 10.0), (0.0, 20.0), CONFIDENCE_THRESHOLD);
        assert_eq!(left(&pose), LimbEvaluation::BelowConfidence);
    }

    #[test]
    fn test_missing_keypoints_are_below_confidence() {
        let pose = Pose::new(vec![Keypoint::new(0.0, 0.0, 1.0); 6]);
        assert_eq!(left(&pose), LimbEvaluation::BelowConfidence);
    }

    #[test]
    fn test_coincident_keypoints_are_neither() {
        let pose = arm_pose((5.0, 5.0), (5.0, 5.0), (5.0, 20.0), 0.9);
        assert_eq!(left(&pose), LimbEvaluation::Neither);
    }

    #[test]
    fn test_angles_stay_in_range() {
        let samples = [
            ((0.0, 0.0), (1.0, 0.0), (2.0, 0.0)),
            ((0.0, 0.0), (1.0, 0.0), (0.0, 0.0)),
            ((0.1, 0.3), (0.7, 0.2), (0.4, 0.9)),
            ((100.0, 100.0), (100.000_01, 100.0), (100.000_02, 100.0)),
            ((-50.0, 12.0), (33.0, -7.0), (18.0, 64.0)),
        ];

        for (s, e, w) in samples {
            let angle = elbow_angle(
                &Keypoint::new(s.0, s.1, 1.0),
                &Keypoint::new(e.0, e.1, 1.0),
                &Keypoint::new(w.0, w.1, 1.0),
            );
            if let Some(angle) = angle {
                assert!(!angle.is_nan());
                assert!((0.0..=180.0).contains(&angle), "angle {} out of range", angle);
            }
        }
    }

    #[test]
    fn test_thresholds_are_strict() {
        let shoulder = Keypoint::new(0.0, 0.0, 1.0);
        let elbow = Keypoint::new(0.0, 1.0, 1.0);
        let wrist = Keypoint::new(0.0, 2.0, 1.0);
        let thresholds = Thresholds::default();

        assert_eq!(
            classify(ANGLE_THRESHOLD, &shoulder, &elbow, &wrist, &thresholds),
            LimbEvaluation::Neither
        );
        assert_eq!(
            classify(STRAIGHTEN_THRESHOLD, &shoulder, &elbow, &wrist, &thresholds),
            LimbEvaluation::Neither
        );
        assert_eq!(
            classify(79.9, &shoulder, &elbow, &wrist, &thresholds),
            LimbEvaluation::Bent(79.9)
        );
        assert_eq!(
            classify(150.1, &shoulder, &elbow, &wrist, &thresholds),
            LimbEvaluation::Straight(150.1)
        );
    }
}
