// Repetition gate - armed/unarmed latch that turns limb evaluations into counted repetitions

use crate::core::geometry::LimbEvaluation;
use serde::{Deserialize, Serialize};

/// Per-session gate state shared by every limb evaluated in a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateState {
    armed: bool,
    repetition_count: u32,
}

impl GateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed(&self) -> bool {
        self.armed
    }

    pub fn repetition_count(&self) -> u32 {
        self.repetition_count
    }

    /// Back to unarmed with a zero count
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Feed one limb evaluation through the gate
///
/// Returns `true` when this evaluation counted a repetition. A bent limb only
/// counts while the gate is armed, and counting disarms it until some limb
/// straightens again.
pub fn on_frame(state: &mut GateState, evaluation: LimbEvaluation) -> bool {
    match evaluation {
        LimbEvaluation::Bent(_) if state.armed => {
            state.repetition_count += 1;
            state.armed = false;
            true
        }
        LimbEvaluation::Straight(_) => {
            state.armed = true;
            false
        }
        LimbEvaluation::Bent(_) | LimbEvaluation::BelowConfidence | LimbEvaluation::Neither => false,
    }
}

/// Run every limb of one frame through the gate in order
///
/// Returns how many repetitions this frame counted.
pub fn on_frame_limbs<I>(state: &mut GateState, evaluations: I) -> u32
where
    I: IntoIterator<Item = LimbEvaluation>,
{
    evaluations
        .into_iter()
        .filter(|evaluation| on_frame(state, *evaluation))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const BENT: LimbEvaluation = LimbEvaluation::Bent(45.0);
    const STRAIGHT: LimbEvaluation = LimbEvaluation::Straight(175.0);

    #[test]
    fn test_new_gate_is_unarmed() {
        let state = GateState::new();
        assert!(!state.armed());
        assert_eq!(state.repetition_count(), 0);
    }

    #[test]
    fn test_bent_while_unarmed_does_nothing() {
        let mut state = GateState::new();
        assert!(!on_frame(&mut state, BENT));
        assert_eq!(state, GateState::new());
    }

    #[test]
    fn test_straight_arms_gate() {
        let mut state = GateState::new();
        assert!(!on_frame(&mut state, STRAIGHT));
        assert!(state.armed());

        // Re-arming an armed gate is harmless
        assert!(!on_frame(&mut state, STRAIGHT));
        assert!(state.armed());
        assert_eq!(state.repetition_count(), 0);
    }

    #[test]
    fn test_bent_twice_counts_once() {
        let mut state = GateState::new();
        on_frame(&mut state, STRAIGHT);

        assert!(on_frame(&mut state, BENT));
        assert_eq!(state.repetition_count(), 1);
        assert!(!state.armed());

        assert!(!on_frame(&mut state, BENT));
        assert_eq!(state.repetition_count(), 1);
        assert!(!state.armed());
    }

    #[test]
    fn test_no_signal_leaves_state_alone() {
        let mut state = GateState::new();
        on_frame(&mut state, STRAIGHT);
        let before = state;

        assert!(!on_frame(&mut state, LimbEvaluation::BelowConfidence));
        assert!(!on_frame(&mut state, LimbEvaluation::Neither));
        assert_eq!(state, before);
    }

    #[test]
    fn test_full_cycles() {
        let mut state = GateState::new();
        for _ in 0..5 {
            on_frame(&mut state, STRAIGHT);
            on_frame(&mut state, LimbEvaluation::Neither);
            on_frame(&mut state, BENT);
            on_frame(&mut state, BENT);
        }
        assert_eq!(state.repetition_count(), 5);
    }

    #[test]
    fn test_both_limbs_share_one_counter() {
        let mut state = GateState::new();
        on_frame(&mut state, STRAIGHT);

        // Both arms bent in the same frame: only the first one counts
        assert_eq!(on_frame_limbs(&mut state, [BENT, BENT]), 1);
        assert_eq!(state.repetition_count(), 1);

        // One arm straightening re-arms for the other
        assert_eq!(on_frame_limbs(&mut state, [STRAIGHT, BENT]), 1);
        assert_eq!(state.repetition_count(), 2);
    }

    #[test]
    fn test_reset() {
        let mut state = GateState::new();
        on_frame(&mut state, STRAIGHT);
        on_frame(&mut state, BENT);
        on_frame(&mut state, STRAIGHT);

        state.reset();
        assert_eq!(state, GateState::new());
    }
}
