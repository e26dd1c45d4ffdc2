pub mod core;
pub mod models;
pub mod platform;

pub use crate::core::config::Config;
pub use crate::core::geometry::{evaluate, LimbEvaluation, Thresholds};
pub use crate::core::rep_counter::RepCounter;
pub use crate::core::repetition_gate::GateState;
pub use crate::models::pose::{Keypoint, LimbTriple, Pose};
pub use crate::models::session::{SessionOutcome, SessionSummary};
