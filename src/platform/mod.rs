// Collaborators the counter drives: camera frames in, poses from the oracle, status text out

pub mod capture;
pub mod display;
pub mod pose;

pub use capture::{FrameSource, SyntheticFrameSource};
pub use display::{ChannelDisplay, DisplaySink, DisplayUpdate, TerminalDisplay};
pub use pose::{PoseOracle, ReplayMode, ReplayOracle};
