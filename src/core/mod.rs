pub mod config;
pub mod geometry;
pub mod repetition_gate;
pub mod session_clock;

// Session loop driving the collaborators
pub mod rep_counter;
