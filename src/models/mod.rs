// Data models for frame capture, pose observations, and counting sessions

pub mod capture;
pub mod pose;
pub mod session;
