use crate::core::geometry::{Thresholds, ANGLE_THRESHOLD, CONFIDENCE_THRESHOLD, STRAIGHTEN_THRESHOLD};
use crate::models::pose::{BodyLandmark, LimbTriple};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Counter configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Keypoints at or below this confidence are ignored (0.0-1.0)
    pub confidence_threshold: f32,
    /// Confidence hint handed to the pose oracle (0.0-1.0)
    pub estimate_confidence_hint: f32,
    /// Elbow angle below which an arm is bent (degrees)
    pub bend_angle_threshold: f32,
    /// Elbow angle above which an arm is straight (degrees)
    pub straighten_angle_threshold: f32,
    /// Length of the counting window in milliseconds
    pub session_duration_ms: u64,
    /// Seconds of "Starting in N..." before counting begins
    pub countdown_seconds: u32,
    /// Upper bound on a single frame capture
    pub capture_timeout_ms: u64,
    /// Upper bound on a single pose estimate
    pub oracle_timeout_ms: u64,
    /// Run one throwaway capture and estimate before the countdown
    pub warm_up: bool,
    /// Shown in the count text, e.g. "3 Pushup(s) counted"
    pub exercise_label: String,
    /// Arms evaluated each frame, in order
    pub limbs: Vec<LimbTriple>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confidence_threshold: CONFIDENCE_THRESHOLD,
            estimate_confidence_hint: 0.5,
            bend_angle_threshold: ANGLE_THRESHOLD,
            straighten_angle_threshold: STRAIGHTEN_THRESHOLD,
            session_duration_ms: 60_000,
            countdown_seconds: 3,
            capture_timeout_ms: 1_000,
            oracle_timeout_ms: 2_000,
            warm_up: true,
            exercise_label: "Pushup".to_string(),
            limbs: vec![LimbTriple::LEFT_ARM, LimbTriple::RIGHT_ARM],
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it with defaults if missing
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "Invalid confidence threshold: {}. Must be between 0.0 and 1.0",
                self.confidence_threshold
            )
            .into());
        }

        if !(0.0..=1.0).contains(&self.estimate_confidence_hint) {
            return Err(format!(
                "Invalid estimate confidence hint: {}. Must be between 0.0 and 1.0",
                self.estimate_confidence_hint
            )
            .into());
        }

        for (name, angle) in [
            ("bend", self.bend_angle_threshold),
            ("straighten", self.straighten_angle_threshold),
        ] {
            if !(angle > 0.0 && angle < 180.0) {
                return Err(format!(
                    "Invalid {} angle threshold: {}. Must be between 0 and 180 degrees",
                    name, angle
                )
                .into());
            }
        }

        if self.bend_angle_threshold >= self.straighten_angle_threshold {
            return Err(format!(
                "Bend angle threshold ({}) must be below straighten angle threshold ({})",
                self.bend_angle_threshold, self.straighten_angle_threshold
            )
            .into());
        }

        if self.session_duration_ms == 0 || self.session_duration_ms > 3_600_000 {
            return Err(format!(
                "Invalid session duration: {} ms. Must be between 1 and 3600000",
                self.session_duration_ms
            )
            .into());
        }

        if self.countdown_seconds > 10 {
            return Err(format!(
                "Invalid countdown: {} seconds. Must be at most 10",
                self.countdown_seconds
            )
            .into());
        }

        if self.capture_timeout_ms == 0 || self.oracle_timeout_ms == 0 {
            return Err("Capture and oracle timeouts must be greater than zero".into());
        }

        if self.exercise_label.trim().is_empty() {
            return Err("Exercise label cannot be empty".into());
        }

        if self.limbs.is_empty() {
            return Err("At least one limb must be evaluated".into());
        }

        for limb in &self.limbs {
            let [shoulder, elbow, wrist] = limb.indices();
            if shoulder == elbow || elbow == wrist || shoulder == wrist {
                return Err(format!("Limb {:?} repeats a keypoint index", limb).into());
            }
            if limb.indices().iter().any(|&index| index >= BodyLandmark::COUNT) {
                return Err(format!(
                    "Limb {:?} uses a keypoint index outside 0..{}",
                    limb,
                    BodyLandmark::COUNT
                )
                .into());
            }
        }

        Ok(())
    }

    /// Reset to default configuration
    pub fn reset() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            confidence: self.confidence_threshold,
            bend_angle: self.bend_angle_threshold,
            straighten_angle: self.straighten_angle_threshold,
        }
    }

    pub fn session_duration(&self) -> Duration {
        Duration::from_millis(self.session_duration_ms)
    }

    /// Set the session length in whole seconds; out-of-range values fail `validate()`
    pub fn set_session_duration_secs(&mut self, secs: u64) {
        self.session_duration_ms = secs.saturating_mul(1000);
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    /// Get the configuration file path
    fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| "Could not determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".repcount");
        path.push("config");
        path.push("settings.json");

        Ok(path)
    }
}
