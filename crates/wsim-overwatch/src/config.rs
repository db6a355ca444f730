//! Scheduler settings, loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! seed                  = 7
//! max_iterations        = 500
//! seconds_per_iteration = 60
//! rollout_dampening     = 0.75
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use wsim_assess::THREAT_PRIORITY;
use wsim_core::time::SECS_PER_HOUR;

use crate::{OverwatchError, OverwatchResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverwatchConfig {
    /// Master seed for the scheduler's roll source.
    pub seed: u64,
    /// Passes one `process()` may run before giving up.
    pub max_iterations: u32,
    /// Simulated seconds each pass advances every realm increment.
    pub seconds_per_iteration: i64,
    /// Longest window an active increment may have left.
    pub max_increment_secs: i64,
    /// Priority given to an imminent threat when weighing a roll-out.
    pub threat_priority: f64,
    /// Scales the roll-out chance `(pressure - priority)`.
    pub rollout_dampening: f64,
    /// Hop radius in which threat sources are looked for.
    pub threat_hops: u32,
    /// Provider spawned for an actor whose action a threat rolled out.
    /// Empty disables the response.
    pub response_action: String,
}

impl Default for OverwatchConfig {
    fn default() -> Self {
        Self {
            seed:                  42,
            max_iterations:        3_600,
            seconds_per_iteration: 1,
            max_increment_secs:    SECS_PER_HOUR,
            threat_priority:       THREAT_PRIORITY,
            rollout_dampening:     0.9,
            threat_hops:           1,
            response_action:       "combat".to_owned(),
        }
    }
}

impl OverwatchConfig {
    /// Load and validate a configuration file.
    pub fn from_file(path: &Path) -> OverwatchResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse and validate TOML text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> OverwatchResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> OverwatchResult<()> {
        if self.max_iterations == 0 {
            return Err(OverwatchError::Config("max_iterations must be at least 1".into()));
        }
        if self.seconds_per_iteration <= 0 {
            return Err(OverwatchError::Config(format!(
                "seconds_per_iteration must be positive, got {}",
                self.seconds_per_iteration
            )));
        }
        if self.max_increment_secs <= 0 {
            return Err(OverwatchError::Config(format!(
                "max_increment_secs must be positive, got {}",
                self.max_increment_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.rollout_dampening) {
            return Err(OverwatchError::Config(format!(
                "rollout_dampening must lie in [0, 1], got {}",
                self.rollout_dampening
            )));
        }
        if !(0.0..=1.0).contains(&self.threat_priority) {
            return Err(OverwatchError::Config(format!(
                "threat_priority must lie in [0, 1], got {}",
                self.threat_priority
            )));
        }
        Ok(())
    }
}
