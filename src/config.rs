use crate::error::EngineError;
use crate::serde_support::hhmm;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Team colours, indexed by `(team number - 1) % len`.
pub const DEFAULT_TEAM_PALETTE: [&str; 20] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#84CC16", "#F97316",
    "#EC4899", "#6366F1", "#14B8A6", "#A855F7", "#F43F5E", "#8B5A2B", "#059669", "#7C3AED",
    "#DC2626", "#0891B2", "#CA8A04", "#BE123C",
];

/// Tunables of the scheduling engine. Every field has a default, so a
/// partial JSON document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Working window used when a job does not carry its own start time.
    #[serde(with = "hhmm")]
    pub default_window_start: NaiveTime,
    /// Working window used when a job does not carry its own end time.
    #[serde(with = "hhmm")]
    pub default_window_end: NaiveTime,
    /// Length of a CPM "day" in hours.
    pub hours_per_cpm_day: f64,
    /// Slack below which a task counts as critical.
    pub critical_tolerance: f64,
    /// Floor applied to step durations, in hours.
    pub min_step_duration_hours: f64,
    pub team_palette: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_window_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            default_window_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
            hours_per_cpm_day: 8.0,
            critical_tolerance: 0.1,
            min_step_duration_hours: 0.25,
            team_palette: DEFAULT_TEAM_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.hours_per_cpm_day.is_finite() || self.hours_per_cpm_day <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "hours_per_cpm_day must be positive (got {})",
                self.hours_per_cpm_day
            )));
        }
        if !self.critical_tolerance.is_finite() || self.critical_tolerance < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "critical_tolerance must be non-negative (got {})",
                self.critical_tolerance
            )));
        }
        if !self.min_step_duration_hours.is_finite() || self.min_step_duration_hours <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "min_step_duration_hours must be positive (got {})",
                self.min_step_duration_hours
            )));
        }
        if self.team_palette.is_empty() {
            return Err(EngineError::InvalidConfig(
                "team_palette requires at least one colour".into(),
            ));
        }
        Ok(())
    }

    /// Colour for a team number; numbering starts at 1.
    pub fn team_color(&self, number: u32) -> &str {
        if self.team_palette.is_empty() {
            return DEFAULT_TEAM_PALETTE[(number.max(1) as usize - 1) % DEFAULT_TEAM_PALETTE.len()];
        }
        let slot = (number.max(1) as usize - 1) % self.team_palette.len();
        &self.team_palette[slot]
    }
}
