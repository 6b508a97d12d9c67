//! Scoring thresholds, region weights and monitor settings.
//!
//! ## Default tables
//!
//! | Region | Score bands (metric < limit) | Severity bands (metric > limit) |
//! |--------|------------------------------|---------------------------------|
//! | Head Position | 10→100, 20→85, 30→70, else 50 | 20→moderate, 10→mild |
//! | Shoulder Alignment | 5→100, 10→90, 20→75, else 60 | 15→moderate, 8→mild |
//! | Spine Curvature | 10→100, 20→85, 30→70, else 50 | 20→high, 10→moderate |
//!
//! Head severity uses the signed ear/shoulder offset, so a head held behind
//! the shoulders never raises a forward-head issue. Score bands always use
//! the absolute value.

use std::path::Path;

use posture_core::{Error, Region, Result, Severity};
use serde::{Deserialize, Serialize};

/// Score assigned when the metric is strictly below `below`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub below: f64,
    pub score: u8,
}

/// Ordered score bands with a fallback for metrics beyond the last band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub bands: Vec<ScoreBand>,
    pub otherwise: u8,
}

impl ScoreTable {
    fn new(bands: &[(f64, u8)], otherwise: u8) -> Self {
        Self {
            bands: bands
                .iter()
                .map(|&(below, score)| ScoreBand { below, score })
                .collect(),
            otherwise,
        }
    }

    pub fn score(&self, metric: f64) -> u8 {
        self.bands
            .iter()
            .find(|band| metric < band.below)
            .map(|band| band.score)
            .unwrap_or(self.otherwise)
    }

    fn validate(&self, label: &str) -> Result<()> {
        if self.otherwise > 100 || self.bands.iter().any(|b| b.score > 100) {
            return Err(Error::Config(format!("{label}: scores must be within 0..=100")));
        }
        if self.bands.iter().any(|b| !b.below.is_finite()) {
            return Err(Error::Config(format!("{label}: band limits must be finite")));
        }
        if self.bands.windows(2).any(|w| w[0].below >= w[1].below) {
            return Err(Error::Config(format!("{label}: score bands must be strictly ascending")));
        }
        Ok(())
    }
}

/// Severity assigned when the metric is strictly above `above`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityBand {
    pub above: f64,
    pub severity: Severity,
}

/// Severity bands, checked from the largest limit down; `none` otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityTable {
    pub bands: Vec<SeverityBand>,
}

impl SeverityTable {
    fn new(bands: &[(f64, Severity)]) -> Self {
        Self {
            bands: bands
                .iter()
                .map(|&(above, severity)| SeverityBand { above, severity })
                .collect(),
        }
    }

    pub fn classify(&self, metric: f64) -> Severity {
        self.bands
            .iter()
            .find(|band| metric > band.above)
            .map(|band| band.severity)
            .unwrap_or(Severity::None)
    }

    fn validate(&self, label: &str) -> Result<()> {
        if self.bands.iter().any(|b| !b.above.is_finite()) {
            return Err(Error::Config(format!("{label}: band limits must be finite")));
        }
        if self.bands.windows(2).any(|w| w[0].above <= w[1].above) {
            return Err(Error::Config(format!(
                "{label}: severity bands must be strictly descending"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionThresholds {
    pub score: ScoreTable,
    pub severity: SeverityTable,
}

/// Composite weights; renormalized over the regions actually evaluated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionWeights {
    pub head: f64,
    pub shoulder: f64,
    pub spine: f64,
}

impl RegionWeights {
    pub fn weight(&self, region: Region) -> f64 {
        match region {
            Region::HeadPosition => self.head,
            Region::ShoulderAlignment => self.shoulder,
            Region::SpineCurvature => self.spine,
        }
    }
}

impl Default for RegionWeights {
    fn default() -> Self {
        Self {
            head: 0.3,
            shoulder: 0.3,
            spine: 0.4,
        }
    }
}

/// Complete scoring engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum confidence (exclusive) for a keypoint to be used
    pub usability_threshold: f64,
    /// Below this fraction of usable keypoints the score falls back
    pub min_usable_ratio: f64,
    /// Score reported for unreliable detections
    pub low_confidence_score: u8,
    /// Scores at or above this are good posture
    pub good_posture_score: u8,
    /// Scores at or above this (and below good) are a warning
    pub warning_score: u8,
    pub weights: RegionWeights,
    pub head: RegionThresholds,
    pub shoulder: RegionThresholds,
    pub spine: RegionThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            usability_threshold: 0.3,
            min_usable_ratio: 0.5,
            low_confidence_score: 50,
            good_posture_score: 85,
            warning_score: 70,
            weights: RegionWeights::default(),
            head: RegionThresholds {
                score: ScoreTable::new(&[(10.0, 100), (20.0, 85), (30.0, 70)], 50),
                severity: SeverityTable::new(&[
                    (20.0, Severity::Moderate),
                    (10.0, Severity::Mild),
                ]),
            },
            shoulder: RegionThresholds {
                score: ScoreTable::new(&[(5.0, 100), (10.0, 90), (20.0, 75)], 60),
                severity: SeverityTable::new(&[
                    (15.0, Severity::Moderate),
                    (8.0, Severity::Mild),
                ]),
            },
            spine: RegionThresholds {
                score: ScoreTable::new(&[(10.0, 100), (20.0, 85), (30.0, 70)], 50),
                severity: SeverityTable::new(&[
                    (20.0, Severity::High),
                    (10.0, Severity::Moderate),
                ]),
            },
        }
    }
}

impl EngineConfig {
    pub fn thresholds(&self, region: Region) -> &RegionThresholds {
        match region {
            Region::HeadPosition => &self.head,
            Region::ShoulderAlignment => &self.shoulder,
            Region::SpineCurvature => &self.spine,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.usability_threshold) {
            return Err(Error::Config(format!(
                "usability_threshold must be within [0, 1], got {}",
                self.usability_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.min_usable_ratio) {
            return Err(Error::Config(format!(
                "min_usable_ratio must be within [0, 1], got {}",
                self.min_usable_ratio
            )));
        }
        if self.low_confidence_score > 100 || self.good_posture_score > 100 {
            return Err(Error::Config("scores must be within 0..=100".to_string()));
        }
        if self.warning_score > self.good_posture_score {
            return Err(Error::Config(
                "warning_score must not exceed good_posture_score".to_string(),
            ));
        }

        // Every region needs positive weight so any evaluated subset can renormalize
        for region in Region::ALL {
            let weight = self.weights.weight(region);
            if !weight.is_finite() || weight <= 0.0 {
                return Err(Error::Config(format!(
                    "{} weight must be finite and positive, got {}",
                    region.name(),
                    weight
                )));
            }
        }

        for region in Region::ALL {
            let thresholds = self.thresholds(region);
            thresholds.score.validate(region.name())?;
            thresholds.severity.validate(region.name())?;
        }
        Ok(())
    }
}

/// Sampling loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Interval between detector samples (milliseconds)
    pub sample_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 100,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    pub engine: EngineConfig,
    pub monitor: MonitorConfig,
}

impl PostureConfig {
    /// Load configuration from file, overridden by `POSTURE__*` environment variables
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Self::finish(settings)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Self::finish(settings)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("POSTURE")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(settings: config::Config) -> Result<Self> {
        let loaded: Self = settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;

        if let Err(e) = loaded.engine.validate() {
            tracing::warn!("Rejecting posture configuration: {}", e);
            return Err(e);
        }
        if loaded.monitor.sample_interval_ms == 0 {
            return Err(Error::Config("sample_interval_ms must be positive".to_string()));
        }
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PostureConfig::default();
        assert!(config.engine.validate().is_ok());
        assert_eq!(config.monitor.sample_interval_ms, 100);
        assert_eq!(config.engine.good_posture_score, 85);
    }

    #[test]
    fn test_score_table_bands() {
        let config = EngineConfig::default();
        let head = &config.head.score;
        assert_eq!(head.score(0.0), 100);
        assert_eq!(head.score(9.99), 100);
        assert_eq!(head.score(10.0), 85);
        assert_eq!(head.score(25.0), 70);
        assert_eq!(head.score(30.0), 50);

        let shoulder = &config.shoulder.score;
        assert_eq!(shoulder.score(4.0), 100);
        assert_eq!(shoulder.score(5.0), 90);
        assert_eq!(shoulder.score(19.0), 75);
        assert_eq!(shoulder.score(20.0), 60);
    }

    #[test]
    fn test_severity_table_bands() {
        let config = EngineConfig::default();
        assert_eq!(config.head.severity.classify(25.0), Severity::Moderate);
        assert_eq!(config.head.severity.classify(20.0), Severity::Mild);
        assert_eq!(config.head.severity.classify(10.0), Severity::None);
        assert_eq!(config.head.severity.classify(-40.0), Severity::None);
        assert_eq!(config.shoulder.severity.classify(16.0), Severity::Moderate);
        assert_eq!(config.shoulder.severity.classify(9.0), Severity::Mild);
        assert_eq!(config.spine.severity.classify(21.0), Severity::High);
        assert_eq!(config.spine.severity.classify(11.0), Severity::Moderate);
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        let mut config = EngineConfig::default();
        config.head.score.bands.swap(0, 1);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = EngineConfig::default();
        config.spine.severity.bands.reverse();
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.weights = RegionWeights {
            head: 0.0,
            shoulder: 0.0,
            spine: 0.0,
        };
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.weights.head = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.weights = RegionWeights {
            head: 1.0,
            shoulder: 0.0,
            spine: 0.0,
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = EngineConfig::default();
        config.warning_score = 90;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("posture-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[engine]\nusability_threshold = 0.4\n\n[engine.weights]\nhead = 0.5\nshoulder = 0.25\nspine = 0.25\n",
        )
        .unwrap();

        let config = PostureConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!((config.engine.usability_threshold - 0.4).abs() < 1e-6);
        assert!((config.engine.weights.head - 0.5).abs() < 1e-10);
        // Untouched sections keep their defaults
        assert_eq!(config.engine.head, EngineConfig::default().head);
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let path = std::env::temp_dir().join(format!("posture-config-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[engine]\nmin_usable_ratio = 1.5\n").unwrap();

        let result = PostureConfig::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("POSTURE__MONITOR__SAMPLE_INTERVAL_MS", "250");
        let config = PostureConfig::from_env();
        std::env::remove_var("POSTURE__MONITOR__SAMPLE_INTERVAL_MS");

        assert_eq!(config.unwrap().monitor.sample_interval_ms, 250);
    }
}
