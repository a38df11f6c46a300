use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::domain::forehead_roi::DEFAULT_FOREHEAD_RATIO;
use crate::detection::domain::face_locator::DEFAULT_MIN_FACE_SIZE;
use crate::detection::infrastructure::onnx_blazeface_detector::DEFAULT_CONFIDENCE;
use crate::shared::constants::APP_DIR_NAME;

/// Strict lower bound on the average engine confidence for a pass.
pub const DEFAULT_VERDICT_THRESHOLD: f64 = 40.0;

/// Engine confidence that maps to a public score of 1.0.
pub const DEFAULT_CONFIDENCE_SCALE: f64 = 100.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

/// Process-wide tuning shared by every verification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub verdict_threshold: f64,
    pub confidence_scale: f64,
    pub forehead_ratio: f64,
    pub min_face_size: u32,
    pub detector_confidence: f64,
    pub video_sample_fps: Option<f64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            verdict_threshold: DEFAULT_VERDICT_THRESHOLD,
            confidence_scale: DEFAULT_CONFIDENCE_SCALE,
            forehead_ratio: DEFAULT_FOREHEAD_RATIO,
            min_face_size: DEFAULT_MIN_FACE_SIZE,
            detector_confidence: DEFAULT_CONFIDENCE,
            video_sample_fps: None,
        }
    }
}

impl PipelineConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.json"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `explicit` if given. Otherwise the per-user config file is
    /// used when it exists, and defaults when it does not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::debug!("Using config {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.verdict_threshold.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "Verdict threshold must be a finite number, got {}",
                self.verdict_threshold
            )));
        }
        if !(self.confidence_scale.is_finite() && self.confidence_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "Confidence scale must be positive, got {}",
                self.confidence_scale
            )));
        }
        if !(self.forehead_ratio > 0.0 && self.forehead_ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "Forehead ratio must be in (0.0, 1.0], got {}",
                self.forehead_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.detector_confidence) {
            return Err(ConfigError::Invalid(format!(
                "Detector confidence must be between 0.0 and 1.0, got {}",
                self.detector_confidence
            )));
        }
        if let Some(fps) = self.video_sample_fps {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "Video sample rate must be positive, got {fps}"
                )));
            }
        }
        Ok(())
    }
}
