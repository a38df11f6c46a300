use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::constants::SESSION_PREFIX;

use super::pipeline_config::PipelineConfig;
use super::score_accumulator::ComponentScores;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Failed,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The public verdict for one request. Every score is rounded to two
/// decimals; `confidence_score` is the average confidence divided by the
/// configured scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub status: VerificationStatus,
    pub wallet: String,
    pub session_id: String,
    pub confidence_score: f64,
    pub eye_score: f64,
    pub skin_score: f64,
    pub pulse_score: f64,
    pub flash_score: f64,
}

pub struct VerdictBuilder {
    threshold: f64,
    confidence_scale: f64,
}

impl VerdictBuilder {
    pub fn new(threshold: f64, confidence_scale: f64) -> Self {
        Self {
            threshold,
            confidence_scale,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.verdict_threshold, config.confidence_scale)
    }

    /// Strictly above the threshold passes; a tie fails.
    pub fn status_for(&self, total_average: f64) -> VerificationStatus {
        if total_average > self.threshold {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Failed
        }
    }

    pub fn build(&self, wallet: impl Into<String>, scores: &ComponentScores) -> VerificationResult {
        VerificationResult {
            status: self.status_for(scores.total),
            wallet: wallet.into(),
            session_id: new_session_id(),
            confidence_score: round2(scores.total / self.confidence_scale),
            eye_score: round2(scores.eye),
            skin_score: round2(scores.skin),
            pulse_score: round2(scores.pulse),
            flash_score: round2(scores.flash),
        }
    }
}

pub fn new_session_id() -> String {
    format!("{SESSION_PREFIX}{}", Uuid::new_v4())
}

/// Rounds to two decimals from the exact binary value, ties to even, so
/// 0.625 becomes 0.62 and 0.015 (stored just below) becomes 0.01.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
