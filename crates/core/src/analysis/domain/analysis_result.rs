use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named detail metrics reported by the analysis engine for one frame.
///
/// Missing metrics read as zero / not passed. Metrics this pipeline does
/// not score are kept in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    /// Spectral skin ratio. Nominally 0.8–1.2, unbounded in practice.
    #[serde(default)]
    pub sss_ratio: f64,
    /// Whether the chroma response to the screen flash looked organic.
    #[serde(default)]
    pub chroma_passed: bool,
    /// Moiré/texture artefact score, 0.0 and up; higher is worse.
    #[serde(default)]
    pub moire_score: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The engine's verdict on one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Overall confidence on the engine's native scale. Zero (or less)
    /// means the frame is unusable and must not be averaged.
    #[serde(default)]
    pub confidence: f64,
    /// Pulse signal quality, already in 0.0–1.0.
    #[serde(default)]
    pub signal_quality: f64,
    #[serde(default)]
    pub details: AnalysisDetails,
}

impl AnalysisResult {
    /// The result an engine failure resolves to.
    pub fn excluded() -> Self {
        Self::default()
    }

    pub fn is_usable(&self) -> bool {
        self.confidence > 0.0
    }
}
