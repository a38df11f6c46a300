use crate::analysis::domain::forehead_roi::ForeheadExtractor;
use crate::analysis::domain::frame_analyzer::FrameAnalyzer;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_locator::FaceLocator;
use crate::ingress::domain::sampled_frame::{FrameBatch, SampledFrame};

use super::pipeline_config::PipelineConfig;
use super::score_accumulator::{ComponentScores, ScoreAccumulator};
use super::verdict_builder::{VerdictBuilder, VerificationResult};

/// Turns a frame batch into a verdict.
///
/// Each frame goes through face location, forehead crop and engine
/// analysis. Frames with no image, no face, or a non-positive engine
/// confidence are skipped; the rest are averaged and compared against
/// the threshold. Never fails: a batch with nothing usable yields a
/// failed verdict with zero scores.
pub struct VerifyLivenessUseCase {
    locator: FaceLocator,
    forehead: ForeheadExtractor,
    analyzer: Box<dyn FrameAnalyzer>,
    verdict: VerdictBuilder,
}

impl VerifyLivenessUseCase {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        analyzer: Box<dyn FrameAnalyzer>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            locator: FaceLocator::new(detector, config.min_face_size),
            forehead: ForeheadExtractor::new(config.forehead_ratio),
            analyzer,
            verdict: VerdictBuilder::from_config(config),
        }
    }

    pub fn execute(&mut self, batch: FrameBatch) -> VerificationResult {
        log::info!("Processing {} frames for {}", batch.len(), batch.wallet);

        let scores = self.score(&batch.frames);
        let result = self.verdict.build(batch.wallet, &scores);

        log::info!(
            "Verdict for {}: {} (total average {:.2} over {} valid frames)",
            result.wallet,
            result.status,
            scores.total,
            scores.valid_frames
        );
        result
    }

    /// Averages engine output over the usable frames, in batch order.
    pub fn score(&mut self, frames: &[SampledFrame]) -> ComponentScores {
        let mut acc = ScoreAccumulator::new();

        for (i, sampled) in frames.iter().enumerate() {
            let Some(image) = sampled.image.as_ref() else {
                log::debug!("Frame {i}: undecodable, skipped");
                continue;
            };
            let Some(face) = self.locator.locate(image) else {
                log::debug!("Frame {i}: no face, skipped");
                continue;
            };

            let forehead = self.forehead.extract(&face, image);
            let analysis = self
                .analyzer
                .analyze(&forehead, image, &sampled.screen_color);

            if !acc.add(&analysis) {
                log::debug!(
                    "Frame {i}: engine confidence {} excluded",
                    analysis.confidence
                );
            }
        }

        acc.finalize()
    }
}
