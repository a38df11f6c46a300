use crate::analysis::domain::analysis_result::AnalysisResult;

/// Skin ratio that maps to a full skin score.
const SKIN_RATIO_FULL_SCALE: f64 = 1.2;

/// Eye score lost per unit of moiré; saturates at moiré 0.2.
const MOIRE_PENALTY: f64 = 5.0;

/// Per-frame averages over the valid frames of one batch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ComponentScores {
    pub pulse: f64,
    pub skin: f64,
    pub flash: f64,
    pub eye: f64,
    /// Average engine confidence on the engine's native scale.
    pub total: f64,
    pub valid_frames: usize,
}

/// Running sums over the valid frames of one batch.
///
/// Sums only grow. `finalize` consumes the accumulator, so averages are
/// taken exactly once, after the whole batch has been seen.
#[derive(Clone, Debug, Default)]
pub struct ScoreAccumulator {
    pulse: f64,
    skin: f64,
    flash: f64,
    eye: f64,
    total: f64,
    valid_frames: usize,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one engine result in. Returns `false`, leaving every sum
    /// untouched, when the result is an exclusion (non-positive confidence).
    pub fn add(&mut self, result: &AnalysisResult) -> bool {
        if !result.is_usable() {
            return false;
        }
        self.valid_frames += 1;
        self.total += result.confidence;
        self.pulse += result.signal_quality;
        self.skin += skin_score(result.details.sss_ratio);
        self.flash += flash_score(result.details.chroma_passed);
        self.eye += eye_score(result.details.moire_score);
        true
    }

    pub fn valid_frames(&self) -> usize {
        self.valid_frames
    }

    pub fn finalize(self) -> ComponentScores {
        if self.valid_frames == 0 {
            return ComponentScores::default();
        }
        let n = self.valid_frames as f64;
        ComponentScores {
            pulse: self.pulse / n,
            skin: self.skin / n,
            flash: self.flash / n,
            eye: self.eye / n,
            total: self.total / n,
            valid_frames: self.valid_frames,
        }
    }
}

/// Spectral skin ratio scaled into 0.0–1.0.
pub fn skin_score(sss_ratio: f64) -> f64 {
    // max/min rather than clamp so NaN lands on 0.0
    (sss_ratio / SKIN_RATIO_FULL_SCALE).max(0.0).min(1.0)
}

pub fn flash_score(chroma_passed: bool) -> f64 {
    if chroma_passed {
        1.0
    } else {
        0.0
    }
}

/// Linear moiré penalty, kept within 0.0–1.0.
pub fn eye_score(moire_score: f64) -> f64 {
    (1.0 - moire_score * MOIRE_PENALTY).max(0.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::analysis_result::AnalysisDetails;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn result(confidence: f64, signal: f64, sss: f64, chroma: bool, moire: f64) -> AnalysisResult {
        AnalysisResult {
            confidence,
            signal_quality: signal,
            details: AnalysisDetails {
                sss_ratio: sss,
                chroma_passed: chroma,
                moire_score: moire,
                ..AnalysisDetails::default()
            },
        }
    }

    #[rstest]
    #[case::nominal(1.0, 1.0 / 1.2)]
    #[case::full_scale(1.2, 1.0)]
    #[case::above_full_scale(3.0, 1.0)]
    #[case::negative(-0.5, 0.0)]
    #[case::not_a_number(f64::NAN, 0.0)]
    fn test_skin_score(#[case] sss: f64, #[case] expected: f64) {
        assert_relative_eq!(skin_score(sss), expected);
    }

    #[rstest]
    #[case::clean(0.0, 1.0)]
    #[case::mild(0.1, 0.5)]
    #[case::saturation_point(0.2, 0.0)]
    #[case::beyond_saturation(0.9, 0.0)]
    #[case::negative_capped(-1.0, 1.0)]
    #[case::not_a_number(f64::NAN, 0.0)]
    fn test_eye_score(#[case] moire: f64, #[case] expected: f64) {
        assert_relative_eq!(eye_score(moire), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_flash_score_is_binary() {
        assert_relative_eq!(flash_score(true), 1.0);
        assert_relative_eq!(flash_score(false), 0.0);
    }

    #[test]
    fn test_empty_accumulator_finalizes_to_zero() {
        assert_eq!(ScoreAccumulator::new().finalize(), ComponentScores::default());
    }

    #[test]
    fn test_zero_confidence_is_excluded_not_averaged() {
        let mut acc = ScoreAccumulator::new();
        assert!(acc.add(&result(80.0, 1.0, 1.2, true, 0.0)));
        assert!(!acc.add(&result(0.0, 0.0, 0.0, false, 1.0)));
        assert_eq!(acc.valid_frames(), 1);

        let scores = acc.finalize();
        assert_relative_eq!(scores.total, 80.0);
        assert_relative_eq!(scores.pulse, 1.0);
        assert_relative_eq!(scores.eye, 1.0);
    }

    #[test]
    fn test_averages_over_valid_frames() {
        let mut acc = ScoreAccumulator::new();
        acc.add(&result(60.0, 0.9, 1.0, true, 0.0));
        acc.add(&result(20.0, 0.1, 0.5, false, 0.3));

        let scores = acc.finalize();
        assert_eq!(scores.valid_frames, 2);
        assert_relative_eq!(scores.total, 40.0);
        assert_relative_eq!(scores.pulse, 0.5);
        assert_relative_eq!(scores.skin, 0.625, epsilon = 1e-12);
        assert_relative_eq!(scores.flash, 0.5);
        assert_relative_eq!(scores.eye, 0.5);
    }

    #[test]
    fn test_average_is_order_independent() {
        let results = [
            result(70.0, 0.3, 0.9, true, 0.05),
            result(15.0, 0.8, 1.4, false, 0.15),
            result(55.0, 0.6, 1.1, true, 0.0),
        ];
        let mut forward = ScoreAccumulator::new();
        results.iter().for_each(|r| {
            forward.add(r);
        });
        let mut backward = ScoreAccumulator::new();
        results.iter().rev().for_each(|r| {
            backward.add(r);
        });

        let (f, b) = (forward.finalize(), backward.finalize());
        assert_relative_eq!(f.total, b.total, epsilon = 1e-9);
        assert_relative_eq!(f.skin, b.skin, epsilon = 1e-12);
        assert_relative_eq!(f.eye, b.eye, epsilon = 1e-12);
    }
}
