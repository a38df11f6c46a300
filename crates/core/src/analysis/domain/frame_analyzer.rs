use crate::shared::frame::Frame;
use crate::shared::screen_color::ScreenColor;

use super::analysis_result::AnalysisResult;

/// Domain interface for the per-frame biometric analysis engine.
///
/// Called exactly once per frame with a located face, given the forehead
/// crop and the whole decoded frame. Implementations must not fail: any
/// internal problem is reported as [`AnalysisResult::excluded`].
pub trait FrameAnalyzer: Send {
    fn analyze(
        &mut self,
        forehead: &Frame,
        frame: &Frame,
        screen_color: &ScreenColor,
    ) -> AnalysisResult;
}
