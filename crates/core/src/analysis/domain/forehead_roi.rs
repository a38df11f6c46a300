use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Share of the face box height used as the pulse region.
pub const DEFAULT_FOREHEAD_RATIO: f64 = 0.3;

/// Cuts the forehead band (top slice of the face box, full width) out of
/// a frame. Tiny faces give an empty crop, which is passed on as-is.
#[derive(Clone, Copy, Debug)]
pub struct ForeheadExtractor {
    ratio: f64,
}

impl ForeheadExtractor {
    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }

    pub fn extract(&self, face: &Region, frame: &Frame) -> Frame {
        let band = face.top_band(self.ratio);
        frame.crop(band.x, band.y, band.width, band.height)
    }
}

impl Default for ForeheadExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_FOREHEAD_RATIO)
    }
}
