use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::face_detector::FaceDetector;

/// Default minimum face size in pixels, applied to both axes.
pub const DEFAULT_MIN_FACE_SIZE: u32 = 30;

/// Finds the one face a frame is judged on.
///
/// Candidates smaller than the size floor are dropped, then the largest
/// remaining box by area wins. A detector failure counts as "no face".
pub struct FaceLocator {
    detector: Box<dyn FaceDetector>,
    min_face_size: i32,
}

impl FaceLocator {
    pub fn new(detector: Box<dyn FaceDetector>, min_face_size: u32) -> Self {
        Self {
            detector,
            min_face_size: min_face_size.min(i32::MAX as u32) as i32,
        }
    }

    pub fn locate(&mut self, frame: &Frame) -> Option<Region> {
        let candidates = match self.detector.detect(frame) {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("Face detection failed on frame {}: {e}", frame.index());
                return None;
            }
        };

        let eligible: Vec<Region> = candidates
            .into_iter()
            .filter(|r| !r.is_degenerate())
            .filter(|r| r.width >= self.min_face_size && r.height >= self.min_face_size)
            .collect();
        Region::largest(&eligible)
    }
}
