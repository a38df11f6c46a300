use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for the face-detection capability.
///
/// Returns every candidate face in detector order; choosing among them is
/// the [`FaceLocator`](super::face_locator::FaceLocator)'s job.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
