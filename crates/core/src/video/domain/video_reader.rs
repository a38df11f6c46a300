use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Demuxes and decodes a video container into frames.
///
/// Implementations handle codec and container details; the video ingress
/// adapter only sees [`Frame`]s in stream order.
pub trait VideoReader: Send {
    /// Opens a video file and returns its metadata. Fails when the file
    /// holds no decodable video stream.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases the file and decoder state. Idempotent.
    fn close(&mut self);
}
