use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Keep-every-Nth stride that thins the stream to roughly `target_fps`.
    ///
    /// Returns 1 (keep everything) when either rate is unknown or the
    /// target is at least the stream rate.
    pub fn sample_stride(&self, target_fps: f64) -> usize {
        if !(self.fps > 0.0) || !(target_fps > 0.0) || target_fps >= self.fps {
            return 1;
        }
        ((self.fps / target_fps).round() as usize).max(1)
    }
}
