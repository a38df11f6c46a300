use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::ingress::domain::sampled_frame::{FrameBatch, SampledFrame};
use crate::shared::constants::{UNKNOWN_WALLET, VIDEO_DEFAULT_SCREEN_COLOR};
use crate::shared::screen_color::ScreenColor;
use crate::video::domain::video_reader::VideoReader;

const TEMP_PREFIX: &str = "liveness_upload_";
const TEMP_SUFFIX: &str = ".mp4";

/// Frame source adapter for raw video uploads.
///
/// The upload is spooled to a temporary file for the demuxer. That file
/// is owned by a [`TempPath`] for the duration of one `load` call, so it
/// is removed on every exit path, unwinding included.
pub struct VideoSource {
    reader: Box<dyn VideoReader>,
    temp_dir: Option<PathBuf>,
    sample_fps: Option<f64>,
}

impl VideoSource {
    pub fn new(reader: Box<dyn VideoReader>) -> Self {
        Self {
            reader,
            temp_dir: None,
            sample_fps: None,
        }
    }

    /// Spool uploads into `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Thin the demuxed stream to roughly `fps` frames per second.
    pub fn with_sample_fps(mut self, fps: Option<f64>) -> Self {
        self.sample_fps = fps;
        self
    }

    pub fn load(
        &mut self,
        bytes: &[u8],
        wallet: Option<&str>,
        screen_color: Option<ScreenColor>,
    ) -> FrameBatch {
        self.load_stream(bytes, wallet, screen_color)
    }

    /// Spools `stream` to disk, demuxes it, and deletes the spool file.
    ///
    /// Never fails: an empty or unreadable upload, or one without a
    /// decodable video stream, yields an empty batch.
    pub fn load_stream<R: Read>(
        &mut self,
        mut stream: R,
        wallet: Option<&str>,
        screen_color: Option<ScreenColor>,
    ) -> FrameBatch {
        let wallet = wallet.unwrap_or(UNKNOWN_WALLET);
        let screen_color = screen_color.unwrap_or(VIDEO_DEFAULT_SCREEN_COLOR);

        let spool = match self.spool(&mut stream) {
            Ok(Some(path)) => path,
            Ok(None) => {
                log::info!("Empty video upload for {wallet}");
                return FrameBatch::empty(wallet);
            }
            Err(e) => {
                log::warn!("Failed to spool video upload for {wallet}: {e}");
                return FrameBatch::empty(wallet);
            }
        };

        let frames = self.demux(&spool, &screen_color);

        let spool_display = spool.display().to_string();
        if let Err(e) = spool.close() {
            log::warn!("Failed to delete temporary upload {spool_display}: {e}");
        }

        FrameBatch::new(wallet, frames)
    }

    /// Copies the upload into a fresh temporary file. `None` when the
    /// upload was empty (the file is already gone by then).
    fn spool<R: Read>(&self, stream: &mut R) -> io::Result<Option<TempPath>> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX).suffix(TEMP_SUFFIX);
        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        let copied = io::copy(stream, &mut file)?;
        if copied == 0 {
            return Ok(None);
        }
        file.flush()?;
        Ok(Some(file.into_temp_path()))
    }

    fn demux(&mut self, path: &Path, screen_color: &ScreenColor) -> Vec<SampledFrame> {
        let metadata = match self.reader.open(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::info!("Upload has no usable video stream: {e}");
                self.reader.close();
                return Vec::new();
            }
        };

        let stride = self
            .sample_fps
            .map_or(1, |fps| metadata.sample_stride(fps));
        log::debug!(
            "Demuxing {}x{} {} video at {:.2} fps, keeping every {stride} frame(s)",
            metadata.width,
            metadata.height,
            metadata.codec,
            metadata.fps
        );

        let frames = self
            .reader
            .frames()
            .enumerate()
            .filter(|(i, _)| i % stride == 0)
            .map(|(i, decoded)| match decoded {
                Ok(frame) => SampledFrame::new(frame, screen_color.clone()),
                Err(e) => {
                    log::debug!("Video frame {i}: decode failed ({e})");
                    SampledFrame::undecodable(screen_color.clone())
                }
            })
            .collect();
        self.reader.close();
        frames
    }
}
