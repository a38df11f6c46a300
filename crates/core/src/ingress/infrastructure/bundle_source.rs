use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ingress::domain::bundle_record::{BundleRecord, FrameImage};
use crate::ingress::domain::sampled_frame::{FrameBatch, SampledFrame};
use crate::shared::constants::{BUNDLE_DEFAULT_SCREEN_COLOR, UNKNOWN_WALLET};

use super::image_decoder::decode_inline_image;

#[derive(Error, Debug)]
pub enum BundleFileError {
    #[error("bundle file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read bundle file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bundle is not a JSON array of frame records: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Frame source adapter for structured per-frame bundles.
///
/// Never fails: undecodable images become empty slots in the batch and
/// an empty bundle becomes an empty batch for the `UNKNOWN` subject.
pub struct BundleSource;

impl BundleSource {
    pub fn load(records: Vec<BundleRecord>) -> FrameBatch {
        let wallet = records
            .first()
            .and_then(|r| r.wallet.clone())
            .unwrap_or_else(|| UNKNOWN_WALLET.to_string());

        let frames = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let screen_color = record
                    .screen_color
                    .unwrap_or(BUNDLE_DEFAULT_SCREEN_COLOR);
                match record.image {
                    FrameImage::Decoded(frame) => {
                        SampledFrame::new(frame.with_index(index), screen_color)
                    }
                    FrameImage::Encoded(encoded) => match decode_inline_image(&encoded, index) {
                        Ok(frame) => SampledFrame::new(frame, screen_color),
                        Err(e) => {
                            log::debug!("Bundle frame {index}: undecodable image ({e})");
                            SampledFrame::undecodable(screen_color)
                        }
                    },
                }
            })
            .collect();

        FrameBatch::new(wallet, frames)
    }
}

/// Parses a bundle from its JSON text: an array of frame records.
pub fn parse_bundle_json(json: &str) -> Result<Vec<BundleRecord>, BundleFileError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses a bundle JSON file from disk.
pub fn read_bundle_file(path: &Path) -> Result<Vec<BundleRecord>, BundleFileError> {
    if !path.exists() {
        return Err(BundleFileError::NotFound(path.to_path_buf()));
    }
    let json = fs::read_to_string(path).map_err(|source| BundleFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bundle_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;
    use crate::shared::screen_color::ScreenColor;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use std::io::Cursor;

    fn png_base64() -> String {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 150, 120]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        STANDARD.encode(bytes)
    }

    #[test]
    fn test_empty_bundle_is_unknown_subject_with_no_frames() {
        let batch = BundleSource::load(Vec::new());
        assert_eq!(batch.wallet, "UNKNOWN");
        assert!(batch.is_empty());
    }

    #[test]
    fn test_wallet_comes_from_first_record_only() {
        let records = vec![
            BundleRecord::encoded(png_base64()),
            BundleRecord::encoded(png_base64()).with_wallet("0xsecond"),
        ];
        assert_eq!(BundleSource::load(records).wallet, "UNKNOWN");

        let records = vec![
            BundleRecord::encoded(png_base64()).with_wallet("0xfirst"),
            BundleRecord::encoded(png_base64()).with_wallet("0xsecond"),
        ];
        assert_eq!(BundleSource::load(records).wallet, "0xfirst");
    }

    #[test]
    fn test_screen_color_defaults_to_white_per_record() {
        let records = vec![
            BundleRecord::encoded(png_base64()),
            BundleRecord::encoded(png_base64()).with_screen_color(ScreenColor::Green),
        ];
        let batch = BundleSource::load(records);
        assert_eq!(batch.frames[0].screen_color, ScreenColor::White);
        assert_eq!(batch.frames[1].screen_color, ScreenColor::Green);
    }

    #[test]
    fn test_undecodable_image_leaves_empty_slot() {
        let records = vec![
            BundleRecord::encoded(png_base64()),
            BundleRecord::encoded("data:image/png;base64,@@@@"),
            BundleRecord::encoded(png_base64()),
        ];
        let batch = BundleSource::load(records);
        assert_eq!(batch.len(), 3);
        assert!(batch.frames[0].image.is_some());
        assert!(batch.frames[1].image.is_none());
        assert!(batch.frames[2].image.is_some());
    }

    #[test]
    fn test_decoded_frames_pass_through_with_position_index() {
        let frame = Frame::new(vec![1; 12], 2, 2, 3, 99);
        let batch = BundleSource::load(vec![
            BundleRecord::encoded("garbage"),
            BundleRecord::decoded(frame),
        ]);
        let image = batch.frames[1].image.as_ref().unwrap();
        assert_eq!(image.index(), 1);
        assert_eq!(image.data(), &[1; 12]);
    }

    #[test]
    fn test_read_bundle_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.json");
        let json = format!(
            r#"[{{"image": "{}", "screenColor": "RED", "wallet": "0xabc"}}, {{"image": "{}"}}]"#,
            png_base64(),
            png_base64()
        );
        fs::write(&path, json).unwrap();

        let batch = BundleSource::load(read_bundle_file(&path).unwrap());
        assert_eq!(batch.wallet, "0xabc");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.frames[0].screen_color, ScreenColor::Red);
        assert_eq!(batch.frames[1].screen_color, ScreenColor::White);
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_bundle_file(Path::new("/nonexistent/frames.json"));
        assert!(matches!(result, Err(BundleFileError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_json() {
        assert!(matches!(
            parse_bundle_json("{\"image\": 1"),
            Err(BundleFileError::Corrupt(_))
        ));
        assert!(matches!(
            parse_bundle_json("{\"image\": \"AAAA\"}"),
            Err(BundleFileError::Corrupt(_))
        ));
    }

    #[test]
    fn test_empty_json_array() {
        assert!(parse_bundle_json("[]").unwrap().is_empty());
    }
}
