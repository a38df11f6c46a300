use serde::Deserialize;

use crate::shared::frame::Frame;
use crate::shared::screen_color::ScreenColor;

/// Image payload of a bundle record: still encoded, or already decoded
/// by the caller.
#[derive(Clone, Debug)]
pub enum FrameImage {
    /// Base64 image bytes, optionally behind a `data:...;base64,` marker.
    Encoded(String),
    Decoded(Frame),
}

/// One record of a structured frame bundle.
///
/// Only the first record's `wallet` is consulted for the whole batch.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "RawBundleRecord")]
pub struct BundleRecord {
    pub image: FrameImage,
    pub screen_color: Option<ScreenColor>,
    pub wallet: Option<String>,
}

impl BundleRecord {
    pub fn encoded(image: impl Into<String>) -> Self {
        Self {
            image: FrameImage::Encoded(image.into()),
            screen_color: None,
            wallet: None,
        }
    }

    pub fn decoded(frame: Frame) -> Self {
        Self {
            image: FrameImage::Decoded(frame),
            screen_color: None,
            wallet: None,
        }
    }

    pub fn with_screen_color(mut self, color: ScreenColor) -> Self {
        self.screen_color = Some(color);
        self
    }

    pub fn with_wallet(mut self, wallet: impl Into<String>) -> Self {
        self.wallet = Some(wallet.into());
        self
    }
}

/// Wire shape of a record in a bundle JSON file.
#[derive(Deserialize)]
struct RawBundleRecord {
    #[serde(default)]
    image: Option<String>,
    #[serde(default, rename = "screenColor")]
    screen_color: Option<ScreenColor>,
    #[serde(default)]
    wallet: Option<String>,
}

impl From<RawBundleRecord> for BundleRecord {
    fn from(raw: RawBundleRecord) -> Self {
        // A record without an image decodes to nothing downstream.
        Self {
            image: FrameImage::Encoded(raw.image.unwrap_or_default()),
            screen_color: raw.screen_color,
            wallet: raw.wallet,
        }
    }
}
