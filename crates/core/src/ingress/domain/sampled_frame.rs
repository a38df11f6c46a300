use crate::shared::frame::Frame;
use crate::shared::screen_color::ScreenColor;

/// One entry of a frame batch: a decoded image (if decoding succeeded)
/// plus the screen-colour hint the engine needs for that frame.
#[derive(Clone, Debug)]
pub struct SampledFrame {
    pub image: Option<Frame>,
    pub screen_color: ScreenColor,
}

impl SampledFrame {
    pub fn new(image: Frame, screen_color: ScreenColor) -> Self {
        Self {
            image: Some(image),
            screen_color,
        }
    }

    /// A frame whose image could not be decoded. Kept in the batch so
    /// frame counts stay faithful to the ingress payload.
    pub fn undecodable(screen_color: ScreenColor) -> Self {
        Self {
            image: None,
            screen_color,
        }
    }
}

/// The unified output of both frame source adapters.
#[derive(Clone, Debug)]
pub struct FrameBatch {
    pub wallet: String,
    pub frames: Vec<SampledFrame>,
}

impl FrameBatch {
    pub fn new(wallet: impl Into<String>, frames: Vec<SampledFrame>) -> Self {
        Self {
            wallet: wallet.into(),
            frames,
        }
    }

    pub fn empty(wallet: impl Into<String>) -> Self {
        Self::new(wallet, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
