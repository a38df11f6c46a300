use super::screen_color::ScreenColor;

/// Subject identifier used when the ingress payload carries none.
pub const UNKNOWN_WALLET: &str = "UNKNOWN";

/// Prefix of every generated session identifier.
pub const SESSION_PREFIX: &str = "sess_";

/// Screen-colour hint for bundle records that omit one.
pub const BUNDLE_DEFAULT_SCREEN_COLOR: ScreenColor = ScreenColor::White;

/// Screen-colour hint applied to video uploads that omit one.
pub const VIDEO_DEFAULT_SCREEN_COLOR: ScreenColor = ScreenColor::Red;

pub const BLAZEFACE_MODEL_NAME: &str = "blazeface.onnx";

/// Directory name under the platform config/cache roots.
pub const APP_DIR_NAME: &str = "PrismLiveness";
