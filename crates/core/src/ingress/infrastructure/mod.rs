pub mod bundle_source;
pub mod image_decoder;
pub mod video_source;
