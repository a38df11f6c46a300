pub mod constants;
pub mod frame;
pub mod region;
pub mod screen_color;
pub mod video_metadata;
