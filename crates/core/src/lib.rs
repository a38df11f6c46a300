pub mod analysis;
pub mod detection;
pub mod ingress;
pub mod pipeline;
pub mod shared;
pub mod video;
