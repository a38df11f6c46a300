pub mod bundle_record;
pub mod sampled_frame;
