pub mod analysis_result;
pub mod forehead_roi;
pub mod frame_analyzer;
