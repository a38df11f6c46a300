pub mod stdio_frame_analyzer;
