pub mod pipeline_config;
pub mod score_accumulator;
pub mod verdict_builder;
pub mod verify_liveness_use_case;
