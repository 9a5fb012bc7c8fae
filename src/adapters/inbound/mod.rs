mod jsonl_pipeline;

pub use jsonl_pipeline::{JsonLinesPipeline, PipelineStats};
