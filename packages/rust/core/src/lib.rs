//! Core pipeline orchestration and domain logic for LeadGen.
//!
//! This crate turns raw source records into a ranked lead list:
//! normalization, funding enrichment, feature extraction, random-forest
//! scoring and ranking, tied together by [`pipeline::run_pipeline`].

pub mod enrichment;
pub mod features;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub mod scoring;

pub use pipeline::{
    PipelinePhase, ProgressReporter, RunRequest, SilentProgress, Sources, run_pipeline,
};
