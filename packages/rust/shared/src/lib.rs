//! Shared types, error model, and configuration for LeadGen.
//!
//! This crate is the foundation depended on by all other LeadGen crates.
//! It provides:
//! - [`LeadGenError`]: the unified error type
//! - Domain types ([`Lead`], [`FeatureVector`], [`ScoredLead`], [`RunReport`])
//! - Configuration ([`AppConfig`], [`PipelineConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, EnrichmentSettings, PipelineConfig, PubMedConfig,
    ScoringSettings, config_dir, config_file_path, init_config, load_config, load_config_from,
    validate_config,
};
pub use error::{LeadGenError, Result};
pub use types::{
    FeatureVector, FitCategory, FundingStage, Lead, LeadSource, ROLE_PERSONAS,
    RecentPublication, RecommendedAction, RunId, RunReport, RunSummary, SCIENCE_CONTEXTS,
    ScoredLead, UNKNOWN,
};
