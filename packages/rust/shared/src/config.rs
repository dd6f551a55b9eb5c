//! Application configuration for LeadGen.
//!
//! User config lives at `~/.leadgen/leadgen.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{LeadGenError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "leadgen.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".leadgen";

// ---------------------------------------------------------------------------
// Config structs (matching leadgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Dashboard defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// PubMed E-utilities settings.
    #[serde(default)]
    pub pubmed: PubMedConfig,

    /// Funding enrichment settings.
    #[serde(default)]
    pub enrichment: EnrichmentSettings,

    /// Classifier settings.
    #[serde(default)]
    pub scoring: ScoringSettings,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Role persona used when none is given.
    #[serde(default = "default_role_persona")]
    pub role_persona: String,

    /// Scientific context used when none is given.
    #[serde(default = "default_science_context")]
    pub science_context: String,

    /// Number of candidate profiles requested from the network search.
    #[serde(default = "default_candidate_count")]
    pub candidate_count: usize,

    /// Seed for the candidate generator. Unset means a fresh draw every run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_seed: Option<u64>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            role_persona: default_role_persona(),
            science_context: default_science_context(),
            candidate_count: default_candidate_count(),
            candidate_seed: None,
        }
    }
}

fn default_role_persona() -> String {
    "Director of Toxicology".into()
}
fn default_science_context() -> String {
    "drug induced liver injury".into()
}
fn default_candidate_count() -> usize {
    25
}

/// `[pubmed]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubMedConfig {
    /// Whether the publication search runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// E-utilities root; `esearch.fcgi` and `efetch.fcgi` are resolved against it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `tool` etiquette parameter.
    #[serde(default = "default_tool")]
    pub tool: String,

    /// `email` etiquette parameter required by NCBI.
    #[serde(default = "default_email")]
    pub email: String,

    /// Maximum number of articles fetched per search.
    #[serde(default = "default_retmax")]
    pub retmax: u32,

    /// Publication date window in months.
    #[serde(default = "default_max_months")]
    pub max_months: u32,

    /// Per-request timeout.
    #[serde(default = "default_pubmed_timeout")]
    pub timeout_secs: u64,

    /// Attempts per request when the failure is retryable.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PubMedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            tool: default_tool(),
            email: default_email(),
            retmax: default_retmax(),
            max_months: default_max_months(),
            timeout_secs: default_pubmed_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_base_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/".into()
}
fn default_tool() -> String {
    "lead_gen_bot".into()
}
fn default_email() -> String {
    "demo@example.com".into()
}
fn default_retmax() -> u32 {
    5
}
fn default_max_months() -> u32 {
    12
}
fn default_pubmed_timeout() -> u64 {
    10
}
fn default_max_attempts() -> u32 {
    2
}

/// `[enrichment]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentSettings {
    /// Time budget per funding lookup.
    #[serde(default = "default_lookup_timeout")]
    pub timeout_secs: u64,

    /// Attempts per lookup when the failure is retryable.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_lookup_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_lookup_timeout() -> u64 {
    5
}

/// `[scoring]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSettings {
    /// Trees in the forest.
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,

    /// RNG seed for bootstrap sampling and feature draws.
    #[serde(default = "default_scoring_seed")]
    pub seed: u64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            seed: default_scoring_seed(),
        }
    }
}

fn default_n_estimators() -> usize {
    100
}
fn default_scoring_seed() -> u64 {
    42
}

// ---------------------------------------------------------------------------
// Pipeline config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime pipeline configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Candidate profiles requested from the network search.
    pub candidate_count: usize,
    /// Seed for the candidate generator.
    pub candidate_seed: Option<u64>,
    /// Whether to query the publication search.
    pub publications_enabled: bool,
    /// Publication date window in months.
    pub max_months: u32,
    /// Time budget per funding lookup.
    pub lookup_timeout: Duration,
    /// Attempts per funding lookup.
    pub lookup_attempts: u32,
    /// Trees in the scoring forest.
    pub n_estimators: usize,
    /// Scoring RNG seed.
    pub scoring_seed: u64,
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            candidate_count: config.defaults.candidate_count,
            candidate_seed: config.defaults.candidate_seed,
            publications_enabled: config.pubmed.enabled,
            max_months: config.pubmed.max_months,
            lookup_timeout: Duration::from_secs(config.enrichment.timeout_secs),
            lookup_attempts: config.enrichment.max_attempts,
            n_estimators: config.scoring.n_estimators,
            scoring_seed: config.scoring.seed,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.leadgen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LeadGenError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.leadgen/leadgen.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LeadGenError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        LeadGenError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LeadGenError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LeadGenError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LeadGenError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject settings the pipeline cannot run with.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    Url::parse(&config.pubmed.base_url).map_err(|e| {
        LeadGenError::config(format!(
            "pubmed.base_url '{}' is not a valid URL: {e}",
            config.pubmed.base_url
        ))
    })?;

    if config.scoring.n_estimators == 0 {
        return Err(LeadGenError::config("scoring.n_estimators must be at least 1"));
    }
    if config.pubmed.max_attempts == 0 || config.enrichment.max_attempts == 0 {
        return Err(LeadGenError::config("max_attempts must be at least 1"));
    }

    Ok(())
}
