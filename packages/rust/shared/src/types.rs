//! Core domain types for LeadGen runs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role personas offered by the dashboards.
pub const ROLE_PERSONAS: &[&str] = &[
    "Director of Toxicology",
    "Head of Preclinical Safety",
    "VP of In Vitro Biology",
    "Principal Investigator",
    "Chief Scientific Officer",
];

/// Scientific contexts offered by the dashboards.
pub const SCIENCE_CONTEXTS: &[&str] = &[
    "drug induced liver injury",
    "organ-on-chip",
    "hepatic spheroids",
    "predictive toxicology",
    "NASH / liver fibrosis",
    "cardiotoxicity",
];

/// Placeholder used for free-text fields a source could not supply.
pub const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for pipeline run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// LeadSource
// ---------------------------------------------------------------------------

/// Provenance tag of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadSource {
    /// Professional network search (LinkedIn-like).
    LinkedIn,
    /// Professional network search (Xing, curated profiles only).
    Xing,
    /// Literature search: corresponding authors of recent papers.
    PubMed,
}

impl LeadSource {
    /// Display label, as shown in the "Lead Source" column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinkedIn => "LinkedIn",
            Self::Xing => "Xing",
            Self::PubMed => "PubMed",
        }
    }

    /// Leads from the publication search are verified active researchers.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::PubMed)
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FundingStage
// ---------------------------------------------------------------------------

/// Funding stage of a lead's organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundingStage {
    #[serde(rename = "Seed")]
    Seed,
    #[serde(rename = "Series A")]
    SeriesA,
    #[serde(rename = "Series B")]
    SeriesB,
    #[serde(rename = "IPO")]
    Ipo,
    #[serde(rename = "Public")]
    Public,
    #[serde(rename = "Grant Funded")]
    GrantFunded,
    #[default]
    #[serde(rename = "Unknown")]
    Unknown,
}

impl FundingStage {
    /// Canonical label of the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seed => "Seed",
            Self::SeriesA => "Series A",
            Self::SeriesB => "Series B",
            Self::Ipo => "IPO",
            Self::Public => "Public",
            Self::GrantFunded => "Grant Funded",
            Self::Unknown => UNKNOWN,
        }
    }

    /// Parse a label exactly as the sources spell it.
    /// Returns `None` for anything outside the known set.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Seed" => Some(Self::Seed),
            "Series A" => Some(Self::SeriesA),
            "Series B" => Some(Self::SeriesB),
            "IPO" => Some(Self::Ipo),
            "Public" => Some(Self::Public),
            "Grant Funded" => Some(Self::GrantFunded),
            "Unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Parse a label, mapping unrecognized values to [`FundingStage::Unknown`].
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }

    /// Commercially ready stages (budget likely available).
    pub fn is_commercial(&self) -> bool {
        matches!(self, Self::SeriesA | Self::SeriesB | Self::Ipo | Self::Public)
    }

    /// Stages counted by the "Funding Qualified" metric.
    pub fn is_funding_qualified(&self) -> bool {
        matches!(self, Self::SeriesA | Self::SeriesB | Self::Ipo)
    }
}

impl fmt::Display for FundingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Lead
// ---------------------------------------------------------------------------

/// Canonical prospect record, one per person, created fresh each run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Display name.
    pub name: String,
    /// Free-text job title (`"Unknown"` when the source had none).
    pub title: String,
    /// Organization name.
    pub company: String,
    /// Person location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Organization HQ location (`"Unknown"` when the source had none).
    pub headquarters: String,
    /// Provenance tag.
    pub source: LeadSource,
    /// Funding stage; `None` until enriched.
    pub funding_stage: Option<FundingStage>,
}

// ---------------------------------------------------------------------------
// Features & scoring
// ---------------------------------------------------------------------------

/// Numeric features derived from a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Seniority signal from the title, in `1..=3`.
    pub role_score: u8,
    /// Commercial readiness of the funding stage, in `1..=3`.
    pub funding_score: u8,
    /// 1 when the HQ sits in a biotech hub, else 0.
    pub hub_flag: u8,
}

impl FeatureVector {
    /// Number of features the classifier sees.
    pub const LEN: usize = 3;

    pub fn new(role_score: u8, funding_score: u8, hub_flag: u8) -> Self {
        Self {
            role_score,
            funding_score,
            hub_flag,
        }
    }

    /// Features in classifier column order.
    pub fn to_array(self) -> [f64; Self::LEN] {
        [
            f64::from(self.role_score),
            f64::from(self.funding_score),
            f64::from(self.hub_flag),
        ]
    }
}

/// Fit bucket derived from the propensity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitCategory {
    High,
    Medium,
    Low,
}

impl FitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// The action that goes with this bucket.
    pub fn recommended_action(self) -> RecommendedAction {
        match self {
            Self::High => RecommendedAction::HighPriorityOutreach,
            Self::Medium => RecommendedAction::WarmLead,
            Self::Low => RecommendedAction::Monitor,
        }
    }
}

impl fmt::Display for FitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sales follow-up recommended for a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendedAction {
    #[serde(rename = "High Priority Outreach")]
    HighPriorityOutreach,
    #[serde(rename = "Warm Lead")]
    WarmLead,
    #[serde(rename = "Monitor")]
    Monitor,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighPriorityOutreach => "High Priority Outreach",
            Self::WarmLead => "Warm Lead",
            Self::Monitor => "Monitor",
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the lead has published recently on a high-intent topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecentPublication {
    /// Sourced from the publication search itself.
    Verified,
    /// Science context matches a high-intent topic.
    Yes,
    No,
}

impl RecentPublication {
    /// Label shown in the "Active Researcher?" column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Verified => "YES (Verified Source)",
            Self::Yes => "Yes (≤12 months)",
            Self::No => "No",
        }
    }
}

impl fmt::Display for RecentPublication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A lead with its features, score and annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLead {
    #[serde(flatten)]
    pub lead: Lead,
    #[serde(flatten)]
    pub features: FeatureVector,
    /// Propensity to collaborate, in `[0, 100]`.
    pub propensity_score: f64,
    pub fit_category: FitCategory,
    pub recommended_action: RecommendedAction,
    pub recent_publication: RecentPublication,
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Headline metrics shown above the ranked table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total prospects.
    pub total: usize,
    /// Leads scoring strictly above 80.
    pub hot_leads: usize,
    /// Leads sourced from the publication search.
    pub verified: usize,
    /// Leads at Series A, Series B or IPO.
    pub funding_qualified: usize,
}

/// Everything a presentation layer needs after one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub role_input: String,
    pub science_context: String,
    /// Ranked leads, highest score first.
    pub leads: Vec<ScoredLead>,
    pub summary: RunSummary,
    /// Raw records dropped for schema violations.
    pub dropped_records: usize,
    /// Leads contributed by the publication search.
    pub publication_leads: usize,
    /// Wall-clock time of the run in milliseconds.
    pub elapsed_ms: u64,
}
