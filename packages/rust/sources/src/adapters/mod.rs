//! Source adapter traits and the built-in mock adapters.
//!
//! The pipeline talks to three collaborators, each behind its own trait:
//! a candidate search, a funding lookup and a publication search. The mock
//! adapters here stand in for the commercial APIs; the publication search is
//! backed by the real PubMed client in [`crate::pubmed`].

mod funding;
mod linkedin;

use std::future::Future;

use leadgen_shared::Result;

use crate::records::{RawAuthor, RawCandidate};

pub use funding::MockFundingLookup;
pub use linkedin::MockCandidateSource;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Filters forwarded to the candidate search.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilters {
    /// Job titles of interest.
    pub job_titles: Vec<String>,
    /// Locations of interest.
    pub locations: Vec<String>,
}

/// Funding answer for one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingInfo {
    /// Stage label, e.g. `"Series A"`.
    pub stage: String,
    /// Budget status, e.g. `"Cash Ready"`.
    pub status: String,
}

/// Searches a professional network for candidate profiles.
pub trait CandidateSource: Send + Sync {
    /// Return candidate profiles matching `filters`.
    fn search_candidates(
        &self,
        filters: &CandidateFilters,
    ) -> impl Future<Output = Result<Vec<RawCandidate>>> + Send;

    /// Human-readable adapter name for tracing.
    fn name(&self) -> &str;
}

/// Looks up the funding stage of a company.
pub trait FundingLookup: Send + Sync {
    fn lookup_funding(&self, company: &str) -> impl Future<Output = Result<FundingInfo>> + Send;
}

/// Finds authors who recently published on a topic.
pub trait PublicationSearch: Send + Sync {
    /// Search publications matching `keywords` from the last `max_months`.
    fn search_publications(
        &self,
        keywords: &str,
        max_months: u32,
    ) -> impl Future<Output = Result<Vec<RawAuthor>>> + Send;
}
