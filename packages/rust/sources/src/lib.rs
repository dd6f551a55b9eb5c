//! Lead sources: adapter traits, native record schemas and the PubMed client.
//!
//! This crate provides:
//! - [`adapters`]: `CandidateSource`, `FundingLookup` and `PublicationSearch`
//!   traits plus the mock network and funding adapters
//! - [`records`]: the raw per-source schemas wrapped in [`RawRecord`]
//! - [`pubmed`]: E-utilities client implementing `PublicationSearch`

pub mod adapters;
pub mod pubmed;
pub mod records;

pub use adapters::{
    CandidateFilters, CandidateSource, FundingInfo, FundingLookup, MockCandidateSource,
    MockFundingLookup, PublicationSearch,
};
pub use pubmed::{ParsedArticles, PubMedClient, parse_efetch};
pub use records::{RawAuthor, RawCandidate, RawRecord};
