//! Native record schemas returned by the source adapters.
//!
//! Each source keeps its own shape; the normalizer in `leadgen-core` maps
//! every variant of [`RawRecord`] onto the canonical `Lead`.

use leadgen_shared::LeadSource;
use serde::{Deserialize, Serialize};

/// One raw record, tagged by the schema it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawRecord {
    /// Professional-network profile.
    Candidate(RawCandidate),
    /// Publication author.
    Author(RawAuthor),
}

impl RawRecord {
    /// Provenance of the record, for logs and error messages.
    pub fn source(&self) -> LeadSource {
        match self {
            Self::Candidate(c) => c.source,
            Self::Author(_) => LeadSource::PubMed,
        }
    }
}

impl From<RawCandidate> for RawRecord {
    fn from(candidate: RawCandidate) -> Self {
        Self::Candidate(candidate)
    }
}

impl From<RawAuthor> for RawRecord {
    fn from(author: RawAuthor) -> Self {
        Self::Author(author)
    }
}

/// Profile returned by the network candidate search.
///
/// Every field is optional on the wire; required ones are checked during
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Organization headquarters.
    #[serde(default)]
    pub hq: Option<String>,
    pub source: LeadSource,
    /// Coarse seniority label attached by the network.
    #[serde(default)]
    pub seniority: Option<String>,
    /// Funding stage, when the profile already carries one.
    #[serde(default)]
    pub funding_stage: Option<String>,
}

/// Last author of a recent article, as parsed from the literature search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAuthor {
    /// `ForeName LastName`; `None` when both parts were missing.
    pub name: Option<String>,
    pub paper_title: String,
    pub journal: String,
    /// First affiliation line of the author, if any.
    #[serde(default)]
    pub affiliation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_deserializes_with_missing_fields() {
        let json = r#"{"kind":"candidate","name":"Dr. Emily Ross","source":"LinkedIn"}"#;
        let record: RawRecord = serde_json::from_str(json).expect("deserialize");
        match record {
            RawRecord::Candidate(c) => {
                assert_eq!(c.name.as_deref(), Some("Dr. Emily Ross"));
                assert!(c.company.is_none());
                assert!(c.funding_stage.is_none());
            }
            RawRecord::Author(_) => panic!("expected candidate"),
        }
    }

    #[test]
    fn author_records_are_pubmed() {
        let record = RawRecord::from(RawAuthor {
            name: Some("Jane Doe".into()),
            paper_title: "Liver-on-chip".into(),
            journal: "Lab Chip".into(),
            affiliation: None,
        });
        assert_eq!(record.source(), LeadSource::PubMed);
    }
}
