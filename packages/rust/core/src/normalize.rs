//! Raw source records → canonical [`Lead`].

use leadgen_shared::{FundingStage, Lead, LeadGenError, LeadSource, Result, UNKNOWN};
use leadgen_sources::{RawAuthor, RawCandidate, RawRecord};
use tracing::warn;

/// Title given to every publication author.
pub const AUTHOR_TITLE: &str = "Principal Investigator (Author)";

/// Location given to every publication author.
pub const AUTHOR_LOCATION: &str = "Global / Academic";

/// Company used when an author has no usable affiliation.
pub const UNKNOWN_INSTITUTE: &str = "Unknown Institute";

/// Map one raw record onto a [`Lead`].
///
/// Fails with [`LeadGenError::Schema`] when the record has no name or
/// no company.
pub fn normalize(record: RawRecord) -> Result<Lead> {
    match record {
        RawRecord::Candidate(candidate) => normalize_candidate(candidate),
        RawRecord::Author(author) => normalize_author(author),
    }
}

/// Normalize a batch, dropping records that fail the schema check.
///
/// Returns the leads in input order and the number of dropped records.
pub fn normalize_all(records: impl IntoIterator<Item = RawRecord>) -> (Vec<Lead>, usize) {
    let mut leads = Vec::new();
    let mut dropped = 0;

    for record in records {
        let source = record.source();
        match normalize(record) {
            Ok(lead) => leads.push(lead),
            Err(e) => {
                warn!(%source, error = %e, "dropping record");
                dropped += 1;
            }
        }
    }

    (leads, dropped)
}

fn normalize_candidate(raw: RawCandidate) -> Result<Lead> {
    let provenance = raw.source.as_str();
    let name = required(raw.name, "name", provenance)?;
    let company = required(raw.company, "company", provenance)?;

    // Blank means "not yet known" and is left for enrichment.
    let funding_stage = raw
        .funding_stage
        .filter(|s| !s.trim().is_empty())
        .map(|s| FundingStage::from_label(&s));

    Ok(Lead {
        name,
        title: or_unknown(raw.title),
        company,
        location: raw.location,
        headquarters: or_unknown(raw.hq),
        source: raw.source,
        funding_stage,
    })
}

fn normalize_author(raw: RawAuthor) -> Result<Lead> {
    let name = required(raw.name, "name", LeadSource::PubMed.as_str())?;

    Ok(Lead {
        name,
        title: AUTHOR_TITLE.into(),
        company: institute(raw.affiliation.as_deref()),
        location: Some(AUTHOR_LOCATION.into()),
        headquarters: UNKNOWN.into(),
        source: LeadSource::PubMed,
        funding_stage: Some(FundingStage::GrantFunded),
    })
}

/// First comma-separated segment of an affiliation line.
fn institute(affiliation: Option<&str>) -> String {
    affiliation
        .and_then(|a| a.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != UNKNOWN)
        .unwrap_or(UNKNOWN_INSTITUTE)
        .to_string()
}

fn required(value: Option<String>, field: &'static str, provenance: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(LeadGenError::schema(field, provenance)),
    }
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
