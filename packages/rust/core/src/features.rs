//! Per-lead feature extraction.

use leadgen_shared::{FeatureVector, FundingStage, Lead, UNKNOWN};

/// Title keywords scoring 3.
const EXECUTIVE_KEYWORDS: &[&str] = &["vp", "head", "chief"];

/// Title keywords scoring 2.
const SENIOR_KEYWORDS: &[&str] = &["director", "principal", "investigator"];

/// Biotech hubs. Matched case-sensitively as substrings of the HQ.
pub const BIOTECH_HUBS: &[&str] = &["Cambridge", "Boston", "Basel", "San Fran"];

/// Seniority signal from a job title, in `1..=3`.
pub fn role_score(title: &str) -> u8 {
    let title = title.to_lowercase();
    if EXECUTIVE_KEYWORDS.iter().any(|k| title.contains(k)) {
        3
    } else if SENIOR_KEYWORDS.iter().any(|k| title.contains(k)) {
        2
    } else {
        1
    }
}

/// Commercial readiness of a funding stage, in `1..=3`.
pub fn funding_score(stage: Option<FundingStage>) -> u8 {
    match stage.unwrap_or_default() {
        FundingStage::SeriesA | FundingStage::SeriesB | FundingStage::Ipo | FundingStage::Public => 3,
        FundingStage::Seed => 2,
        FundingStage::GrantFunded | FundingStage::Unknown => 1,
    }
}

/// 1 when the headquarters sits in a known biotech hub.
pub fn hub_flag(headquarters: &str) -> u8 {
    let hq = if headquarters == UNKNOWN { "" } else { headquarters };
    u8::from(BIOTECH_HUBS.iter().any(|hub| hq.contains(hub)))
}

/// Build the full feature vector for a lead.
pub fn build_features(lead: &Lead) -> FeatureVector {
    FeatureVector::new(
        role_score(&lead.title),
        funding_score(lead.funding_stage),
        hub_flag(&lead.headquarters),
    )
}

#[cfg(test)]
mod tests {
    use leadgen_shared::LeadSource;

    use super::*;

    #[test]
    fn role_scores() {
        assert_eq!(role_score("VP of Preclinical Safety"), 3);
        assert_eq!(role_score("Head of Safety Assessment"), 3);
        assert_eq!(role_score("Chief Scientific Officer"), 3);
        assert_eq!(role_score("Director of Toxicology"), 2);
        assert_eq!(role_score("Principal Investigator (Author)"), 2);
        assert_eq!(role_score("Senior Scientist"), 1);
        assert_eq!(role_score("Research Associate"), 1);
        assert_eq!(role_score(""), 1);
    }

    #[test]
    fn role_score_is_substring_based() {
        // "vp" inside another word still counts.
        assert_eq!(role_score("SVP Operations"), 3);
        assert_eq!(role_score("DIRECTOR"), 2);
    }

    #[test]
    fn funding_scores() {
        assert_eq!(funding_score(Some(FundingStage::SeriesA)), 3);
        assert_eq!(funding_score(Some(FundingStage::Public)), 3);
        assert_eq!(funding_score(Some(FundingStage::Seed)), 2);
        assert_eq!(funding_score(Some(FundingStage::GrantFunded)), 1);
        assert_eq!(funding_score(Some(FundingStage::Unknown)), 1);
        assert_eq!(funding_score(None), 1);
    }

    #[test]
    fn hub_matching_is_case_sensitive() {
        assert_eq!(hub_flag("Cambridge, MA"), 1);
        assert_eq!(hub_flag("San Francisco, CA"), 1);
        assert_eq!(hub_flag("Basel, Switzerland"), 1);
        assert_eq!(hub_flag("cambridge, ma"), 0);
        assert_eq!(hub_flag("San Diego, CA"), 0);
        assert_eq!(hub_flag(UNKNOWN), 0);
        assert_eq!(hub_flag(""), 0);
    }

    #[test]
    fn features_stay_in_range() {
        let titles = ["VP", "Director", "Intern", "", "chief of staff"];
        let stages = [
            None,
            Some(FundingStage::Seed),
            Some(FundingStage::Ipo),
            Some(FundingStage::GrantFunded),
        ];
        let hqs = ["Boston, MA", "Unknown", "Tokyo"];

        for title in titles {
            for stage in stages {
                for hq in hqs {
                    let lead = Lead {
                        name: "X".into(),
                        title: title.into(),
                        company: "Y".into(),
                        location: None,
                        headquarters: hq.into(),
                        source: LeadSource::LinkedIn,
                        funding_stage: stage,
                    };
                    let f = build_features(&lead);
                    assert!((1..=3).contains(&f.role_score));
                    assert!((1..=3).contains(&f.funding_score));
                    assert!(f.hub_flag <= 1);
                }
            }
        }
    }
}
