//! Ranking and annotation of scored leads.

use leadgen_shared::{
    FeatureVector, FitCategory, Lead, RecentPublication, RecommendedAction, RunSummary, ScoredLead,
};

/// Score thresholds checked in order; below all of them is `Low`.
pub const FIT_THRESHOLDS: &[(f64, FitCategory)] = &[(80.0, FitCategory::High), (60.0, FitCategory::Medium)];

/// Scores strictly above this count as hot leads in the summary.
pub const HOT_LEAD_SCORE: f64 = 80.0;

/// Science topics treated as recently published in.
pub const PUBLISHED_TOPICS: &[&str] = &["drug induced liver injury", "hepatic", "organ-on-chip", "NASH"];

/// Fit bucket for a propensity score.
pub fn fit_category(score: f64) -> FitCategory {
    FIT_THRESHOLDS
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map_or(FitCategory::Low, |(_, category)| *category)
}

/// Next step for a propensity score, derived from its fit bucket.
pub fn recommended_action(score: f64) -> RecommendedAction {
    fit_category(score).recommended_action()
}

/// Recent-publication flag for a lead in the given science context.
pub fn recent_publication(lead: &Lead, science_context: &str) -> RecentPublication {
    if lead.source.is_verified() {
        return RecentPublication::Verified;
    }

    let context = science_context.to_lowercase();
    if PUBLISHED_TOPICS
        .iter()
        .any(|topic| context.contains(&topic.to_lowercase()))
    {
        RecentPublication::Yes
    } else {
        RecentPublication::No
    }
}

/// Combine a lead with its features and score.
pub fn annotate(lead: Lead, features: FeatureVector, score: f64, science_context: &str) -> ScoredLead {
    let fit_category = fit_category(score);
    let recent_publication = recent_publication(&lead, science_context);
    ScoredLead {
        lead,
        features,
        propensity_score: score,
        fit_category,
        recommended_action: fit_category.recommended_action(),
        recent_publication,
    }
}

/// Sort by propensity score, highest first. Equal scores keep input order.
pub fn sort(leads: &mut [ScoredLead]) {
    leads.sort_by(|a, b| b.propensity_score.total_cmp(&a.propensity_score));
}

/// Dashboard metrics for a ranked list.
pub fn summarize(leads: &[ScoredLead]) -> RunSummary {
    RunSummary {
        total: leads.len(),
        hot_leads: leads
            .iter()
            .filter(|l| l.propensity_score > HOT_LEAD_SCORE)
            .count(),
        verified: leads.iter().filter(|l| l.lead.source.is_verified()).count(),
        funding_qualified: leads
            .iter()
            .filter(|l| l.lead.funding_stage.is_some_and(|s| s.is_funding_qualified()))
            .count(),
    }
}
