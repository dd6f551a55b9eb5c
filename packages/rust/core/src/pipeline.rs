//! End-to-end lead pipeline: sources → normalize → enrich → features → score → rank.

use std::fmt;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument, warn};

use leadgen_shared::{PipelineConfig, Result, RunId, RunReport, ScoredLead};
use leadgen_sources::{
    CandidateFilters, CandidateSource, FundingLookup, PublicationSearch, RawRecord,
};

use crate::enrichment::{self, EnrichmentProgress, LookupPolicy};
use crate::features::build_features;
use crate::normalize::normalize_all;
use crate::rank;
use crate::scoring;

/// Inputs chosen by the user for one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Target role persona, e.g. "Director of Toxicology".
    pub role_input: String,
    /// Scientific context, used as the publication search keywords.
    pub science_context: String,
}

impl RunRequest {
    pub fn new(role_input: impl Into<String>, science_context: impl Into<String>) -> Self {
        Self {
            role_input: role_input.into(),
            science_context: science_context.into(),
        }
    }
}

/// The three collaborators a run talks to.
pub struct Sources<'a, C, F, P> {
    pub candidates: &'a C,
    pub funding: &'a F,
    pub publications: &'a P,
}

// Manual impls: a derive would require the adapters themselves to be `Copy`.
impl<C, F, P> Clone for Sources<'_, C, F, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, F, P> Copy for Sources<'_, C, F, P> {}

/// Pipeline stage, reported as each one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    CandidateSearch,
    PublicationSearch,
    Merge,
    Enrichment,
    Scoring,
    Done,
}

impl PipelinePhase {
    /// Short status line for progress displays.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CandidateSearch => "Querying candidate network",
            Self::PublicationSearch => "Querying PubMed for recent authors",
            Self::Merge => "Merging business and scientific datasets",
            Self::Enrichment => "Enriching funding data",
            Self::Scoring => "Scoring leads",
            Self::Done => "Pipeline complete",
        }
    }

    /// Rough completion percentage when the phase starts.
    pub fn percent(&self) -> u16 {
        match self {
            Self::CandidateSearch => 0,
            Self::PublicationSearch => 20,
            Self::Merge => 50,
            Self::Enrichment => 55,
            Self::Scoring => 75,
            Self::Done => 100,
        }
    }
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, phase: PipelinePhase);
    /// Called after each funding lookup.
    fn lead_enriched(&self, current: usize, total: usize, company: &str);
    /// Called when the pipeline completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _phase: PipelinePhase) {}
    fn lead_enriched(&self, _current: usize, _total: usize, _company: &str) {}
    fn done(&self, _report: &RunReport) {}
}

/// Run the full lead pipeline.
///
/// 1. Candidate search (failure → no candidates)
/// 2. Publication search (failure → no authors)
/// 3. Normalize and merge, dropping records without name or company
/// 4. Enrich missing funding stages
/// 5. Build features and score
/// 6. Annotate, sort and summarize
///
/// Only scoring can fail the run, when no lead survives to be scored.
#[instrument(skip_all, fields(role = %request.role_input, science = %request.science_context))]
pub async fn run_pipeline<C, F, P>(
    request: &RunRequest,
    sources: Sources<'_, C, F, P>,
    config: &PipelineConfig,
    progress: &dyn ProgressReporter,
) -> Result<RunReport>
where
    C: CandidateSource,
    F: FundingLookup,
    P: PublicationSearch,
{
    let start = Instant::now();
    let started_at = Utc::now();
    let run_id = RunId::new();

    info!(%run_id, "starting lead pipeline");

    // --- Phase 1: Candidate search ---
    progress.phase(PipelinePhase::CandidateSearch);
    let filters = CandidateFilters {
        job_titles: vec![request.role_input.clone()],
        locations: Vec::new(),
    };
    let candidates = match sources.candidates.search_candidates(&filters).await {
        Ok(found) => found,
        Err(e) => {
            warn!(source = sources.candidates.name(), error = %e, "candidate search failed, continuing without candidates");
            Vec::new()
        }
    };

    // --- Phase 2: Publication search ---
    progress.phase(PipelinePhase::PublicationSearch);
    let authors = if config.publications_enabled {
        match sources
            .publications
            .search_publications(&request.science_context, config.max_months)
            .await
        {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "publication search failed, continuing without authors");
                Vec::new()
            }
        }
    } else {
        info!("publication search disabled");
        Vec::new()
    };

    // --- Phase 3: Normalize & merge ---
    progress.phase(PipelinePhase::Merge);
    let records = candidates
        .into_iter()
        .map(RawRecord::from)
        .chain(authors.into_iter().map(RawRecord::from));
    let (mut leads, dropped_records) = normalize_all(records);
    let publication_leads = leads.iter().filter(|l| l.source.is_verified()).count();

    info!(
        leads = leads.len(),
        publication_leads, dropped_records, "records merged"
    );

    // --- Phase 4: Enrichment ---
    progress.phase(PipelinePhase::Enrichment);
    let enrich_progress = PipelineEnrichmentProgress { inner: progress };
    enrichment::enrich(
        &mut leads,
        sources.funding,
        LookupPolicy::from(config),
        &enrich_progress,
    )
    .await;

    // --- Phase 5: Features & scoring ---
    progress.phase(PipelinePhase::Scoring);
    let features: Vec<_> = leads.iter().map(build_features).collect();
    let scores = scoring::score(&features, config.n_estimators, config.scoring_seed)?;

    // --- Phase 6: Annotate & rank ---
    let mut ranked: Vec<ScoredLead> = leads
        .into_iter()
        .zip(features)
        .zip(scores)
        .map(|((lead, f), score)| rank::annotate(lead, f, score, &request.science_context))
        .collect();
    rank::sort(&mut ranked);
    let summary = rank::summarize(&ranked);

    let report = RunReport {
        run_id,
        started_at,
        role_input: request.role_input.clone(),
        science_context: request.science_context.clone(),
        leads: ranked,
        summary,
        dropped_records,
        publication_leads,
        elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    };

    progress.phase(PipelinePhase::Done);
    progress.done(&report);

    info!(
        run_id = %report.run_id,
        total = report.summary.total,
        hot_leads = report.summary.hot_leads,
        elapsed_ms = report.elapsed_ms,
        "lead pipeline complete"
    );

    Ok(report)
}

// ---------------------------------------------------------------------------
// Enrichment progress adapter
// ---------------------------------------------------------------------------

/// Adapts a `ProgressReporter` to the `EnrichmentProgress` interface.
struct PipelineEnrichmentProgress<'a> {
    inner: &'a dyn ProgressReporter,
}

impl EnrichmentProgress for PipelineEnrichmentProgress<'_> {
    fn lookup_progress(&self, current: usize, total: usize, company: &str) {
        self.inner.lead_enriched(current, total, company);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use leadgen_shared::{
        FitCategory, FundingStage, LeadGenError, LeadSource, RecentPublication, RecommendedAction,
    };
    use leadgen_sources::{FundingInfo, MockCandidateSource, MockFundingLookup, RawAuthor, RawCandidate};

    use super::*;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    struct FixedCandidates(Vec<RawCandidate>);

    impl CandidateSource for FixedCandidates {
        async fn search_candidates(&self, _filters: &CandidateFilters) -> Result<Vec<RawCandidate>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingCandidates;

    impl CandidateSource for FailingCandidates {
        async fn search_candidates(&self, _filters: &CandidateFilters) -> Result<Vec<RawCandidate>> {
            Err(LeadGenError::Network("network down".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct FixedAuthors(Vec<RawAuthor>);

    impl PublicationSearch for FixedAuthors {
        async fn search_publications(&self, _keywords: &str, _max_months: u32) -> Result<Vec<RawAuthor>> {
            Ok(self.0.clone())
        }
    }

    struct FailingPublications;

    impl PublicationSearch for FailingPublications {
        async fn search_publications(&self, _keywords: &str, _max_months: u32) -> Result<Vec<RawAuthor>> {
            Err(LeadGenError::timeout("esearch", 10))
        }
    }

    struct FailingFunding;

    impl FundingLookup for FailingFunding {
        async fn lookup_funding(&self, company: &str) -> Result<FundingInfo> {
            Err(LeadGenError::lookup(company, "service unavailable"))
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<PipelinePhase>>,
        enriched: Mutex<usize>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, phase: PipelinePhase) {
            self.phases.lock().unwrap().push(phase);
        }

        fn lead_enriched(&self, _current: usize, _total: usize, _company: &str) {
            *self.enriched.lock().unwrap() += 1;
        }

        fn done(&self, _report: &RunReport) {}
    }

    fn candidate(name: &str, title: &str, company: &str, hq: &str, stage: Option<&str>) -> RawCandidate {
        RawCandidate {
            name: Some(name.into()),
            title: Some(title.into()),
            company: Some(company.into()),
            location: Some(hq.into()),
            hq: Some(hq.into()),
            source: LeadSource::LinkedIn,
            seniority: None,
            funding_stage: stage.map(Into::into),
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            lookup_timeout: std::time::Duration::from_millis(500),
            ..PipelineConfig::default()
        }
    }

    fn request(science: &str) -> RunRequest {
        RunRequest::new("Director of Toxicology", science)
    }

    // -----------------------------------------------------------------------
    // Scenarios
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn vp_at_funded_hub_company_is_high_priority() {
        let candidates = FixedCandidates(vec![candidate(
            "Dr. Vee Pee",
            "VP of In Vitro Biology",
            "Acme Bio",
            "Cambridge, MA",
            Some("Series A"),
        )]);
        let sources = Sources {
            candidates: &candidates,
            funding: &MockFundingLookup::new(),
            publications: &FixedAuthors(vec![]),
        };

        let report = run_pipeline(&request("cardiotoxicity"), sources, &config(), &SilentProgress)
            .await
            .unwrap();

        let lead = &report.leads[0];
        assert_eq!(lead.features.role_score, 3);
        assert_eq!(lead.features.funding_score, 3);
        assert_eq!(lead.features.hub_flag, 1);
        assert!(lead.propensity_score >= 80.0, "score {}", lead.propensity_score);
        assert_eq!(lead.fit_category, FitCategory::High);
        assert_eq!(lead.recommended_action, RecommendedAction::HighPriorityOutreach);
        assert_eq!(lead.recent_publication, RecentPublication::No);
    }

    #[tokio::test]
    async fn junior_grant_funded_outside_hub_is_monitor() {
        let candidates = FixedCandidates(vec![candidate(
            "Sam Lab",
            "Research Associate",
            "Small Lab",
            "Unknown",
            Some("Grant Funded"),
        )]);
        let sources = Sources {
            candidates: &candidates,
            funding: &MockFundingLookup::new(),
            publications: &FixedAuthors(vec![]),
        };

        let report = run_pipeline(&request("hepatic spheroids"), sources, &config(), &SilentProgress)
            .await
            .unwrap();

        let lead = &report.leads[0];
        assert_eq!(
            (lead.features.role_score, lead.features.funding_score, lead.features.hub_flag),
            (1, 1, 0)
        );
        assert_eq!(lead.fit_category, FitCategory::Low);
        assert_eq!(lead.recommended_action, RecommendedAction::Monitor);
        assert_eq!(lead.recent_publication, RecentPublication::Yes);
    }

    #[tokio::test]
    async fn zero_publications_still_ranks_candidates() {
        let candidates = MockCandidateSource::new(25, Some(42));
        let sources = Sources {
            candidates: &candidates,
            funding: &MockFundingLookup::new(),
            publications: &FixedAuthors(vec![]),
        };

        let report = run_pipeline(&request("drug induced liver injury"), sources, &config(), &SilentProgress)
            .await
            .unwrap();

        assert_eq!(report.leads.len(), 25);
        assert_eq!(report.publication_leads, 0);
        assert_eq!(report.summary.verified, 0);
        assert!(report.leads.iter().all(|l| l.lead.funding_stage.is_some()));
        assert!(
            report
                .leads
                .windows(2)
                .all(|w| w[0].propensity_score >= w[1].propensity_score)
        );
    }

    #[tokio::test]
    async fn failing_funding_lookup_degrades_to_unknown() {
        let candidates = FixedCandidates(vec![
            candidate("A", "Head of Safety", "Alpha", "Boston, MA", None),
            candidate("B", "Scientist", "Beta", "Austin, TX", None),
        ]);
        let sources = Sources {
            candidates: &candidates,
            funding: &FailingFunding,
            publications: &FixedAuthors(vec![]),
        };

        let report = run_pipeline(&request("cardiotoxicity"), sources, &config(), &SilentProgress)
            .await
            .unwrap();

        assert_eq!(report.leads.len(), 2);
        for lead in &report.leads {
            assert_eq!(lead.lead.funding_stage, Some(FundingStage::Unknown));
            assert_eq!(lead.features.funding_score, 1);
        }
    }

    #[tokio::test]
    async fn authors_are_merged_as_verified_leads() {
        let candidates = FixedCandidates(vec![candidate(
            "C",
            "Director of Toxicology",
            "NeoLiver Bio",
            "Cambridge, MA",
            None,
        )]);
        let authors = FixedAuthors(vec![
            RawAuthor {
                name: Some("Jane Doe".into()),
                paper_title: "Liver chips".into(),
                journal: "Lab Chip".into(),
                affiliation: Some("Wyss Institute, Harvard, Boston".into()),
            },
            RawAuthor {
                name: None,
                paper_title: "Consortium".into(),
                journal: "Nature".into(),
                affiliation: None,
            },
        ]);
        let sources = Sources {
            candidates: &candidates,
            funding: &MockFundingLookup::new(),
            publications: &authors,
        };

        let report = run_pipeline(&request("organ-on-chip"), sources, &config(), &SilentProgress)
            .await
            .unwrap();

        assert_eq!(report.leads.len(), 2);
        assert_eq!(report.dropped_records, 1);
        assert_eq!(report.publication_leads, 1);
        assert_eq!(report.summary.verified, 1);

        let author = report
            .leads
            .iter()
            .find(|l| l.lead.source == LeadSource::PubMed)
            .unwrap();
        assert_eq!(author.lead.company, "Wyss Institute");
        assert_eq!(author.recent_publication, RecentPublication::Verified);

        let neo = report
            .leads
            .iter()
            .find(|l| l.lead.company == "NeoLiver Bio")
            .unwrap();
        assert_eq!(neo.lead.funding_stage, Some(FundingStage::SeriesB));
    }

    #[tokio::test]
    async fn source_failures_are_recovered() {
        let candidates = FixedCandidates(vec![candidate("D", "VP", "Delta", "Basel", Some("IPO"))]);
        let sources = Sources {
            candidates: &candidates,
            funding: &MockFundingLookup::new(),
            publications: &FailingPublications,
        };

        let report = run_pipeline(&request("NASH / liver fibrosis"), sources, &config(), &SilentProgress)
            .await
            .unwrap();
        assert_eq!(report.leads.len(), 1);
        assert_eq!(report.publication_leads, 0);
    }

    #[tokio::test]
    async fn no_leads_at_all_is_scoring_error() {
        let sources = Sources {
            candidates: &FailingCandidates,
            funding: &MockFundingLookup::new(),
            publications: &FixedAuthors(vec![]),
        };

        let err = run_pipeline(&request("hepatic"), sources, &config(), &SilentProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, LeadGenError::Scoring(_)));
    }

    #[tokio::test]
    async fn disabled_publication_search_is_skipped() {
        let candidates = FixedCandidates(vec![candidate("E", "VP", "Echo", "Boston", Some("Seed"))]);
        let authors = FixedAuthors(vec![RawAuthor {
            name: Some("Never Seen".into()),
            paper_title: "T".into(),
            journal: "J".into(),
            affiliation: None,
        }]);
        let sources = Sources {
            candidates: &candidates,
            funding: &MockFundingLookup::new(),
            publications: &authors,
        };
        let config = PipelineConfig {
            publications_enabled: false,
            ..config()
        };

        let report = run_pipeline(&request("hepatic"), sources, &config, &SilentProgress)
            .await
            .unwrap();
        assert_eq!(report.leads.len(), 1);
        assert_eq!(report.publication_leads, 0);
    }

    #[tokio::test]
    async fn same_seed_gives_same_ranking() {
        let candidates = MockCandidateSource::new(20, Some(9));
        let sources = Sources {
            candidates: &candidates,
            funding: &MockFundingLookup::new(),
            publications: &FixedAuthors(vec![]),
        };

        let first = run_pipeline(&request("hepatic"), sources, &config(), &SilentProgress)
            .await
            .unwrap();
        let second = run_pipeline(&request("hepatic"), sources, &config(), &SilentProgress)
            .await
            .unwrap();

        assert_eq!(first.leads, second.leads);
        assert_eq!(first.summary, second.summary);
        assert_ne!(first.run_id, second.run_id);
    }

    #[tokio::test]
    async fn progress_reports_every_phase() {
        let candidates = FixedCandidates(vec![
            candidate("F", "VP", "Foxtrot", "Boston", None),
            candidate("G", "VP", "Golf", "Boston", Some("Seed")),
        ]);
        let sources = Sources {
            candidates: &candidates,
            funding: &MockFundingLookup::new(),
            publications: &FixedAuthors(vec![]),
        };
        let progress = RecordingProgress::default();

        run_pipeline(&request("hepatic"), sources, &config(), &progress)
            .await
            .unwrap();

        assert_eq!(
            *progress.phases.lock().unwrap(),
            vec![
                PipelinePhase::CandidateSearch,
                PipelinePhase::PublicationSearch,
                PipelinePhase::Merge,
                PipelinePhase::Enrichment,
                PipelinePhase::Scoring,
                PipelinePhase::Done,
            ]
        );
        assert_eq!(*progress.enriched.lock().unwrap(), 1);
    }

    #[test]
    fn phase_percentages_increase() {
        let phases = [
            PipelinePhase::CandidateSearch,
            PipelinePhase::PublicationSearch,
            PipelinePhase::Merge,
            PipelinePhase::Enrichment,
            PipelinePhase::Scoring,
            PipelinePhase::Done,
        ];
        assert!(phases.windows(2).all(|w| w[0].percent() < w[1].percent()));
    }
}
