//! Funding enrichment.
//!
//! Leads that arrive without a funding stage get one from the
//! [`FundingLookup`]. Each lookup runs under a time budget and is retried
//! on retryable failures; anything that still fails ends up as
//! [`FundingStage::Unknown`] so the run never stops here.

use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use leadgen_shared::{FundingStage, Lead, LeadGenError, PipelineConfig, Result};
use leadgen_sources::FundingLookup;

/// Pause between attempts of the same lookup.
const RETRY_DELAY: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Policy & results
// ---------------------------------------------------------------------------

/// Time budget and retry policy for funding lookups.
#[derive(Debug, Clone, Copy)]
pub struct LookupPolicy {
    /// Budget per attempt.
    pub timeout: Duration,
    /// Attempts per company, at least 1.
    pub max_attempts: u32,
}

impl Default for LookupPolicy {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for LookupPolicy {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            timeout: config.lookup_timeout,
            max_attempts: config.lookup_attempts,
        }
    }
}

/// Counters for one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentResults {
    /// Leads that needed a lookup.
    pub looked_up: usize,
    /// Lookups that produced a recognized stage.
    pub resolved: usize,
    /// Lookups that failed and were recovered to `Unknown`.
    pub recovered: usize,
}

// ---------------------------------------------------------------------------
// Progress trait
// ---------------------------------------------------------------------------

/// Progress callback for funding lookups.
pub trait EnrichmentProgress: Send + Sync {
    /// Called after each lookup.
    fn lookup_progress(&self, current: usize, total: usize, company: &str);
}

/// No-op enrichment progress.
pub struct SilentEnrichmentProgress;

impl EnrichmentProgress for SilentEnrichmentProgress {
    fn lookup_progress(&self, _current: usize, _total: usize, _company: &str) {}
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Fill in missing funding stages in place.
///
/// Leads that already carry a stage are left untouched.
#[instrument(skip_all, fields(leads = leads.len()))]
pub async fn enrich<L, P>(
    leads: &mut [Lead],
    lookup: &L,
    policy: LookupPolicy,
    progress: &P,
) -> EnrichmentResults
where
    L: FundingLookup,
    P: EnrichmentProgress + ?Sized,
{
    let total = leads.iter().filter(|l| l.funding_stage.is_none()).count();
    let mut results = EnrichmentResults {
        looked_up: total,
        ..Default::default()
    };

    let pending = leads.iter_mut().filter(|l| l.funding_stage.is_none());
    for (i, lead) in pending.enumerate() {
        let stage = match lookup_stage(lookup, &lead.company, policy).await {
            Ok(stage) => {
                results.resolved += 1;
                stage
            }
            Err(e) => {
                warn!(company = %lead.company, error = %e, "funding lookup failed, using Unknown");
                results.recovered += 1;
                FundingStage::Unknown
            }
        };

        lead.funding_stage = Some(stage);
        progress.lookup_progress(i + 1, total, &lead.company);
    }

    info!(
        looked_up = results.looked_up,
        resolved = results.resolved,
        recovered = results.recovered,
        "funding enrichment complete"
    );

    results
}

/// Look up one company, retrying retryable failures.
async fn lookup_stage<L: FundingLookup>(
    lookup: &L,
    company: &str,
    policy: LookupPolicy,
) -> Result<FundingStage> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let outcome = match tokio::time::timeout(policy.timeout, lookup.lookup_funding(company)).await
        {
            Ok(result) => result,
            Err(_) => Err(LeadGenError::timeout(
                format!("funding lookup for {company}"),
                policy.timeout.as_secs(),
            )),
        };

        match outcome {
            Ok(info) => {
                return FundingStage::parse(&info.stage).ok_or_else(|| {
                    LeadGenError::lookup(company, format!("unrecognized stage '{}'", info.stage))
                });
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                debug!(company, attempt, error = %e, "retrying funding lookup");
                tokio::time::sleep(RETRY_DELAY).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
