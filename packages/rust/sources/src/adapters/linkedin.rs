//! Mock professional-network candidate search.
//!
//! Returns a few curated "golden" profiles followed by procedurally
//! generated ones until the requested count is reached. Filters are accepted
//! but ignored, as a sandbox API would.

use leadgen_shared::{LeadSource, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use super::{CandidateFilters, CandidateSource};
use crate::records::RawCandidate;

/// Default number of profiles returned per search.
pub const DEFAULT_CANDIDATE_COUNT: usize = 40;

const FIRST_NAMES: &[&str] = &[
    "James", "Robert", "Michael", "David", "Jennifer", "Linda", "Elizabeth", "Barbara", "William",
    "Susan", "Thomas", "Jessica", "Lisa", "Karen", "Andrew", "Matthew",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson", "Moore",
    "Taylor", "Anderson", "Thomas", "Jackson", "White",
];

const PHARMA_COMPANIES: &[&str] = &[
    "Amgen", "Gilead", "Vertex", "Regeneron", "Moderna", "Biogen", "Sanofi", "Pfizer", "Merck",
    "Takeda", "AstraZeneca", "Novartis", "Roche", "Bayer", "GSK", "AbbVie",
];

const BIOTECH_STARTUPS: &[&str] = &[
    "CellModel", "LiverChip", "OrganoVir", "ToxScreen", "HepaGlobal", "3DTissue", "VivoLogic",
    "SafetyFirst Bio",
];

const ROLES: &[&str] = &[
    "Director of Toxicology",
    "Head of Safety Assessment",
    "Principal Investigator",
    "Senior Scientist",
    "VP of R&D",
    "Research Scientist",
    "Scientific Director",
];

const HUBS: &[&str] = &[
    "Boston, MA",
    "Cambridge, MA",
    "San Francisco, CA",
    "San Diego, CA",
    "London, UK",
    "Basel, CH",
    "Research Triangle, NC",
];

const REMOTE_STATES: &[&str] = &["TX", "FL", "CO", "AZ"];

/// Share of generated profiles working at a startup rather than big pharma.
const STARTUP_SHARE: f64 = 0.4;

/// Candidate search backed by a seeded generator.
#[derive(Debug, Clone)]
pub struct MockCandidateSource {
    count: usize,
    seed: Option<u64>,
}

impl MockCandidateSource {
    /// Create a source returning `count` profiles per search.
    /// With `seed` set, every search returns the same profiles.
    pub fn new(count: usize, seed: Option<u64>) -> Self {
        Self { count, seed }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for MockCandidateSource {
    fn default() -> Self {
        Self::new(DEFAULT_CANDIDATE_COUNT, None)
    }
}

impl CandidateSource for MockCandidateSource {
    #[instrument(skip_all, fields(count = self.count))]
    async fn search_candidates(&self, filters: &CandidateFilters) -> Result<Vec<RawCandidate>> {
        debug!(
            job_titles = ?filters.job_titles,
            locations = ?filters.locations,
            "filters ignored by mock candidate search"
        );

        let mut profiles = golden_profiles();
        let mut rng = self.rng();
        let needed = self.count.saturating_sub(profiles.len());

        for _ in 0..needed {
            profiles.push(generate_profile(&mut rng));
        }

        // Counts below the golden set still cap the result size.
        profiles.truncate(self.count);
        Ok(profiles)
    }

    fn name(&self) -> &str {
        "mock-linkedin"
    }
}

/// Hand-picked personas that always lead the result list.
fn golden_profiles() -> Vec<RawCandidate> {
    vec![
        curated(
            "Dr. Emily Ross",
            "Director of Toxicology",
            "NeoLiver Bio",
            "Boston, MA",
            "Cambridge, MA",
            LeadSource::LinkedIn,
        ),
        curated(
            "Dr. Alex Morgan",
            "Senior Scientist – Safety",
            "HepatoTech",
            "Remote – Texas",
            "San Diego, CA",
            LeadSource::LinkedIn,
        ),
        curated(
            "Sarah Jenkins",
            "VP of Preclinical Safety",
            "BioTox Solutions",
            "Basel, Switzerland",
            "Basel, Switzerland",
            LeadSource::Xing,
        ),
    ]
}

fn curated(
    name: &str,
    title: &str,
    company: &str,
    location: &str,
    hq: &str,
    source: LeadSource,
) -> RawCandidate {
    RawCandidate {
        name: Some(name.into()),
        title: Some(title.into()),
        company: Some(company.into()),
        location: Some(location.into()),
        hq: Some(hq.into()),
        source,
        seniority: Some(seniority_label(title).into()),
        funding_stage: None,
    }
}

fn generate_profile(rng: &mut StdRng) -> RawCandidate {
    let company = if rng.gen_bool(1.0 - STARTUP_SHARE) {
        pick(rng, PHARMA_COMPANIES)
    } else {
        pick(rng, BIOTECH_STARTUPS)
    };

    let hq = pick(rng, HUBS);
    let location = if rng.gen_bool(0.5) {
        format!("Remote ({})", pick(rng, REMOTE_STATES))
    } else {
        hq.to_string()
    };

    let name = format!("Dr. {} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES));
    let title = pick(rng, ROLES);

    RawCandidate {
        name: Some(name),
        title: Some(title.into()),
        company: Some(company.into()),
        location: Some(location),
        hq: Some(hq.into()),
        source: LeadSource::LinkedIn,
        seniority: Some(seniority_label(title).into()),
        funding_stage: None,
    }
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// Coarse seniority label, as the network tags its profiles.
fn seniority_label(title: &str) -> &'static str {
    if title.contains("VP") {
        "VP"
    } else if title.contains("Head") {
        "Head"
    } else if title.contains("Director") {
        "Director"
    } else if title.contains("Principal") {
        "Principal"
    } else if title.contains("Senior") {
        "Senior"
    } else {
        "Scientist"
    }
}
