//! PubMed E-utilities client.
//!
//! A publication search is two requests: `esearch.fcgi` returns the ids of
//! recent articles matching the keywords (JSON), then `efetch.fcgi` returns
//! the articles themselves (XML), from which the last author of each is kept.

mod parser;

use std::time::Duration;

use leadgen_shared::{LeadGenError, PubMedConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::adapters::PublicationSearch;
use crate::records::RawAuthor;

pub use parser::{ParsedArticles, parse_efetch};

/// User-Agent string for E-utilities requests.
const USER_AGENT: &str = concat!("LeadGen/", env!("CARGO_PKG_VERSION"));

/// Delay before the second attempt; doubled for each attempt after that.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// esearch response
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct ESearchResponse {
    #[serde(default)]
    esearchresult: ESearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the NCBI E-utilities.
#[derive(Debug, Clone)]
pub struct PubMedClient {
    http: Client,
    base_url: Url,
    tool: String,
    email: String,
    retmax: u32,
    timeout_secs: u64,
    max_attempts: u32,
}

impl PubMedClient {
    /// Build a client from the `[pubmed]` config section.
    pub fn new(config: &PubMedConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LeadGenError::Network(format!("failed to build HTTP client: {e}")))?;

        // Without the trailing slash `join` would replace the last segment.
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            LeadGenError::config(format!("invalid PubMed base URL '{}': {e}", config.base_url))
        })?;

        Ok(Self {
            http,
            base_url,
            tool: config.tool.clone(),
            email: config.email.clone(),
            retmax: config.retmax,
            timeout_secs: config.timeout_secs,
            max_attempts: config.max_attempts.max(1),
        })
    }

    /// Ids of articles matching `keywords` published in the last `max_months`.
    pub async fn search_ids(&self, keywords: &str, max_months: u32) -> Result<Vec<String>> {
        let term = format!("({keywords}) AND (\"last {max_months} months\"[dp])");
        let retmax = self.retmax.to_string();
        let params = [
            ("db", "pubmed"),
            ("term", term.as_str()),
            ("retmode", "json"),
            ("retmax", retmax.as_str()),
            ("tool", self.tool.as_str()),
            ("email", self.email.as_str()),
        ];

        let body = self.get_with_retry("esearch.fcgi", &params).await?;
        let response: ESearchResponse = serde_json::from_str(&body)
            .map_err(|e| LeadGenError::parse(format!("esearch response: {e}")))?;

        debug!(ids = response.esearchresult.idlist.len(), %term, "esearch done");
        Ok(response.esearchresult.idlist)
    }

    /// Fetch the given articles and extract their last authors.
    pub async fn fetch_authors(&self, ids: &[String]) -> Result<ParsedArticles> {
        let joined = ids.join(",");
        let params = [
            ("db", "pubmed"),
            ("id", joined.as_str()),
            ("retmode", "xml"),
            ("tool", self.tool.as_str()),
            ("email", self.email.as_str()),
        ];

        let body = self.get_with_retry("efetch.fcgi", &params).await?;
        Ok(parse_efetch(&body))
    }

    async fn get_with_retry(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.get_once(endpoint, params).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = RETRY_BASE_DELAY * 2u32.pow(attempt - 1);
                    warn!(endpoint, attempt, error = %e, ?delay, "E-utilities request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| LeadGenError::config(format!("bad endpoint {endpoint}: {e}")))?;

        let response = self
            .http
            .get(url.clone())
            .query(params)
            .send()
            .await
            .map_err(|e| self.request_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeadGenError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| self.request_error(endpoint, e))
    }

    fn request_error(&self, endpoint: &str, e: reqwest::Error) -> LeadGenError {
        if e.is_timeout() {
            LeadGenError::timeout(format!("PubMed {endpoint}"), self.timeout_secs)
        } else {
            LeadGenError::Network(format!("{endpoint}: {e}"))
        }
    }
}

impl PublicationSearch for PubMedClient {
    #[instrument(skip_all, fields(keywords = %keywords, max_months = max_months))]
    async fn search_publications(&self, keywords: &str, max_months: u32) -> Result<Vec<RawAuthor>> {
        let ids = self.search_ids(keywords, max_months).await?;
        if ids.is_empty() {
            info!("no recent publications found");
            return Ok(Vec::new());
        }

        let parsed = self.fetch_authors(&ids).await?;
        if parsed.skipped > 0 {
            warn!(skipped = parsed.skipped, "articles without title, journal or authors skipped");
        }

        info!(authors = parsed.authors.len(), "publication authors found");
        Ok(parsed.authors)
    }
}
