//! Background pipeline runs.
//!
//! A run executes on the tokio runtime while the UI thread keeps drawing;
//! progress and the final report come back over a channel.

use std::sync::mpsc::{self, Receiver, Sender};

use leadgen_core::{PipelinePhase, ProgressReporter, RunRequest, Sources, run_pipeline};
use leadgen_shared::{AppConfig, PipelineConfig, RunReport};
use leadgen_sources::{MockCandidateSource, MockFundingLookup, PubMedClient};
use tokio::runtime::Runtime;
use tracing::error;

/// Messages sent from a running pipeline to the UI.
#[derive(Debug)]
pub(crate) enum RunEvent {
    Phase(PipelinePhase),
    Enriched { current: usize, total: usize },
    Finished(Box<RunReport>),
    Failed(String),
}

/// Forwards pipeline progress into the channel.
struct ChannelProgress {
    tx: Sender<RunEvent>,
}

impl ProgressReporter for ChannelProgress {
    fn phase(&self, phase: PipelinePhase) {
        let _ = self.tx.send(RunEvent::Phase(phase));
    }

    fn lead_enriched(&self, current: usize, total: usize, _company: &str) {
        let _ = self.tx.send(RunEvent::Enriched { current, total });
    }

    fn done(&self, _report: &RunReport) {}
}

/// Start a pipeline run in the background.
pub(crate) fn spawn_run(
    runtime: &Runtime,
    config: &AppConfig,
    request: RunRequest,
    offline: bool,
) -> Receiver<RunEvent> {
    let (tx, rx) = mpsc::channel();

    let mut pipeline = PipelineConfig::from(config);
    if offline {
        pipeline.publications_enabled = false;
    }
    let pubmed = config.pubmed.clone();

    runtime.spawn(async move {
        let publications = match PubMedClient::new(&pubmed) {
            Ok(client) => client,
            Err(e) => {
                let _ = tx.send(RunEvent::Failed(e.to_string()));
                return;
            }
        };
        let candidates = MockCandidateSource::new(pipeline.candidate_count, pipeline.candidate_seed);
        let funding = MockFundingLookup::new();
        let sources = Sources {
            candidates: &candidates,
            funding: &funding,
            publications: &publications,
        };

        let progress = ChannelProgress { tx: tx.clone() };
        let event = match run_pipeline(&request, sources, &pipeline, &progress).await {
            Ok(report) => RunEvent::Finished(Box::new(report)),
            Err(e) => {
                error!(error = %e, "pipeline run failed");
                RunEvent::Failed(e.to_string())
            }
        };
        let _ = tx.send(event);
    });

    rx
}
