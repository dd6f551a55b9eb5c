//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use leadgen_core::{PipelinePhase, ProgressReporter, RunRequest, Sources, run_pipeline};
use leadgen_shared::{
    AppConfig, PipelineConfig, ROLE_PERSONAS, RunReport, SCIENCE_CONTEXTS, init_config,
    load_config, load_config_from,
};
use leadgen_sources::{MockCandidateSource, MockFundingLookup, PubMedClient};
use tracing::{info, warn};

use crate::render;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// LeadGen: find and rank prospects for 3D in-vitro models.
#[derive(Parser)]
#[command(
    name = "leadgen",
    version,
    about = "Rank toxicology prospects from network, funding and PubMed signals.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.leadgen/leadgen.toml.
    #[arg(long, global = true, env = "LEADGEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the lead pipeline and print the ranked leads.
    Run {
        /// Target role persona (defaults to the configured one).
        #[arg(short, long)]
        role: Option<String>,

        /// Scientific context, also used as PubMed keywords.
        #[arg(short, long)]
        science: Option<String>,

        /// Number of candidate profiles to request.
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Seed for the candidate generator, for repeatable runs.
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the PubMed search.
        #[arg(long)]
        offline: bool,

        /// Output format.
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List the predefined role personas and science contexts.
    List,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

/// Flags of the `run` command.
struct RunArgs {
    role: Option<String>,
    science: Option<String>,
    count: Option<usize>,
    seed: Option<u64>,
    offline: bool,
    format: OutputFormat,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout
/// carries only the report.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "leadgen=info",
        1 => "leadgen=debug",
        _ => "leadgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Run {
            role,
            science,
            count,
            seed,
            offline,
            format,
        } => {
            let args = RunArgs {
                role,
                science,
                count,
                seed,
                offline,
                format,
            };
            cmd_run(config_path.as_deref(), args).await
        }
        Command::List => cmd_list(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

fn resolve_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(config_path: Option<&std::path::Path>, args: RunArgs) -> Result<()> {
    let config = resolve_config(config_path)?;

    let role = args
        .role
        .unwrap_or_else(|| config.defaults.role_persona.clone());
    let science = args
        .science
        .unwrap_or_else(|| config.defaults.science_context.clone());
    if role.trim().is_empty() || science.trim().is_empty() {
        return Err(eyre!("role and science context must not be empty"));
    }
    if !ROLE_PERSONAS.contains(&role.as_str()) {
        warn!(%role, "role is not one of the predefined personas");
    }

    // Flags override the file.
    let mut pipeline = PipelineConfig::from(&config);
    if let Some(count) = args.count {
        pipeline.candidate_count = count;
    }
    if args.seed.is_some() {
        pipeline.candidate_seed = args.seed;
    }
    if args.offline {
        pipeline.publications_enabled = false;
    }

    let candidates = MockCandidateSource::new(pipeline.candidate_count, pipeline.candidate_seed);
    let funding = MockFundingLookup::new();
    let publications = PubMedClient::new(&config.pubmed)?;
    let sources = Sources {
        candidates: &candidates,
        funding: &funding,
        publications: &publications,
    };

    info!(%role, %science, count = pipeline.candidate_count, "running lead pipeline");

    let request = RunRequest::new(role, science);
    let report = if args.format == OutputFormat::Table {
        let reporter = CliProgress::new();
        run_pipeline(&request, sources, &pipeline, &reporter).await?
    } else {
        run_pipeline(&request, sources, &pipeline, &leadgen_core::SilentProgress).await?
    };

    match args.format {
        OutputFormat::Table => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    println!();
    println!(
        "  Ranked Leads for: {} + {}",
        report.role_input, report.science_context
    );
    println!();
    for line in render::summary_lines(&report.summary) {
        println!("  {line}");
    }
    println!();
    for line in render::lead_table(&report.leads) {
        println!("{line}");
    }
    println!();
    println!(
        "  {} leads ({} from PubMed), {} dropped, {:.1}s  [run {}]",
        report.summary.total,
        report.publication_leads,
        report.dropped_records,
        report.elapsed_ms as f64 / 1000.0,
        report.run_id,
    );
    println!();
}

fn cmd_list() -> Result<()> {
    println!("Role personas:");
    for persona in ROLE_PERSONAS {
        println!("  {persona}");
    }
    println!();
    println!("Science contexts:");
    for context in SCIENCE_CONTEXTS {
        println!("  {context}");
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} [{pos:>3}%] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, phase: PipelinePhase) {
        self.spinner.set_position(u64::from(phase.percent()));
        self.spinner.set_message(phase.label());
    }

    fn lead_enriched(&self, current: usize, total: usize, company: &str) {
        self.spinner.set_message(format!(
            "{} [{current}/{total}] {company}",
            PipelinePhase::Enrichment.label()
        ));
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}
