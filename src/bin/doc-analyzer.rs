//! CLI binary for doc-analyzer.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalyzerConfig`, runs one upload → analyze chain and prints the report.

use anyhow::{Context, Result};
use clap::Parser;
use doc_analyzer::config::{DEFAULT_ANALYZE_ENDPOINT, DEFAULT_UPLOAD_ENDPOINT};
use doc_analyzer::report::write_report;
use doc_analyzer::{
    AnalysisProgressCallback, AnalysisState, Analyzer, AnalyzerConfig, AnalyzerError,
    ProgressCallback, ReportFormat,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner that follows the run through upload and analysis.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading document…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl AnalysisProgressCallback for CliProgressCallback {
    fn on_upload_start(&self, filename: &str, bytes: usize) {
        self.bar.set_prefix("Uploading");
        self.bar.set_message(format!("{filename} ({bytes} bytes)"));
    }

    fn on_upload_complete(&self, locator: &str) {
        self.bar
            .println(format!("  {} Stored at {}", green("✓"), dim(locator)));
    }

    fn on_analysis_start(&self, _locator: &str, query_count: usize) {
        self.bar.set_prefix("Analyzing");
        self.bar.set_message(format!("{query_count} queries"));
    }

    fn on_analysis_complete(&self, section_count: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} Document processed successfully  {}",
            green("✔"),
            dim(&format!("{section_count} sections"))
        );
    }

    // The error itself is reported once, by `main`.
    fn on_failed(&self, _error: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyze an invoice and print the tables
  doc-analyzer invoice.pdf

  # Ask your own questions
  doc-analyzer --query "Who is the vendor?" --query "What is the invoice number?" invoice.pdf

  # JSON report to a file
  doc-analyzer --json -o report.json invoice.pdf

  # Point at another deployment
  doc-analyzer --upload-url https://api.example.com/upload \
               --analyze-url https://api.example.com/analyze invoice.pdf

ENVIRONMENT VARIABLES:
  DOC_ANALYZER_UPLOAD_URL   Upload endpoint
  DOC_ANALYZER_ANALYZE_URL  Analyze endpoint
  DOC_ANALYZER_TIMEOUT      Per-request timeout in seconds
  RUST_LOG                  Log filter (overrides --verbose / --quiet)
"#;

/// Analyze PDF, DOCX and TXT documents with a remote document-analysis backend.
#[derive(Parser, Debug)]
#[command(
    name = "doc-analyzer",
    version,
    about = "Analyze documents with a remote backend and print key-value pairs, tables and query answers",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document to analyze (.pdf, .docx or .txt).
    input: PathBuf,

    /// Write the report to this file instead of stdout.
    #[arg(short, long, env = "DOC_ANALYZER_OUTPUT")]
    output: Option<PathBuf>,

    /// Upload endpoint URL.
    #[arg(long, env = "DOC_ANALYZER_UPLOAD_URL", default_value = DEFAULT_UPLOAD_ENDPOINT)]
    upload_url: String,

    /// Analyze endpoint URL.
    #[arg(long, env = "DOC_ANALYZER_ANALYZE_URL", default_value = DEFAULT_ANALYZE_ENDPOINT)]
    analyze_url: String,

    /// Question to ask about the document (repeatable; replaces the defaults).
    #[arg(long = "query", value_name = "TEXT")]
    queries: Vec<String>,

    /// Cell text that starts a new table (repeatable; replaces "Date:" and "Item").
    #[arg(long = "marker", value_name = "TEXT")]
    markers: Vec<String>,

    /// Per-request timeout in seconds (1–600).
    #[arg(long, env = "DOC_ANALYZER_TIMEOUT", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..=600))]
    timeout: u64,

    /// Output the report as JSON instead of text tables.
    #[arg(long, env = "DOC_ANALYZER_JSON")]
    json: bool,

    /// Also print the raw analyze response.
    #[arg(long)]
    raw: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "DOC_ANALYZER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC_ANALYZER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the report.
    #[arg(short, long, env = "DOC_ANALYZER_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner provides all the feedback that matters, so INFO logs are
    // suppressed while it runs.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let format = if cli.json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };

    let mut analyzer = Analyzer::from_config(config).context("Failed to create HTTP client")?;
    if show_progress {
        let cb = CliProgressCallback::new();
        analyzer = analyzer.with_progress(cb as ProgressCallback);
    }

    // ── Run analysis ─────────────────────────────────────────────────────
    let outcome = match analyzer.run_file(&cli.input).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{} {}", red("✘"), failure_message(analyzer.failed_stage(), e));
            std::process::exit(1);
        }
    };

    if cli.raw {
        let raw = serde_json::to_string_pretty(&outcome.raw)
            .context("Failed to serialise raw response")?;
        eprintln!("{}\n{raw}", bold("Raw response"));
    }

    if outcome.report.is_empty() && !cli.quiet {
        eprintln!(
            "{}",
            dim("No key-value pairs, tables or query answers in the response.")
        );
    }

    if let Some(ref output_path) = cli.output {
        write_report(&outcome.report, output_path, format).context("Failed to write report")?;
        if !cli.quiet {
            eprintln!(
                "{}  {} sections  {}ms  →  {}",
                green("✔"),
                outcome.report.sections().count(),
                outcome.duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let rendered = format.render(&outcome.report)?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

/// One-line failure report, prefixed with the stage the run broke in.
fn failure_message(stage: Option<AnalysisState>, error: AnalyzerError) -> String {
    let context = match stage {
        Some(AnalysisState::Uploading) => "Upload step",
        Some(AnalysisState::Analyzing) => "Analysis step",
        _ => "Could not start analysis",
    };
    format!("{:#}", anyhow::Error::new(error).context(context))
}

/// Map CLI args to `AnalyzerConfig`.
fn build_config(cli: &Cli) -> Result<AnalyzerConfig> {
    AnalyzerConfig::builder()
        .upload_endpoint(&cli.upload_url)
        .analyze_endpoint(&cli.analyze_url)
        .queries(cli.queries.iter().cloned())
        .table_markers(cli.markers.iter().cloned())
        .timeout_secs(cli.timeout)
        .build()
        .context("Invalid configuration")
}
