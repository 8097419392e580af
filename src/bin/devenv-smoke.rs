use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use devenv_smoke::build_info;
use devenv_smoke::config::SmokeConfig;
use devenv_smoke::smoke::{self, CheckFilter, OutputFormat, ReportStyle, probe::ProcessEnv};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "devenv-smoke",
    about = "Sanity-check the development environment",
    version,
    long_version = build_info::LONG_VERSION
)]
struct Cli {
    /// Config file (defaults to ./smoke.toml when present, or $SMOKE_CONFIG)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Run only these checks (repeatable)
    #[arg(long, value_name = "CHECK")]
    only: Vec<String>,

    /// Skip these checks (repeatable)
    #[arg(long, value_name = "CHECK")]
    skip: Vec<String>,

    /// List the available checks and exit
    #[arg(long)]
    list: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => SmokeConfig::load(Some(path.as_path()))
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SmokeConfig::load_from_env().context("failed to load config")?,
    };

    let filter = CheckFilter {
        only: cli.only,
        skip: cli.skip,
    };
    filter.validate(&smoke::check_names(&config))?;
    let runner = smoke::default_runner(&config, &filter);

    if cli.list {
        for (name, description) in runner.describe() {
            println!("{:<18} {}", name, description.unwrap_or(""));
        }
        return Ok(ExitCode::SUCCESS);
    }

    if runner.is_empty() {
        warn!(only = ?filter.only, skip = ?filter.skip, "no checks selected");
    }

    if cli.format != OutputFormat::Json
        && let Some(hint) = smoke::venv_hint(&ProcessEnv, &config.nix_store, &config.dev_env_suffix)
    {
        println!("\n{}\n", hint);
    }

    info!(
        version = build_info::PKG_VERSION,
        target = build_info::CARGO_TARGET_TRIPLE,
        checks = runner.len(),
        "starting smoke checks"
    );
    let report = runner.run_all();

    let style = ReportStyle {
        format: cli.format,
        color: !cli.no_color,
    };
    smoke::print_report(&report, &style).context("failed to render report")?;

    Ok(ExitCode::from(report.exit_code() as u8))
}
