use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use hetnet_abstract::{ScenarioConfig, ScenarioConfigOverride};
use hetnet_scenario::{DryRun, PlanExport, ScenarioBuilder, ScenarioReport, SimulationBackend};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// Walk the application timeline without simulating packets.
    DryRun,
    /// Write the plan as JSON for an external engine.
    Export,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "WiFi + point-to-point + LAN scenario with UDP echo flows"
)]
struct Args {
    /// Number of "extra" LAN nodes/devices [default: 6]
    #[arg(long)]
    n_csma: Option<u32>,

    /// Number of wifi STA devices [default: 4]
    #[arg(long)]
    n_wifi: Option<u32>,

    /// Tell echo applications to log if true [default: true]
    #[arg(long, value_name = "BOOL")]
    verbose: Option<bool>,

    /// Enable ASCII tracing of the LAN devices [default: true]
    #[arg(long, value_name = "BOOL")]
    tracing: Option<bool>,

    /// TOML file with scenario settings. Flags given on the command line win.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = BackendKind::DryRun)]
    backend: BackendKind,

    /// Where the export backend writes the plan.
    #[arg(long, default_value = "scenario-plan.json")]
    plan_out: PathBuf,

    /// Write a JSON report of the run.
    #[arg(long)]
    report_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();
    info!("hetnet starting…");

    let config = args.resolve_config()?;
    let plan = ScenarioBuilder::new(config)
        .build()
        .context("Invalid scenario")?;

    let mut backend = args.build_backend();
    let report = backend
        .run(&plan)
        .with_context(|| format!("Backend '{}' failed", backend.name()))?;
    log_summary(&report);

    if let Some(path) = &args.report_out {
        write_report(path, &report)?;
    }

    Ok(())
}

impl Args {
    /// Defaults, then the config file, then explicit flags.
    fn resolve_config(&self) -> Result<ScenarioConfig> {
        let mut config = ScenarioConfig::default();
        if let Some(path) = &self.config {
            load_config(path)?.apply_to(&mut config);
        }
        self.flag_overrides().apply_to(&mut config);
        Ok(config)
    }

    fn flag_overrides(&self) -> ScenarioConfigOverride {
        ScenarioConfigOverride {
            n_csma: self.n_csma,
            n_wifi: self.n_wifi,
            verbose: self.verbose,
            tracing: self.tracing,
            ..Default::default()
        }
    }

    fn build_backend(&self) -> Box<dyn SimulationBackend> {
        match self.backend {
            BackendKind::DryRun => Box::new(DryRun),
            BackendKind::Export => Box::new(PlanExport::new(self.plan_out.clone())),
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn load_config(path: &Path) -> Result<ScenarioConfigOverride> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let overrides: ScenarioConfigOverride =
        toml::from_str(&content).context("Failed to parse config file")?;
    Ok(overrides)
}

fn log_summary(report: &ScenarioReport) {
    info!(
        "{}: {} nodes | {} interfaces | {} flows | {} planned packets",
        report.backend,
        report.node_count,
        report.interface_count,
        report.flows.len(),
        report.planned_packets()
    );
    if let Some(trace) = &report.trace_file {
        info!("Engine trace output: {}", trace);
    }
}

fn write_report(path: &Path, report: &ScenarioReport) -> Result<()> {
    let data = serde_json::to_vec_pretty(report).context("Failed to serialize run report")?;
    fs::write(path, &data)
        .with_context(|| format!("Failed to write report file {}", path.display()))?;
    Ok(())
}
