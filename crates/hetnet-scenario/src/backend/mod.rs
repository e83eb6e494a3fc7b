//! The seam between a scenario plan and whatever runs it.
//!
//! A backend receives a validated [`ScenarioPlan`] and is responsible for
//! everything past that point: scheduling, channel and PHY models, routing,
//! and writing the trace file when the plan asks for one.

mod dry_run;
mod export;

pub use dry_run::DryRun;
pub use export::PlanExport;

use crate::plan::ScenarioPlan;
use crate::report::ScenarioReport;

pub trait SimulationBackend {
    /// Short name used in logs and reports.
    fn name(&self) -> &str;

    /// Consume the plan. Called once per run.
    fn run(&mut self, plan: &ScenarioPlan) -> anyhow::Result<ScenarioReport>;
}
