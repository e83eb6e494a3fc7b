use anyhow::Context;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use super::SimulationBackend;
use crate::plan::ScenarioPlan;
use crate::report::ScenarioReport;

/// Hands the plan to an external engine by writing it as JSON.
#[derive(Debug, Clone)]
pub struct PlanExport {
    path: PathBuf,
}

impl PlanExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SimulationBackend for PlanExport {
    fn name(&self) -> &str {
        "export"
    }

    fn run(&mut self, plan: &ScenarioPlan) -> anyhow::Result<ScenarioReport> {
        let data = serde_json::to_vec_pretty(plan).context("Failed to serialize scenario plan")?;
        fs::write(&self.path, &data)
            .with_context(|| format!("Failed to write scenario plan {}", self.path.display()))?;
        info!(
            "Wrote scenario plan ({} nodes, {} flows) to {}",
            plan.node_count(),
            plan.flows.len(),
            self.path.display()
        );

        let mut report = ScenarioReport::from_plan(self.name(), plan);
        report.plan_path = Some(self.path.clone());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScenarioBuilder;

    #[test]
    fn writes_the_plan_and_reports_its_location() {
        let path = std::env::temp_dir().join(format!("hetnet-plan-{}.json", std::process::id()));
        let plan = ScenarioBuilder::default().build().unwrap();

        let report = PlanExport::new(&path).run(&plan).unwrap();
        assert_eq!(report.plan_path.as_deref(), Some(path.as_path()));
        assert!(report.schedule.is_empty());

        let written: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["flows"].as_array().unwrap().len(), 5);
        assert_eq!(written["trace"]["file"], "results1.tr");
        assert_eq!(written["addresses"]["wifi_ap"]["address"], "10.1.3.5");
        assert_eq!(written["topology"]["p2p"]["link"]["delay"], "2ms");
        assert_eq!(written["wifi"]["ssid"], "ns-3-ssid");
        assert_eq!(written["wifi"]["station_active_probing"], false);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let plan = ScenarioBuilder::default().build().unwrap();
        let dir = std::env::temp_dir().join("hetnet-missing-dir").join("nested");
        let err = PlanExport::new(dir.join("plan.json")).run(&plan).unwrap_err();
        assert!(err.to_string().contains("Failed to write scenario plan"));
    }
}
