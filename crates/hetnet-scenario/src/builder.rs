use tracing::{debug, info};

use hetnet_abstract::{EchoFlowTemplate, ScenarioConfig};

use crate::address::{AddressPlan, SubnetPlan};
use crate::error::ScenarioError;
use crate::flow::EchoFlow;
use crate::mobility::{GridPositionAllocator, MobilityPlan};
use crate::plan::ScenarioPlan;
use crate::topology::Topology;
use crate::trace::TraceSettings;
use crate::wifi::WifiSettings;

/// Builder for a [`ScenarioPlan`]. Starts from a config and allows the
/// parts that have no config-file representation to be swapped out.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    config: ScenarioConfig,
    subnets: SubnetPlan,
    grid: GridPositionAllocator,
    wifi: WifiSettings,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new(ScenarioConfig::default())
    }
}

impl ScenarioBuilder {
    pub fn new(config: ScenarioConfig) -> Self {
        Self {
            config,
            subnets: SubnetPlan::default(),
            grid: GridPositionAllocator::default(),
            wifi: WifiSettings::default(),
        }
    }

    pub fn n_csma(mut self, n: u32) -> Self {
        self.config.n_csma = n;
        self
    }

    pub fn n_wifi(mut self, n: u32) -> Self {
        self.config.n_wifi = n;
        self
    }

    pub fn tracing(mut self, enabled: bool) -> Self {
        self.config.tracing = enabled;
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.config.verbose = enabled;
        self
    }

    pub fn flows(mut self, flows: Vec<EchoFlowTemplate>) -> Self {
        self.config.flows = flows;
        self
    }

    pub fn subnets(mut self, subnets: SubnetPlan) -> Self {
        self.subnets = subnets;
        self
    }

    pub fn grid(mut self, grid: GridPositionAllocator) -> Self {
        self.grid = grid;
        self
    }

    pub fn wifi(mut self, wifi: WifiSettings) -> Self {
        self.wifi = wifi;
        self
    }

    pub fn build(self) -> Result<ScenarioPlan, ScenarioError> {
        let config = self.config;
        info!(
            "Building scenario: {} LAN hosts, {} wifi stations, {} flows",
            config.n_csma,
            config.n_wifi,
            config.flows.len()
        );

        let topology = Topology::build(&config);
        let addresses = AddressPlan::assign(&topology, self.subnets)?;
        debug!(
            "Assigned {} interfaces across {}, {}, {}",
            addresses.interface_count(),
            self.subnets.p2p,
            self.subnets.lan,
            self.subnets.wifi
        );

        let flows = config
            .flows
            .iter()
            .enumerate()
            .map(|(i, template)| EchoFlow::resolve(i + 1, template, &topology, &addresses))
            .collect::<Result<Vec<_>, _>>()?;

        let mobility = MobilityPlan::grid(self.grid, &topology);
        let trace = TraceSettings::lan_ascii(&config, &topology);

        let plan = ScenarioPlan {
            app_logging: config.verbose,
            global_routing: true,
            stop_time: config.stop_time,
            topology,
            addresses,
            wifi: self.wifi,
            mobility,
            flows,
            trace,
            config,
        };
        plan.validate()?;
        Ok(plan)
    }
}
