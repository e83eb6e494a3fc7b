use serde::Serialize;

use hetnet_abstract::{ScenarioConfig, SimTime};

use crate::address::AddressPlan;
use crate::error::ScenarioError;
use crate::flow::EchoFlow;
use crate::mobility::MobilityPlan;
use crate::topology::Topology;
use crate::trace::TraceSettings;
use crate::wifi::WifiSettings;

/// Everything an engine needs to run the scenario. Produced by
/// [`crate::ScenarioBuilder`] and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioPlan {
    pub config: ScenarioConfig,
    pub topology: Topology,
    pub addresses: AddressPlan,
    pub wifi: WifiSettings,
    pub mobility: MobilityPlan,
    pub flows: Vec<EchoFlow>,
    /// Echo applications log their traffic.
    pub app_logging: bool,
    /// Routing tables are populated globally before the run starts.
    pub global_routing: bool,
    pub trace: TraceSettings,
    pub stop_time: SimTime,
}

impl ScenarioPlan {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.addresses.subnets.check_disjoint()?;
        self.addresses.check_unique()?;

        for flow in &self.flows {
            if self.topology.node(flow.server).is_none() {
                return Err(ScenarioError::UnknownNode {
                    flow: flow.id,
                    endpoint: flow.server_endpoint,
                });
            }
            if self.topology.node(flow.client).is_none() {
                return Err(ScenarioError::UnknownNode {
                    flow: flow.id,
                    endpoint: flow.client_endpoint,
                });
            }
            flow.check(self.stop_time)?;
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
