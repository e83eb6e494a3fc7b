use serde::Serialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use hetnet_abstract::{ScenarioConfig, SimTime};

use crate::flow::EchoFlow;
use crate::plan::ScenarioPlan;
use crate::topology::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    ServerStart,
    ClientStart,
    ClientSend {
        seq: u32,
        bytes: u32,
        to: Ipv4Addr,
        port: u16,
    },
    ClientStop,
    ServerStop,
    RunEnd,
}

/// One entry of the application timeline a backend walks through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledAction {
    pub time: SimTime,
    pub flow: Option<usize>,
    pub node: Option<NodeId>,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowSummary {
    pub id: usize,
    pub server: NodeId,
    pub client: NodeId,
    pub server_address: Ipv4Addr,
    pub port: u16,
    pub start: SimTime,
    pub stop: SimTime,
    pub planned_packets: u64,
    pub planned_bytes: u64,
}

impl From<&EchoFlow> for FlowSummary {
    fn from(flow: &EchoFlow) -> Self {
        Self {
            id: flow.id,
            server: flow.server,
            client: flow.client,
            server_address: flow.server_address,
            port: flow.port,
            start: flow.start,
            stop: flow.stop,
            planned_packets: flow.planned_send_count(),
            planned_bytes: flow.planned_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub backend: String,
    pub config: ScenarioConfig,
    pub node_count: usize,
    pub interface_count: usize,
    pub flows: Vec<FlowSummary>,
    pub schedule: Vec<ScheduledAction>,
    /// Where the plan was written, for backends that hand it off through a file.
    pub plan_path: Option<PathBuf>,
    /// Trace file the engine was asked to produce.
    pub trace_file: Option<String>,
}

impl ScenarioReport {
    pub fn from_plan(backend: &str, plan: &ScenarioPlan) -> Self {
        Self {
            backend: backend.to_string(),
            config: plan.config.clone(),
            node_count: plan.node_count(),
            interface_count: plan.addresses.interface_count(),
            flows: plan.flows.iter().map(FlowSummary::from).collect(),
            schedule: Vec::new(),
            plan_path: None,
            trace_file: plan.trace.output().map(str::to_string),
        }
    }

    pub fn planned_packets(&self) -> u64 {
        self.flows.iter().map(|f| f.planned_packets).sum()
    }
}
