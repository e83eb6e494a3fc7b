pub mod address;
pub mod backend;
pub mod builder;
pub mod error;
pub mod flow;
pub mod mobility;
pub mod plan;
pub mod report;
pub mod topology;
pub mod trace;
pub mod wifi;

pub use address::{AddressPlan, Ipv4Subnet, SubnetPlan};
pub use backend::{DryRun, PlanExport, SimulationBackend};
pub use builder::ScenarioBuilder;
pub use error::ScenarioError;
pub use flow::EchoFlow;
pub use plan::ScenarioPlan;
pub use report::{ActionKind, ScenarioReport, ScheduledAction};
pub use topology::{NodeId, NodeRole, Topology};
