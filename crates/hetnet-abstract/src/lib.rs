pub mod config;
pub mod flow;
pub mod units;

pub use config::{LinkConfig, LinkConfigOverride, ScenarioConfig, ScenarioConfigOverride};
pub use flow::{ECHO_PORT, EchoFlowTemplate, Endpoint};
pub use units::{DataRate, ParseUnitError, SimTime};
