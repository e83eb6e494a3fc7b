use serde::Serialize;

use hetnet_abstract::ScenarioConfig;

use crate::topology::{NodeId, Topology};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceFormat {
    Ascii,
}

/// Which devices the engine should trace, and where to write the trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSettings {
    pub enabled: bool,
    pub format: TraceFormat,
    pub file: String,
    /// Every device on the LAN segment, bridge included.
    pub devices: Vec<NodeId>,
}

impl TraceSettings {
    pub fn lan_ascii(config: &ScenarioConfig, topology: &Topology) -> Self {
        Self {
            enabled: config.tracing,
            format: TraceFormat::Ascii,
            file: config.trace_file.clone(),
            devices: topology.lan.members.clone(),
        }
    }

    /// The file the engine is expected to produce, if any.
    pub fn output(&self) -> Option<&str> {
        self.enabled.then_some(self.file.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traces_every_lan_device_when_enabled() {
        let config = ScenarioConfig::default();
        let topo = Topology::build(&config);
        let trace = TraceSettings::lan_ascii(&config, &topo);
        assert_eq!(trace.output(), Some("results1.tr"));
        assert_eq!(trace.devices.len(), 7);
        assert_eq!(trace.devices[0], NodeId(1));
    }

    #[test]
    fn disabled_trace_has_no_output() {
        let config = ScenarioConfig {
            tracing: false,
            ..Default::default()
        };
        let topo = Topology::build(&config);
        assert_eq!(TraceSettings::lan_ascii(&config, &topo).output(), None);
    }
}
