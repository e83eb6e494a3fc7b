use serde::{Deserialize, Serialize};

use crate::flow::EchoFlowTemplate;
use crate::units::{DataRate, SimTime};

/// Rate and propagation delay of a wired segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub data_rate: DataRate,
    pub delay: SimTime,
}

impl LinkConfig {
    pub fn point_to_point() -> Self {
        Self {
            data_rate: DataRate::from_mbps(10),
            delay: SimTime::from_millis(2),
        }
    }

    pub fn lan() -> Self {
        Self {
            data_rate: DataRate::from_mbps(10),
            delay: SimTime::from_nanos(10_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Number of "extra" LAN hosts, not counting the bridge node.
    pub n_csma: u32,
    /// Number of wireless stations, not counting the access point.
    pub n_wifi: u32,
    /// Ask the echo applications to log their activity.
    pub verbose: bool,
    /// Capture an ASCII trace of every LAN device.
    pub tracing: bool,
    pub trace_file: String,
    pub p2p: LinkConfig,
    pub lan: LinkConfig,
    pub stop_time: SimTime,
    pub flows: Vec<EchoFlowTemplate>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            n_csma: 6,
            n_wifi: 4,
            verbose: true,
            tracing: true,
            trace_file: "results1.tr".to_string(),
            p2p: LinkConfig::point_to_point(),
            lan: LinkConfig::lan(),
            stop_time: SimTime::from_secs(2),
            flows: EchoFlowTemplate::defaults(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LinkConfigOverride {
    pub data_rate: Option<DataRate>,
    pub delay: Option<SimTime>,
}

impl LinkConfigOverride {
    pub fn apply_to(&self, link: &mut LinkConfig) {
        if let Some(v) = self.data_rate {
            link.data_rate = v;
        }
        if let Some(v) = self.delay {
            link.delay = v;
        }
    }
}

/// Partial configuration, as read from a TOML file or collected from
/// command-line flags. Only the fields that are set replace the base values.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfigOverride {
    pub n_csma: Option<u32>,
    pub n_wifi: Option<u32>,
    pub verbose: Option<bool>,
    pub tracing: Option<bool>,
    pub trace_file: Option<String>,
    pub p2p: Option<LinkConfigOverride>,
    pub lan: Option<LinkConfigOverride>,
    pub stop_time: Option<SimTime>,
    pub flows: Option<Vec<EchoFlowTemplate>>,
}

impl ScenarioConfigOverride {
    pub fn apply_to(&self, config: &mut ScenarioConfig) {
        if let Some(v) = self.n_csma {
            config.n_csma = v;
        }
        if let Some(v) = self.n_wifi {
            config.n_wifi = v;
        }
        if let Some(v) = self.verbose {
            config.verbose = v;
        }
        if let Some(v) = self.tracing {
            config.tracing = v;
        }
        if let Some(v) = &self.trace_file {
            config.trace_file = v.clone();
        }
        if let Some(v) = &self.p2p {
            v.apply_to(&mut config.p2p);
        }
        if let Some(v) = &self.lan {
            v.apply_to(&mut config.lan);
        }
        if let Some(v) = self.stop_time {
            config.stop_time = v;
        }
        if let Some(v) = &self.flows {
            config.flows = v.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_stock_scenario() {
        let config = ScenarioConfig::default();
        assert_eq!(config.n_csma, 6);
        assert_eq!(config.n_wifi, 4);
        assert!(config.tracing);
        assert_eq!(config.p2p.data_rate, DataRate::from_mbps(10));
        assert_eq!(config.p2p.delay, SimTime::from_millis(2));
        assert_eq!(config.lan.delay, SimTime::from_micros(10));
        assert_eq!(config.stop_time, SimTime::from_secs(2));
        assert_eq!(config.flows.len(), 5);
    }

    #[test]
    fn override_only_touches_set_fields() {
        let mut config = ScenarioConfig::default();
        let overrides = ScenarioConfigOverride {
            n_wifi: Some(7),
            tracing: Some(false),
            lan: Some(LinkConfigOverride {
                delay: Some(SimTime::from_micros(50)),
                ..Default::default()
            }),
            ..Default::default()
        };
        overrides.apply_to(&mut config);

        assert_eq!(config.n_wifi, 7);
        assert!(!config.tracing);
        assert_eq!(config.n_csma, 6);
        assert_eq!(config.lan.delay, SimTime::from_micros(50));
        assert_eq!(config.lan.data_rate, DataRate::from_mbps(10));
        assert_eq!(config.p2p, LinkConfig::point_to_point());
    }

    #[test]
    fn empty_override_is_identity() {
        let mut config = ScenarioConfig::default();
        ScenarioConfigOverride::default().apply_to(&mut config);
        assert_eq!(config, ScenarioConfig::default());
    }
}
