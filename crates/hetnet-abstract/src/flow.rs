use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::SimTime;

/// UDP port the echo servers listen on.
pub const ECHO_PORT: u16 = 9;

/// A node addressed by its position inside a segment, before global node ids exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "segment", content = "index", rename_all = "snake_case")]
pub enum Endpoint {
    /// Index into the LAN node list; index 0 is the node bridging to the point-to-point link.
    Lan(usize),
    /// Index into the wireless station list.
    Station(usize),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Lan(i) => write!(f, "LAN node {i}"),
            Endpoint::Station(i) => write!(f, "wifi station {i}"),
        }
    }
}

/// Declarative description of one UDP echo client/server pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoFlowTemplate {
    pub server: Endpoint,
    pub client: Endpoint,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_packets")]
    pub max_packets: u32,
    #[serde(default = "default_interval")]
    pub interval: SimTime,
    #[serde(default = "default_packet_size")]
    pub packet_size: u32,
    #[serde(default = "default_start")]
    pub start: SimTime,
    #[serde(default = "default_stop")]
    pub stop: SimTime,
}

fn default_port() -> u16 {
    ECHO_PORT
}

fn default_max_packets() -> u32 {
    1000
}

fn default_interval() -> SimTime {
    SimTime::from_secs(2)
}

fn default_packet_size() -> u32 {
    1024
}

fn default_start() -> SimTime {
    SimTime::from_secs(1)
}

fn default_stop() -> SimTime {
    SimTime::from_secs(2)
}

impl EchoFlowTemplate {
    /// A flow with the stock echo parameters (port 9, 1024 B every 2 s, active 1 s to 2 s).
    pub fn new(server: Endpoint, client: Endpoint) -> Self {
        Self {
            server,
            client,
            port: default_port(),
            max_packets: default_max_packets(),
            interval: default_interval(),
            packet_size: default_packet_size(),
            start: default_start(),
            stop: default_stop(),
        }
    }

    /// The five flows of the stock scenario: one LAN-local pair, then one
    /// wireless station per LAN server.
    pub fn defaults() -> Vec<EchoFlowTemplate> {
        let mut flows = vec![EchoFlowTemplate::new(Endpoint::Lan(2), Endpoint::Lan(1))];
        flows.extend(
            (0..4).map(|sta| EchoFlowTemplate::new(Endpoint::Lan(sta + 3), Endpoint::Station(sta))),
        );
        flows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_flows_pair_stations_with_lan_servers() {
        let flows = EchoFlowTemplate::defaults();
        assert_eq!(flows.len(), 5);
        assert_eq!(flows[0].server, Endpoint::Lan(2));
        assert_eq!(flows[0].client, Endpoint::Lan(1));
        for (i, flow) in flows.iter().skip(1).enumerate() {
            assert_eq!(flow.server, Endpoint::Lan(i + 3));
            assert_eq!(flow.client, Endpoint::Station(i));
        }
        assert!(flows.iter().all(|f| f.port == ECHO_PORT
            && f.max_packets == 1000
            && f.packet_size == 1024
            && f.interval == SimTime::from_secs(2)
            && f.start == SimTime::from_secs(1)
            && f.stop == SimTime::from_secs(2)));
    }

    #[test]
    fn endpoint_display_names_the_segment() {
        assert_eq!(Endpoint::Lan(3).to_string(), "LAN node 3");
        assert_eq!(Endpoint::Station(0).to_string(), "wifi station 0");
    }
}
