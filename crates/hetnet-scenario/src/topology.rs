//! Node and segment layout of the scenario.
//!
//! ```text
//!   Wifi 10.1.3.0
//!                 AP
//!                 *
//!    Stations     |
//!  *    *    *    |
//!  |    |    |    |    10.1.1.0
//! n8   n9  n10   n0 -------------- n1   n2   n3 ... n7
//!                   point-to-point  |    |    |      |
//!                                   ==================
//!                                     LAN 10.1.2.0
//! ```
//!
//! Node ids follow creation order: the two point-to-point ends, then the
//! extra LAN hosts, then the wireless stations.

use serde::Serialize;
use std::fmt;

use hetnet_abstract::{Endpoint, LinkConfig, ScenarioConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// Wireless access point, also the first point-to-point end.
    AccessPoint,
    /// Second point-to-point end and first LAN member.
    LanBridge,
    LanHost,
    Station,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub role: NodeRole,
    pub internet_stack: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointToPointSegment {
    pub endpoints: [NodeId; 2],
    pub link: LinkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanSegment {
    /// Bridge node first, then the extra hosts.
    pub members: Vec<NodeId>,
    pub link: LinkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WifiSegment {
    pub access_point: NodeId,
    pub stations: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topology {
    pub nodes: Vec<Node>,
    pub p2p: PointToPointSegment,
    pub lan: LanSegment,
    pub wifi: WifiSegment,
}

impl Topology {
    pub fn build(config: &ScenarioConfig) -> Self {
        let mut nodes = Vec::with_capacity(2 + config.n_csma as usize + config.n_wifi as usize);
        let mut push = |role: NodeRole| {
            let id = NodeId(nodes.len() as u32);
            nodes.push(Node {
                id,
                role,
                internet_stack: true,
            });
            id
        };

        let ap = push(NodeRole::AccessPoint);
        let bridge = push(NodeRole::LanBridge);

        let mut lan_members = vec![bridge];
        lan_members.extend((0..config.n_csma).map(|_| push(NodeRole::LanHost)));

        let stations: Vec<NodeId> = (0..config.n_wifi).map(|_| push(NodeRole::Station)).collect();

        Self {
            nodes,
            p2p: PointToPointSegment {
                endpoints: [ap, bridge],
                link: config.p2p,
            },
            lan: LanSegment {
                members: lan_members,
                link: config.lan,
            },
            wifi: WifiSegment {
                access_point: ap,
                stations,
            },
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn access_point(&self) -> NodeId {
        self.wifi.access_point
    }

    pub fn lan_node(&self, index: usize) -> Option<NodeId> {
        self.lan.members.get(index).copied()
    }

    pub fn station(&self, index: usize) -> Option<NodeId> {
        self.wifi.stations.get(index).copied()
    }

    pub fn resolve(&self, endpoint: Endpoint) -> Option<NodeId> {
        match endpoint {
            Endpoint::Lan(i) => self.lan_node(i),
            Endpoint::Station(i) => self.station(i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_are_numbered_in_creation_order() {
        let config = ScenarioConfig {
            n_csma: 3,
            n_wifi: 3,
            ..Default::default()
        };
        let topo = Topology::build(&config);

        assert_eq!(topo.node_count(), 8);
        assert_eq!(topo.p2p.endpoints, [NodeId(0), NodeId(1)]);
        assert_eq!(
            topo.lan.members,
            vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]
        );
        assert_eq!(topo.wifi.stations, vec![NodeId(5), NodeId(6), NodeId(7)]);
        assert_eq!(topo.access_point(), NodeId(0));
        assert_eq!(topo.node(NodeId(1)).unwrap().role, NodeRole::LanBridge);
        assert_eq!(topo.node(NodeId(7)).unwrap().role, NodeRole::Station);
        assert!(topo.nodes.iter().all(|n| n.internet_stack));
    }

    #[test]
    fn lookups_respect_configured_counts() {
        let config = ScenarioConfig {
            n_csma: 0,
            n_wifi: 0,
            ..Default::default()
        };
        let topo = Topology::build(&config);

        assert_eq!(topo.node_count(), 2);
        assert_eq!(topo.resolve(Endpoint::Lan(0)), Some(NodeId(1)));
        assert_eq!(topo.resolve(Endpoint::Lan(1)), None);
        assert_eq!(topo.resolve(Endpoint::Station(0)), None);
        assert!(topo.node(NodeId(2)).is_none());
    }

    #[test]
    fn links_come_from_the_config() {
        let topo = Topology::build(&ScenarioConfig::default());
        assert_eq!(topo.p2p.link, LinkConfig::point_to_point());
        assert_eq!(topo.lan.link, LinkConfig::lan());
        assert_eq!(topo.station(3), Some(NodeId(11)));
        assert_eq!(topo.lan_node(6), Some(NodeId(7)));
    }
}
