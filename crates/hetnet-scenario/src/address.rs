use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;

use hetnet_abstract::Endpoint;

use crate::error::ScenarioError;
use crate::topology::{NodeId, Topology};

/// An IPv4 network in CIDR form. The network address is always stored with
/// its host bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Subnet {
    network: Ipv4Addr,
    prefix_len: u8,
}

fn mask_bits(prefix_len: u8) -> u32 {
    if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix_len))
    }
}

impl Ipv4Subnet {
    /// `None` when `prefix_len` is longer than 32 bits. Host bits of
    /// `network` are cleared.
    pub fn new(network: Ipv4Addr, prefix_len: u8) -> Option<Self> {
        if prefix_len > 32 {
            return None;
        }
        let network = Ipv4Addr::from(u32::from(network) & mask_bits(prefix_len));
        Some(Self {
            network,
            prefix_len,
        })
    }

    /// Shorthand for a `/24` network, the only size the stock scenario uses.
    pub fn slash24(a: u8, b: u8, c: u8) -> Self {
        Self {
            network: Ipv4Addr::new(a, b, c, 0),
            prefix_len: 24,
        }
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn mask(&self) -> Ipv4Addr {
        Ipv4Addr::from(mask_bits(self.prefix_len))
    }

    /// Number of assignable host addresses. `/31` and `/32` have no reserved
    /// network or broadcast address.
    pub fn host_capacity(&self) -> u32 {
        let size = 1u64 << (32 - u32::from(self.prefix_len));
        if self.prefix_len >= 31 {
            size as u32
        } else {
            (size - 2) as u32
        }
    }

    /// The `n`-th assignable host, counting from zero.
    pub fn host(&self, n: u32) -> Option<Ipv4Addr> {
        if n >= self.host_capacity() {
            return None;
        }
        let first = if self.prefix_len >= 31 { 0 } else { 1 };
        Some(Ipv4Addr::from(u32::from(self.network) + first + n))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & mask_bits(self.prefix_len) == u32::from(self.network)
    }

    pub fn overlaps(&self, other: &Ipv4Subnet) -> bool {
        let shorter = self.prefix_len.min(other.prefix_len);
        let mask = mask_bits(shorter);
        u32::from(self.network) & mask == u32::from(other.network) & mask
    }
}

impl fmt::Display for Ipv4Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

impl Serialize for Ipv4Subnet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One device's address on a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub node: NodeId,
    pub address: Ipv4Addr,
}

/// Hands out host addresses of a subnet in order, starting at the first host.
/// Consecutive calls continue where the previous one stopped.
#[derive(Debug, Clone)]
pub struct AddressAllocator {
    subnet: Ipv4Subnet,
    assigned: u32,
}

impl AddressAllocator {
    pub fn new(subnet: Ipv4Subnet) -> Self {
        Self {
            subnet,
            assigned: 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.subnet.host_capacity() - self.assigned
    }

    pub fn assign(&mut self, nodes: &[NodeId]) -> Result<Vec<Interface>, ScenarioError> {
        if nodes.len() as u64 > u64::from(self.remaining()) {
            return Err(ScenarioError::AddressExhausted {
                subnet: self.subnet,
                requested: nodes.len(),
                capacity: self.subnet.host_capacity(),
            });
        }
        let mut interfaces = Vec::with_capacity(nodes.len());
        for &node in nodes {
            interfaces.push(self.assign_one(node)?);
        }
        Ok(interfaces)
    }

    pub fn assign_one(&mut self, node: NodeId) -> Result<Interface, ScenarioError> {
        let address = self
            .subnet
            .host(self.assigned)
            .ok_or(ScenarioError::AddressExhausted {
                subnet: self.subnet,
                requested: 1,
                capacity: self.subnet.host_capacity(),
            })?;
        self.assigned += 1;
        Ok(Interface { node, address })
    }
}

/// The three networks of the scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubnetPlan {
    pub p2p: Ipv4Subnet,
    pub lan: Ipv4Subnet,
    pub wifi: Ipv4Subnet,
}

impl Default for SubnetPlan {
    fn default() -> Self {
        Self {
            p2p: Ipv4Subnet::slash24(10, 1, 1),
            lan: Ipv4Subnet::slash24(10, 1, 2),
            wifi: Ipv4Subnet::slash24(10, 1, 3),
        }
    }
}

impl SubnetPlan {
    pub fn check_disjoint(&self) -> Result<(), ScenarioError> {
        let all = [self.p2p, self.lan, self.wifi];
        for (i, first) in all.iter().enumerate() {
            for second in &all[i + 1..] {
                if first.overlaps(second) {
                    return Err(ScenarioError::OverlappingSubnets {
                        first: *first,
                        second: *second,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Addresses of every device, grouped by segment in assignment order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressPlan {
    pub subnets: SubnetPlan,
    pub p2p: Vec<Interface>,
    pub lan: Vec<Interface>,
    pub wifi_stations: Vec<Interface>,
    pub wifi_ap: Interface,
}

impl AddressPlan {
    /// Assign all three pools. Wireless stations are numbered before the
    /// access point, which takes the next address in the same pool.
    pub fn assign(topology: &Topology, subnets: SubnetPlan) -> Result<Self, ScenarioError> {
        subnets.check_disjoint()?;

        let p2p = AddressAllocator::new(subnets.p2p).assign(&topology.p2p.endpoints)?;
        let lan = AddressAllocator::new(subnets.lan).assign(&topology.lan.members)?;

        let mut wifi = AddressAllocator::new(subnets.wifi);
        let wifi_stations = wifi.assign(&topology.wifi.stations)?;
        let wifi_ap = wifi.assign_one(topology.wifi.access_point)?;

        Ok(Self {
            subnets,
            p2p,
            lan,
            wifi_stations,
            wifi_ap,
        })
    }

    pub fn lan_address(&self, index: usize) -> Option<Ipv4Addr> {
        self.lan.get(index).map(|iface| iface.address)
    }

    pub fn station_address(&self, index: usize) -> Option<Ipv4Addr> {
        self.wifi_stations.get(index).map(|iface| iface.address)
    }

    /// Address of an endpoint on its own segment.
    pub fn address_of(&self, endpoint: Endpoint) -> Option<Ipv4Addr> {
        match endpoint {
            Endpoint::Lan(i) => self.lan_address(i),
            Endpoint::Station(i) => self.station_address(i),
        }
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.p2p
            .iter()
            .chain(self.lan.iter())
            .chain(self.wifi_stations.iter())
            .chain(std::iter::once(&self.wifi_ap))
    }

    /// Every node may own several interfaces, but no two interfaces may share an address.
    pub fn check_unique(&self) -> Result<(), ScenarioError> {
        let mut seen: HashMap<Ipv4Addr, NodeId> = HashMap::new();
        for iface in self.interfaces() {
            if let Some(&first) = seen.get(&iface.address) {
                return Err(ScenarioError::DuplicateAddress {
                    address: iface.address,
                    first,
                    second: iface.node,
                });
            }
            seen.insert(iface.address, iface.node);
        }
        Ok(())
    }

    pub fn interface_count(&self) -> usize {
        self.p2p.len() + self.lan.len() + self.wifi_stations.len() + 1
    }
}
