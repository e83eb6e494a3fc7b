use std::net::Ipv4Addr;

use hetnet_abstract::{Endpoint, SimTime};
use thiserror::Error;

use crate::address::Ipv4Subnet;
use crate::topology::NodeId;

/// Reasons a scenario description is rejected before it reaches a backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("subnet {subnet} cannot hold {requested} more addresses ({capacity} hosts total)")]
    AddressExhausted {
        subnet: Ipv4Subnet,
        requested: usize,
        capacity: u32,
    },
    #[error("flow {flow}: {endpoint} does not exist in this topology")]
    UnknownNode { flow: usize, endpoint: Endpoint },
    #[error("address {address} is assigned to both {first} and {second}")]
    DuplicateAddress {
        address: Ipv4Addr,
        first: NodeId,
        second: NodeId,
    },
    #[error("subnets {first} and {second} overlap")]
    OverlappingSubnets {
        first: Ipv4Subnet,
        second: Ipv4Subnet,
    },
    #[error("flow {flow} is active from {start} to {stop}, outside the run [0s, {run_end}]")]
    FlowOutsideRun {
        flow: usize,
        start: SimTime,
        stop: SimTime,
        run_end: SimTime,
    },
    #[error("flow {flow}: {reason}")]
    InvalidFlow { flow: usize, reason: String },
}
