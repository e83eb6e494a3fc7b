use serde::Serialize;
use std::net::Ipv4Addr;

use hetnet_abstract::{EchoFlowTemplate, Endpoint, SimTime};

use crate::address::AddressPlan;
use crate::error::ScenarioError;
use crate::topology::{NodeId, Topology};

/// Largest payload a single UDP datagram can carry over IPv4.
const MAX_UDP_PAYLOAD: u32 = 65_507;

/// Upper bound on client sends a single flow may imply within its window.
pub const MAX_PLANNED_SENDS: u64 = 1_000_000;

/// An echo flow with its endpoints bound to concrete nodes and addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EchoFlow {
    /// 1-based, in declaration order.
    pub id: usize,
    pub server: NodeId,
    pub client: NodeId,
    pub server_endpoint: Endpoint,
    pub client_endpoint: Endpoint,
    /// Where the client sends: the server's address on its own segment.
    pub server_address: Ipv4Addr,
    pub port: u16,
    pub max_packets: u32,
    pub interval: SimTime,
    pub packet_size: u32,
    pub start: SimTime,
    pub stop: SimTime,
}

impl EchoFlow {
    pub fn resolve(
        id: usize,
        template: &EchoFlowTemplate,
        topology: &Topology,
        addresses: &AddressPlan,
    ) -> Result<Self, ScenarioError> {
        let unknown = |endpoint| ScenarioError::UnknownNode { flow: id, endpoint };

        let server = topology
            .resolve(template.server)
            .ok_or_else(|| unknown(template.server))?;
        let client = topology
            .resolve(template.client)
            .ok_or_else(|| unknown(template.client))?;
        let server_address = addresses
            .address_of(template.server)
            .ok_or_else(|| unknown(template.server))?;

        Ok(Self {
            id,
            server,
            client,
            server_endpoint: template.server,
            client_endpoint: template.client,
            server_address,
            port: template.port,
            max_packets: template.max_packets,
            interval: template.interval,
            packet_size: template.packet_size,
            start: template.start,
            stop: template.stop,
        })
    }

    pub fn check(&self, run_end: SimTime) -> Result<(), ScenarioError> {
        let invalid = |reason: String| ScenarioError::InvalidFlow {
            flow: self.id,
            reason,
        };

        if self.server == self.client {
            return Err(invalid(format!(
                "client and server are the same node {}",
                self.server
            )));
        }
        if self.port == 0 {
            return Err(invalid("port 0 cannot be bound".to_string()));
        }
        if self.interval == SimTime::ZERO {
            return Err(invalid("interval must be positive".to_string()));
        }
        if self.packet_size > MAX_UDP_PAYLOAD {
            return Err(invalid(format!(
                "packet size {} exceeds the UDP payload limit of {MAX_UDP_PAYLOAD}",
                self.packet_size
            )));
        }
        if self.start > self.stop || self.stop > run_end {
            return Err(ScenarioError::FlowOutsideRun {
                flow: self.id,
                start: self.start,
                stop: self.stop,
                run_end,
            });
        }
        let sends = self.planned_send_count();
        if sends > MAX_PLANNED_SENDS {
            return Err(invalid(format!(
                "{sends} sends between {} and {} exceed the limit of {MAX_PLANNED_SENDS}",
                self.start, self.stop
            )));
        }
        Ok(())
    }

    /// Number of entries [`EchoFlow::planned_sends`] yields, without building them.
    pub fn planned_send_count(&self) -> u64 {
        if self.start >= self.stop {
            return 0;
        }
        let budget = u64::from(self.max_packets);
        let interval = self.interval.as_nanos();
        if interval == 0 {
            return budget;
        }
        let window = self.stop.as_nanos() - self.start.as_nanos();
        window.div_ceil(interval).min(budget)
    }

    /// Client transmit times implied by the descriptor: one packet at `start`,
    /// then one per `interval` while the client is active and under its
    /// packet budget. Only bounded once [`EchoFlow::check`] has passed.
    pub fn planned_sends(&self) -> Vec<SimTime> {
        let mut sends = Vec::new();
        let mut at = self.start;
        while at < self.stop && (sends.len() as u64) < u64::from(self.max_packets) {
            sends.push(at);
            match at.checked_add(self.interval) {
                Some(next) => at = next,
                None => break,
            }
        }
        sends
    }

    /// Bytes the client plans to send (echoes double this on the wire).
    pub fn planned_bytes(&self) -> u64 {
        self.planned_send_count() * u64::from(self.packet_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::SubnetPlan;
    use hetnet_abstract::ScenarioConfig;

    fn stock() -> (Topology, AddressPlan) {
        let topo = Topology::build(&ScenarioConfig::default());
        let addresses = AddressPlan::assign(&topo, SubnetPlan::default()).unwrap();
        (topo, addresses)
    }

    #[test]
    fn resolves_station_client_to_lan_server() {
        let (topo, addresses) = stock();
        let template = EchoFlowTemplate::new(Endpoint::Lan(3), Endpoint::Station(0));
        let flow = EchoFlow::resolve(2, &template, &topo, &addresses).unwrap();

        assert_eq!(flow.server, NodeId(4));
        assert_eq!(flow.client, NodeId(8));
        assert_eq!(flow.server_address, Ipv4Addr::new(10, 1, 2, 4));
        assert_eq!(flow.port, 9);
        flow.check(SimTime::from_secs(2)).unwrap();
    }

    #[test]
    fn missing_endpoint_is_reported_with_its_flow() {
        let (topo, addresses) = stock();
        let template = EchoFlowTemplate::new(Endpoint::Lan(7), Endpoint::Station(0));
        let err = EchoFlow::resolve(5, &template, &topo, &addresses).unwrap_err();
        assert_eq!(
            err,
            ScenarioError::UnknownNode {
                flow: 5,
                endpoint: Endpoint::Lan(7)
            }
        );

        let template = EchoFlowTemplate::new(Endpoint::Lan(2), Endpoint::Station(4));
        let err = EchoFlow::resolve(1, &template, &topo, &addresses).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::UnknownNode {
                endpoint: Endpoint::Station(4),
                ..
            }
        ));
    }

    #[test]
    fn stock_window_allows_a_single_send() {
        let (topo, addresses) = stock();
        let template = EchoFlowTemplate::new(Endpoint::Lan(2), Endpoint::Lan(1));
        let flow = EchoFlow::resolve(1, &template, &topo, &addresses).unwrap();
        assert_eq!(flow.planned_sends(), vec![SimTime::from_secs(1)]);
        assert_eq!(flow.planned_bytes(), 1024);
    }

    #[test]
    fn sends_stop_at_budget_or_stop_time() {
        let (topo, addresses) = stock();
        let mut template = EchoFlowTemplate::new(Endpoint::Lan(2), Endpoint::Lan(1));
        template.interval = SimTime::from_millis(100);
        template.max_packets = 3;
        let flow = EchoFlow::resolve(1, &template, &topo, &addresses).unwrap();
        assert_eq!(
            flow.planned_sends(),
            vec![
                SimTime::from_millis(1000),
                SimTime::from_millis(1100),
                SimTime::from_millis(1200)
            ]
        );

        template.max_packets = 1000;
        let flow = EchoFlow::resolve(1, &template, &topo, &addresses).unwrap();
        let sends = flow.planned_sends();
        assert_eq!(sends.len(), 10);
        assert_eq!(flow.planned_send_count(), 10);
        assert!(sends.iter().all(|t| *t < SimTime::from_secs(2)));
    }

    #[test]
    fn send_count_matches_the_listed_sends() {
        let (topo, addresses) = stock();
        let mut template = EchoFlowTemplate::new(Endpoint::Lan(2), Endpoint::Lan(1));
        for (interval_ms, max_packets) in [(2000, 1000), (300, 1000), (250, 3), (1, 5000), (7, 0)] {
            template.interval = SimTime::from_millis(interval_ms);
            template.max_packets = max_packets;
            let flow = EchoFlow::resolve(1, &template, &topo, &addresses).unwrap();
            assert_eq!(
                flow.planned_send_count(),
                flow.planned_sends().len() as u64,
                "interval {interval_ms}ms, budget {max_packets}"
            );
        }

        template.start = SimTime::from_secs(2);
        let flow = EchoFlow::resolve(1, &template, &topo, &addresses).unwrap();
        assert_eq!(flow.planned_send_count(), 0);
        assert_eq!(flow.planned_bytes(), 0);
    }

    #[test]
    fn dense_flows_beyond_the_send_limit_are_rejected() {
        let (topo, addresses) = stock();
        let mut template = EchoFlowTemplate::new(Endpoint::Lan(2), Endpoint::Lan(1));
        template.interval = SimTime::from_nanos(1);
        template.max_packets = u32::MAX;
        let flow = EchoFlow::resolve(1, &template, &topo, &addresses).unwrap();

        assert_eq!(flow.planned_send_count(), 1_000_000_000);
        assert_eq!(flow.planned_bytes(), 1_000_000_000 * 1024);
        assert!(matches!(
            flow.check(SimTime::from_secs(2)),
            Err(ScenarioError::InvalidFlow { flow: 1, .. })
        ));

        // exactly at the limit is still accepted
        template.interval = SimTime::from_micros(1);
        let flow = EchoFlow::resolve(1, &template, &topo, &addresses).unwrap();
        assert_eq!(flow.planned_send_count(), MAX_PLANNED_SENDS);
        flow.check(SimTime::from_secs(2)).unwrap();
    }

    #[test]
    fn check_rejects_inconsistent_descriptors() {
        let (topo, addresses) = stock();
        let run_end = SimTime::from_secs(2);

        let same = EchoFlowTemplate::new(Endpoint::Lan(2), Endpoint::Lan(2));
        let flow = EchoFlow::resolve(1, &same, &topo, &addresses).unwrap();
        assert!(matches!(
            flow.check(run_end),
            Err(ScenarioError::InvalidFlow { flow: 1, .. })
        ));

        let mut late = EchoFlowTemplate::new(Endpoint::Lan(2), Endpoint::Lan(1));
        late.stop = SimTime::from_secs(3);
        let flow = EchoFlow::resolve(1, &late, &topo, &addresses).unwrap();
        assert!(matches!(
            flow.check(run_end),
            Err(ScenarioError::FlowOutsideRun { .. })
        ));

        let mut backwards = EchoFlowTemplate::new(Endpoint::Lan(2), Endpoint::Lan(1));
        backwards.start = SimTime::from_millis(1500);
        backwards.stop = SimTime::from_secs(1);
        let flow = EchoFlow::resolve(1, &backwards, &topo, &addresses).unwrap();
        assert!(flow.check(run_end).is_err());

        let mut zero = EchoFlowTemplate::new(Endpoint::Lan(2), Endpoint::Lan(1));
        zero.interval = SimTime::ZERO;
        let flow = EchoFlow::resolve(1, &zero, &topo, &addresses).unwrap();
        assert!(flow.check(run_end).is_err());
    }
}
