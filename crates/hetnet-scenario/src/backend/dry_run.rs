use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{debug, info};

use hetnet_abstract::SimTime;

use super::SimulationBackend;
use crate::plan::ScenarioPlan;
use crate::report::{ActionKind, ScenarioReport, ScheduledAction};

#[derive(Debug)]
struct Entry {
    id: u64, // insertion order breaks ties at equal times
    action: ScheduledAction,
}

// Min-heap on (time, id)
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.action.time == other.action.time && self.id == other.id
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .action
            .time
            .cmp(&self.action.time)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Application start/stop and client send times, ordered by time.
#[derive(Default)]
struct Timeline {
    queue: BinaryHeap<Entry>,
    next_id: u64,
}

impl Timeline {
    fn from_plan(plan: &ScenarioPlan) -> Self {
        let mut timeline = Timeline::default();
        for flow in &plan.flows {
            let at = |time, node, kind| ScheduledAction {
                time,
                flow: Some(flow.id),
                node: Some(node),
                kind,
            };
            timeline.push(at(flow.start, flow.server, ActionKind::ServerStart));
            timeline.push(at(flow.start, flow.client, ActionKind::ClientStart));
            for (seq, time) in (0u32..).zip(flow.planned_sends()) {
                timeline.push(at(
                    time,
                    flow.client,
                    ActionKind::ClientSend {
                        seq,
                        bytes: flow.packet_size,
                        to: flow.server_address,
                        port: flow.port,
                    },
                ));
            }
            timeline.push(at(flow.stop, flow.client, ActionKind::ClientStop));
            timeline.push(at(flow.stop, flow.server, ActionKind::ServerStop));
        }
        timeline.push(ScheduledAction {
            time: plan.stop_time,
            flow: None,
            node: None,
            kind: ActionKind::RunEnd,
        });
        timeline
    }

    fn push(&mut self, action: ScheduledAction) {
        self.queue.push(Entry {
            id: self.next_id,
            action,
        });
        self.next_id += 1;
    }

    fn pop(&mut self) -> Option<ScheduledAction> {
        self.queue.pop().map(|entry| entry.action)
    }
}

/// Walks the application timeline implied by the plan without simulating
/// any packets. Useful to inspect a scenario before handing it to an engine.
#[derive(Debug, Default)]
pub struct DryRun;

impl SimulationBackend for DryRun {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn run(&mut self, plan: &ScenarioPlan) -> anyhow::Result<ScenarioReport> {
        info!(
            "Dry run of {} nodes, {} flows until {}",
            plan.node_count(),
            plan.flows.len(),
            plan.stop_time
        );

        let mut report = ScenarioReport::from_plan(self.name(), plan);
        let mut timeline = Timeline::from_plan(plan);
        let mut last = SimTime::ZERO;
        while let Some(action) = timeline.pop() {
            debug_assert!(action.time >= last);
            last = action.time;
            if plan.app_logging {
                info!("[{}] {}", action.time, describe(&action));
            } else {
                debug!("[{}] {}", action.time, describe(&action));
            }
            report.schedule.push(action);
        }

        if let Some(file) = plan.trace.output() {
            info!(
                "Trace of {} LAN devices requested in {}",
                plan.trace.devices.len(),
                file
            );
        }
        Ok(report)
    }
}

fn describe(action: &ScheduledAction) -> String {
    let who = match (action.flow, action.node) {
        (Some(flow), Some(node)) => format!("flow {flow} {node}"),
        _ => "scenario".to_string(),
    };
    match &action.kind {
        ActionKind::ServerStart => format!("{who}: echo server starts"),
        ActionKind::ClientStart => format!("{who}: echo client starts"),
        ActionKind::ClientSend {
            seq,
            bytes,
            to,
            port,
        } => format!("{who}: send #{seq} ({bytes} bytes) to {to}:{port}"),
        ActionKind::ClientStop => format!("{who}: echo client stops"),
        ActionKind::ServerStop => format!("{who}: echo server stops"),
        ActionKind::RunEnd => format!("{who}: stop"),
    }
}
