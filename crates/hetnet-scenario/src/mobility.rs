use serde::Serialize;

use crate::topology::{NodeId, Topology};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridLayout {
    RowFirst,
    ColumnFirst,
}

/// Places objects on a rectangular grid, `grid_width` per row (or column).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridPositionAllocator {
    pub min_x: f64,
    pub min_y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    pub grid_width: u32,
    pub layout: GridLayout,
}

impl Default for GridPositionAllocator {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            delta_x: 5.0,
            delta_y: 5.0,
            grid_width: 3,
            layout: GridLayout::RowFirst,
        }
    }
}

impl GridPositionAllocator {
    pub fn position(&self, slot: u32) -> Position {
        let width = self.grid_width.max(1);
        let (major, minor) = (slot / width, slot % width);
        let (col, row) = match self.layout {
            GridLayout::RowFirst => (minor, major),
            GridLayout::ColumnFirst => (major, minor),
        };
        Position {
            x: self.min_x + self.delta_x * f64::from(col),
            y: self.min_y + self.delta_y * f64::from(row),
            z: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub node: NodeId,
    pub position: Position,
}

/// Static placement of the wireless nodes. Wired nodes have no position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobilityPlan {
    pub model: &'static str,
    pub allocator: GridPositionAllocator,
    pub placements: Vec<Placement>,
}

impl MobilityPlan {
    /// The access point takes the first grid slot; stations follow in order.
    pub fn grid(allocator: GridPositionAllocator, topology: &Topology) -> Self {
        let placements = std::iter::once(topology.access_point())
            .chain(topology.wifi.stations.iter().copied())
            .zip(0u32..)
            .map(|(node, slot)| Placement {
                node,
                position: allocator.position(slot),
            })
            .collect();
        Self {
            model: "constant-position",
            allocator,
            placements,
        }
    }

    pub fn position_of(&self, node: NodeId) -> Option<Position> {
        self.placements
            .iter()
            .find(|p| p.node == node)
            .map(|p| p.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hetnet_abstract::ScenarioConfig;

    #[test]
    fn row_first_wraps_after_grid_width() {
        let grid = GridPositionAllocator::default();
        let at = |slot| {
            let p = grid.position(slot);
            (p.x, p.y)
        };
        assert_eq!(at(0), (0.0, 0.0));
        assert_eq!(at(1), (5.0, 0.0));
        assert_eq!(at(2), (10.0, 0.0));
        assert_eq!(at(3), (0.0, 5.0));
        assert_eq!(at(4), (5.0, 5.0));
    }

    #[test]
    fn column_first_fills_columns() {
        let grid = GridPositionAllocator {
            layout: GridLayout::ColumnFirst,
            ..Default::default()
        };
        let p = grid.position(4);
        assert_eq!((p.x, p.y), (5.0, 5.0));
        let p = grid.position(2);
        assert_eq!((p.x, p.y), (0.0, 10.0));
    }

    #[test]
    fn access_point_sits_at_the_grid_origin() {
        let topo = Topology::build(&ScenarioConfig::default());
        let plan = MobilityPlan::grid(GridPositionAllocator::default(), &topo);

        assert_eq!(plan.placements.len(), 5);
        let ap = plan.position_of(topo.access_point()).unwrap();
        assert_eq!((ap.x, ap.y), (0.0, 0.0));
        let last = plan.position_of(topo.station(3).unwrap()).unwrap();
        assert_eq!((last.x, last.y), (5.0, 5.0));
        assert!(plan.position_of(topo.lan_node(0).unwrap()).is_none());
    }
}
