//! Board topology: cells, nodes, and connectors in arena storage.
//!
//! The graph is built exactly once from a [`BoardLayout`] and never changes
//! shape afterwards - the only mutable parts are the robber flag, ownership
//! marks, and the selectable highlights the state machine recomputes per
//! phase. Adjacency (node siblings, incident connectors, the cells shared by
//! a connector's endpoints) is derived during construction and cached for the
//! lifetime of the game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::Terrain;
use crate::layout::BoardLayout;

/// Player identifier, 1-based. Player 0 does not exist.
pub type PlayerId = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectorId(pub usize);

/// Errors detected while assembling the graph. The topology is immutable
/// once built, so all of these are construction-time fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("node {node} references cell index {cell} outside the cell list")]
    NodeCellOutOfRange { node: usize, cell: usize },

    #[error("connector {connector} references node index {node} outside the node list")]
    ConnectorNodeOutOfRange { connector: usize, node: usize },

    #[error("connector {connector} joins a node to itself")]
    DegenerateConnector { connector: usize },

    #[error("connector {connector} endpoints share {found} cells, expected 1 or 2")]
    CommonCells { connector: usize, found: usize },

    #[error("expected exactly one desert cell to seat the robber, found {0}")]
    RobberSeat(usize),
}

/// A hex tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub center: (f64, f64),
    pub terrain: Terrain,
    /// Dice sum on which this cell produces. None for desert and ocean.
    pub roll: Option<u8>,
    pub has_robber: bool,
    pub selectable: bool,
    nodes: Vec<NodeId>,
}

impl Cell {
    /// Nodes sitting on this cell's corners, in registration order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
}

/// A building site at the junction of three cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    cells: Vec<CellId>,
    connectors: Vec<ConnectorId>,
    siblings: Vec<NodeId>,
    pub owner: Option<PlayerId>,
    pub selectable: bool,
}

impl Node {
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Incident connectors (2 on the coast, 3 inland).
    pub fn connectors(&self) -> &[ConnectorId] {
        &self.connectors
    }

    /// Nodes one connector away. Precomputed; the topology never changes.
    pub fn siblings(&self) -> &[NodeId] {
        &self.siblings
    }
}

/// A road site joining two adjacent nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    nodes: [NodeId; 2],
    cells: Vec<CellId>,
    pub owner: Option<PlayerId>,
    pub selectable: bool,
}

impl Connector {
    pub fn nodes(&self) -> [NodeId; 2] {
        self.nodes
    }

    /// The 1-2 cells common to both endpoints.
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }
}

/// The assembled graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Cell>,
    nodes: Vec<Node>,
    connectors: Vec<Connector>,
    robber: CellId,
}

impl Board {
    /// Build the graph from descriptors: cells first, then nodes (each
    /// registering itself with its cells), then connectors (each registering
    /// itself with its endpoints and inheriting their common cells).
    pub fn build(layout: &BoardLayout) -> Result<Self, TopologyError> {
        let mut cells: Vec<Cell> = layout
            .cells
            .iter()
            .map(|spec| Cell {
                center: spec.center,
                terrain: spec.terrain,
                roll: spec.roll,
                has_robber: false,
                selectable: false,
                nodes: Vec::new(),
            })
            .collect();

        let mut nodes: Vec<Node> = Vec::with_capacity(layout.nodes.len());
        for (index, cell_refs) in layout.nodes.iter().enumerate() {
            for &cell in cell_refs {
                if cell >= cells.len() {
                    return Err(TopologyError::NodeCellOutOfRange { node: index, cell });
                }
                cells[cell].nodes.push(NodeId(index));
            }
            nodes.push(Node {
                cells: cell_refs.iter().map(|&c| CellId(c)).collect(),
                connectors: Vec::new(),
                siblings: Vec::new(),
                owner: None,
                selectable: false,
            });
        }

        let mut connectors: Vec<Connector> = Vec::with_capacity(layout.connectors.len());
        for (index, &[a, b]) in layout.connectors.iter().enumerate() {
            if a >= nodes.len() {
                return Err(TopologyError::ConnectorNodeOutOfRange {
                    connector: index,
                    node: a,
                });
            }
            if b >= nodes.len() {
                return Err(TopologyError::ConnectorNodeOutOfRange {
                    connector: index,
                    node: b,
                });
            }
            if a == b {
                return Err(TopologyError::DegenerateConnector { connector: index });
            }

            let common: Vec<CellId> = nodes[a]
                .cells
                .iter()
                .filter(|c| nodes[b].cells.contains(*c))
                .copied()
                .collect();
            if common.is_empty() || common.len() > 2 {
                return Err(TopologyError::CommonCells {
                    connector: index,
                    found: common.len(),
                });
            }

            let id = ConnectorId(index);
            nodes[a].connectors.push(id);
            nodes[b].connectors.push(id);
            nodes[a].siblings.push(NodeId(b));
            nodes[b].siblings.push(NodeId(a));

            connectors.push(Connector {
                nodes: [NodeId(a), NodeId(b)],
                cells: common,
                owner: None,
                selectable: false,
            });
        }

        let deserts: Vec<usize> = cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.terrain == Terrain::Desert)
            .map(|(i, _)| i)
            .collect();
        if deserts.len() != 1 {
            return Err(TopologyError::RobberSeat(deserts.len()));
        }
        let robber = CellId(deserts[0]);
        cells[robber.0].has_robber = true;

        Ok(Self {
            cells,
            nodes,
            connectors,
            robber,
        })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn connector(&self, id: ConnectorId) -> &Connector {
        &self.connectors[id.0]
    }

    /// The cell currently holding the robber.
    pub fn robber(&self) -> CellId {
        self.robber
    }

    /// Land cells producing on the given dice sum, robber-blocked cells
    /// included (callers filter on `has_robber`).
    pub fn cells_with_roll(&self, roll: u8) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| cell.roll == Some(roll))
            .map(|(i, cell)| (CellId(i), cell))
    }

    /// Relocate the robber. Only the two flags change; the caller is
    /// responsible for the must-differ rule.
    pub(crate) fn move_robber(&mut self, to: CellId) {
        self.cells[self.robber.0].has_robber = false;
        self.cells[to.0].has_robber = true;
        self.robber = to;
    }

    /// Claim a node. Ownership is write-once for the lifetime of a game.
    pub(crate) fn claim_node(&mut self, id: NodeId, player: PlayerId) {
        debug_assert!(self.nodes[id.0].owner.is_none(), "node owner is write-once");
        self.nodes[id.0].owner = Some(player);
    }

    /// Claim a connector. Ownership is write-once for the lifetime of a game.
    pub(crate) fn claim_connector(&mut self, id: ConnectorId, player: PlayerId) {
        debug_assert!(
            self.connectors[id.0].owner.is_none(),
            "connector owner is write-once"
        );
        self.connectors[id.0].owner = Some(player);
    }

    pub(crate) fn set_cell_selectable(&mut self, id: CellId, selectable: bool) {
        self.cells[id.0].selectable = selectable;
    }

    pub(crate) fn set_node_selectable(&mut self, id: NodeId, selectable: bool) {
        self.nodes[id.0].selectable = selectable;
    }

    pub(crate) fn set_connector_selectable(&mut self, id: ConnectorId, selectable: bool) {
        self.connectors[id.0].selectable = selectable;
    }
}
