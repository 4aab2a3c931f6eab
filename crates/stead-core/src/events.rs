//! Input and notification types.
//!
//! [`ClickTarget`] is the closed set of things a pointer can land on, so click
//! dispatch is exhaustive and checked at build time. The change types are the
//! per-entity-kind events carried by the [`Signals`] hub; observers receive
//! arena ids and read whatever state they need through the engine's queries.

use crate::board::{CellId, ConnectorId, NodeId, PlayerId};
use crate::cards::CardId;
use crate::game::{PendingAction, Phase};
use crate::signal::Signal;

/// What a raw click resolved to. Hit-testing (node over connector over cell)
/// is the rendering adapter's job; the engine only sees the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Node(NodeId),
    Connector(ConnectorId),
    Cell(CellId),
    /// The primary action control.
    Control,
}

/// A cell's display-relevant state changed (robber or highlight).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub cell: CellId,
}

/// A node's display-relevant state changed (owner or highlight).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeChange {
    pub node: NodeId,
}

/// A connector's display-relevant state changed (owner or highlight).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorChange {
    pub connector: ConnectorId,
}

/// Something about one player changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerChange {
    /// Catch-all refresh: hand contents, piece counts.
    State { player: PlayerId },
    /// A card entered the hand. The UI subscribes here to wire up the new
    /// card's toggle control.
    CardDrawn { player: PlayerId, card: CardId },
    /// A card's discard-selection flag flipped.
    CardToggled {
        player: PlayerId,
        card: CardId,
        selected: bool,
    },
}

/// Something about the game aggregate changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameChange {
    Phase(Phase),
    Action(PendingAction),
    CurrentPlayer(PlayerId),
    Dice(u8, u8),
}

/// One notification channel per entity kind.
#[derive(Debug, Default)]
pub struct Signals {
    pub cells: Signal<CellChange>,
    pub nodes: Signal<NodeChange>,
    pub connectors: Signal<ConnectorChange>,
    pub players: Signal<PlayerChange>,
    pub game: Signal<GameChange>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }
}
