//! Stead - a settlers-style village building game engine.
//!
//! This crate provides the complete rules engine: the board graph, the
//! per-player card ledger, the turn/phase state machine, and the typed
//! observer layer that keeps a rendering front-end in sync with authoritative
//! game state.
//!
//! # Architecture
//!
//! The engine is synchronous and single-threaded. Input arrives as resolved
//! clicks ([`events::ClickTarget`]); every state change is announced through
//! per-entity-kind channels ([`events::Signals`]) that a renderer or summary
//! panel subscribes to. Rendering itself lives outside this crate - observers
//! only read snapshots, they never mutate game state.
//!
//! # Modules
//!
//! - [`signal`]: the publish/subscribe primitive everything builds on
//! - [`layout`]: board layout provider (cell/node/connector descriptors)
//! - [`board`]: the immutable topology graph with robber/ownership state
//! - [`cards`]: resources, costs, and the selectable-card ledger
//! - [`player`]: per-player piece pools and setup bookkeeping
//! - [`game`]: the turn/phase state machine
//! - [`control`]: label/enabled table for the primary action control
//! - [`events`]: input targets and change notifications

pub mod board;
pub mod cards;
pub mod control;
pub mod events;
pub mod game;
pub mod layout;
pub mod player;
pub mod signal;

// Re-export commonly used types
pub use board::{Board, Cell, CellId, Connector, ConnectorId, Node, NodeId, PlayerId, TopologyError};
pub use cards::{costs, Card, CardId, Hand, Resource, ResourceSet, Terrain};
pub use control::{control_state, ControlState};
pub use events::{CellChange, ClickTarget, ConnectorChange, GameChange, NodeChange, PlayerChange, Signals};
pub use game::{setup_order, Game, GameConfig, GameError, PendingAction, Phase, DISCARD_THRESHOLD};
pub use layout::{BoardLayout, CellSpec};
pub use player::{Player, CITIES_PER_PLAYER, ROADS_PER_PLAYER, VILLAGES_PER_PLAYER};
pub use signal::Signal;
