//! Player state: piece pools, the card ledger, and setup bookkeeping.

use serde::{Deserialize, Serialize};

use crate::board::{NodeId, PlayerId};
use crate::cards::Hand;

/// Roads in each player's supply at game start.
pub const ROADS_PER_PLAYER: u32 = 15;
/// Villages in each player's supply at game start.
pub const VILLAGES_PER_PLAYER: u32 = 5;
/// Cities in each player's supply at game start. Tracked for completeness;
/// city building is not wired up yet.
pub const CITIES_PER_PLAYER: u32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Seat number, 1-based.
    pub id: PlayerId,
    pub hand: Hand,
    pub roads_remaining: u32,
    pub villages_remaining: u32,
    pub cities_remaining: u32,
    /// The node claimed in this player's current setup turn. Set by the
    /// village placement, read by the road-legality check, cleared once the
    /// matching road is down.
    pub setup_node: Option<NodeId>,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            hand: Hand::new(),
            roads_remaining: ROADS_PER_PLAYER,
            villages_remaining: VILLAGES_PER_PLAYER,
            cities_remaining: CITIES_PER_PLAYER,
            setup_node: None,
        }
    }

    /// Pieces placed on the board so far.
    pub fn roads_placed(&self) -> u32 {
        ROADS_PER_PLAYER - self.roads_remaining
    }

    pub fn villages_placed(&self) -> u32 {
        VILLAGES_PER_PLAYER - self.villages_remaining
    }
}
