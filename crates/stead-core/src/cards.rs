//! Resource cards and the per-player ledger.
//!
//! Two representations coexist on purpose: [`ResourceSet`] is a per-type
//! counter used for build costs and requirement checks, while [`Hand`] is the
//! canonical list of individually selectable [`Card`]s a player holds. The
//! list model is what the discard flow needs - each card carries its own
//! selection flag that the summary panel toggles.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The five producible resources.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    Wood,
    Brick,
    Wheat,
    Sheep,
    Ore,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Wood,
        Resource::Brick,
        Resource::Wheat,
        Resource::Sheep,
        Resource::Ore,
    ];
}

/// Terrain of a board cell: producing land, the desert, or ocean filler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    Producing(Resource),
    Desert,
    Ocean,
}

impl Terrain {
    /// The resource this terrain yields, if any.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Terrain::Producing(r) => Some(*r),
            Terrain::Desert | Terrain::Ocean => None,
        }
    }
}

/// A per-type bundle of resource counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSet {
    pub wood: u32,
    pub brick: u32,
    pub wheat: u32,
    pub sheep: u32,
    pub ore: u32,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amounts(wood: u32, brick: u32, wheat: u32, sheep: u32, ore: u32) -> Self {
        Self {
            wood,
            brick,
            wheat,
            sheep,
            ore,
        }
    }

    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wood => self.wood,
            Resource::Brick => self.brick,
            Resource::Wheat => self.wheat,
            Resource::Sheep => self.sheep,
            Resource::Ore => self.ore,
        }
    }

    pub fn add(&mut self, resource: Resource, amount: u32) {
        match resource {
            Resource::Wood => self.wood += amount,
            Resource::Brick => self.brick += amount,
            Resource::Wheat => self.wheat += amount,
            Resource::Sheep => self.sheep += amount,
            Resource::Ore => self.ore += amount,
        }
    }

    pub fn total(&self) -> u32 {
        self.wood + self.brick + self.wheat + self.sheep + self.ore
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Fixed building costs.
pub mod costs {
    use super::ResourceSet;

    /// A village costs 1 wood, 1 brick, 1 wheat, 1 sheep.
    pub fn village() -> ResourceSet {
        ResourceSet::with_amounts(1, 1, 1, 1, 0)
    }

    /// A road costs 1 wood, 1 brick.
    pub fn road() -> ResourceSet {
        ResourceSet::with_amounts(1, 1, 0, 0, 0)
    }
}

/// Identifier of a card within one player's hand. Stable for the card's
/// lifetime; never reused after a discard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CardId(pub u32);

/// One resource card with its selection flag for the discard flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub resource: Resource,
    pub selected: bool,
}

/// A player's hand of resource cards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    next_id: u32,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Number of cards of one resource type.
    pub fn count(&self, resource: Resource) -> u32 {
        self.cards.iter().filter(|c| c.resource == resource).count() as u32
    }

    /// Append a fresh, unselected card and return its id.
    pub fn draw(&mut self, resource: Resource) -> CardId {
        let id = CardId(self.next_id);
        self.next_id += 1;
        self.cards.push(Card {
            id,
            resource,
            selected: false,
        });
        id
    }

    /// Does the hand contain at least the given counts of each type?
    pub fn has_cards(&self, requirements: &ResourceSet) -> bool {
        Resource::ALL
            .iter()
            .all(|&r| self.count(r) >= requirements.get(r))
    }

    /// Remove exactly the given counts, taking the first match per unit.
    ///
    /// Must only be called after [`Hand::has_cards`] succeeded; returns false
    /// and removes nothing otherwise.
    pub fn use_cards(&mut self, requirements: &ResourceSet) -> bool {
        if !self.has_cards(requirements) {
            return false;
        }
        for &resource in &Resource::ALL {
            for _ in 0..requirements.get(resource) {
                let pos = self
                    .cards
                    .iter()
                    .position(|c| c.resource == resource)
                    .expect("has_cards checked above");
                self.cards.remove(pos);
            }
        }
        true
    }

    /// Flip one card's selection flag; returns the new state, or None for an
    /// unknown id.
    pub fn toggle(&mut self, id: CardId) -> Option<bool> {
        let card = self.cards.iter_mut().find(|c| c.id == id)?;
        card.selected = !card.selected;
        Some(card.selected)
    }

    pub fn selected_count(&self) -> usize {
        self.cards.iter().filter(|c| c.selected).count()
    }

    pub fn clear_selection(&mut self) {
        for card in &mut self.cards {
            card.selected = false;
        }
    }

    /// Remove every selected card, leaving the rest untouched. Returns how
    /// many were removed.
    pub fn discard_selected(&mut self) -> usize {
        let before = self.cards.len();
        self.cards.retain(|c| !c.selected);
        before - self.cards.len()
    }

    /// Per-type counts of the whole hand, for display.
    pub fn as_set(&self) -> ResourceSet {
        let mut set = ResourceSet::new();
        for card in &self.cards {
            set.add(card.resource, 1);
        }
        set
    }
}
