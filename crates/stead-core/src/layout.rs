//! Board layout provider.
//!
//! Produces the three descriptor lists the topology is built from: an ordered
//! cell list (position, terrain-or-filler, optional production value), the
//! three cells forming each node, and the two nodes forming each connector.
//! Axial hex coordinates are used internally to generate the classic board -
//! 19 land cells in two rings around a center, wrapped by an 18-cell ocean
//! ring - but only descriptor indices leave this module.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::cards::{Resource, Terrain};

/// Land cells on the standard board.
pub const LAND_CELLS: usize = 19;
/// Ocean filler cells surrounding the land.
pub const OCEAN_CELLS: usize = 18;

/// One cell descriptor: where it sits, what it is, what it yields on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSpec {
    /// Center position in unit hex radii, y growing downward.
    pub center: (f64, f64),
    pub terrain: Terrain,
    /// Dice sum that makes this cell produce. None for desert and ocean.
    pub roll: Option<u8>,
}

/// The full descriptor set consumed once at board construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardLayout {
    pub cells: Vec<CellSpec>,
    /// Indices of the three cells meeting at each node.
    pub nodes: Vec<[usize; 3]>,
    /// Indices of the two endpoint nodes of each connector.
    pub connectors: Vec<[usize; 2]>,
}

// Fixed arrangement for the deterministic board: desert in the center, then
// the two land rings read clockwise from the south-west.
const RING1_TERRAIN: [Resource; 6] = [
    Resource::Wood,
    Resource::Sheep,
    Resource::Wheat,
    Resource::Brick,
    Resource::Ore,
    Resource::Wood,
];
const RING1_ROLLS: [u8; 6] = [2, 5, 4, 6, 9, 10];
const RING2_TERRAIN: [Resource; 12] = [
    Resource::Sheep,
    Resource::Wheat,
    Resource::Ore,
    Resource::Wood,
    Resource::Sheep,
    Resource::Brick,
    Resource::Wheat,
    Resource::Ore,
    Resource::Wood,
    Resource::Sheep,
    Resource::Brick,
    Resource::Wheat,
];
const RING2_ROLLS: [u8; 12] = [8, 3, 11, 4, 8, 10, 9, 3, 5, 11, 6, 12];

impl BoardLayout {
    /// The fixed standard board. Terrain and production values are the same
    /// on every call; the desert sits on the center cell.
    pub fn standard() -> Self {
        let mut terrain = Vec::with_capacity(LAND_CELLS);
        terrain.push(Terrain::Desert);
        terrain.extend(RING1_TERRAIN.iter().map(|&r| Terrain::Producing(r)));
        terrain.extend(RING2_TERRAIN.iter().map(|&r| Terrain::Producing(r)));

        let mut rolls = Vec::with_capacity(LAND_CELLS);
        rolls.push(None);
        rolls.extend(RING1_ROLLS.iter().map(|&v| Some(v)));
        rolls.extend(RING2_ROLLS.iter().map(|&v| Some(v)));

        assemble(&terrain, &rolls)
    }

    /// A board with the standard terrain and value pools dealt randomly.
    pub fn shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut pool: Vec<Terrain> = Vec::with_capacity(LAND_CELLS);
        for (resource, count) in [
            (Resource::Wood, 4),
            (Resource::Sheep, 4),
            (Resource::Wheat, 4),
            (Resource::Brick, 3),
            (Resource::Ore, 3),
        ] {
            pool.extend(std::iter::repeat(Terrain::Producing(resource)).take(count));
        }
        pool.push(Terrain::Desert);
        pool.shuffle(rng);

        let mut values: Vec<u8> = vec![2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];
        values.shuffle(rng);

        let mut next = 0;
        let rolls: Vec<Option<u8>> = pool
            .iter()
            .map(|terrain| match terrain {
                Terrain::Producing(_) => {
                    let value = values[next];
                    next += 1;
                    Some(value)
                }
                Terrain::Desert | Terrain::Ocean => None,
            })
            .collect();

        assemble(&pool, &rolls)
    }
}

// ---------------------------------------------------------------------------
// Hex geometry. Pointy-top axial coordinates: q grows east, r grows
// south-east. Every vertex of the triangular lattice is the north or south
// pole of exactly one hex, which makes (hex, pole) a canonical corner key
// with no dedup pass.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Hex {
    q: i32,
    r: i32,
}

const EAST: usize = 0;
const NORTH_EAST: usize = 1;
const NORTH_WEST: usize = 2;
const WEST: usize = 3;
const SOUTH_WEST: usize = 4;
const SOUTH_EAST: usize = 5;

const DIRS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

fn shift(hex: Hex, dir: usize) -> Hex {
    let (dq, dr) = DIRS[dir];
    Hex {
        q: hex.q + dq,
        r: hex.r + dr,
    }
}

fn center(hex: Hex) -> (f64, f64) {
    let x = 3f64.sqrt() * (hex.q as f64 + hex.r as f64 / 2.0);
    let y = 1.5 * hex.r as f64;
    (x, y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Pole {
    North,
    South,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Corner {
    hex: Hex,
    pole: Pole,
}

/// The six corners of a hex, clockwise from the top.
fn corners(hex: Hex) -> [Corner; 6] {
    [
        Corner { hex, pole: Pole::North },
        Corner { hex: shift(hex, NORTH_EAST), pole: Pole::South },
        Corner { hex: shift(hex, SOUTH_EAST), pole: Pole::North },
        Corner { hex, pole: Pole::South },
        Corner { hex: shift(hex, SOUTH_WEST), pole: Pole::North },
        Corner { hex: shift(hex, NORTH_WEST), pole: Pole::South },
    ]
}

/// The three hexes meeting at a corner.
fn corner_hexes(corner: Corner) -> [Hex; 3] {
    match corner.pole {
        Pole::North => [
            corner.hex,
            shift(corner.hex, NORTH_WEST),
            shift(corner.hex, NORTH_EAST),
        ],
        Pole::South => [
            corner.hex,
            shift(corner.hex, SOUTH_WEST),
            shift(corner.hex, SOUTH_EAST),
        ],
    }
}

/// The hexes at ring distance `radius` from the origin, clockwise from the
/// south-west corner of the ring.
fn ring(radius: i32) -> Vec<Hex> {
    let mut out = Vec::with_capacity(6 * radius as usize);
    let mut hex = Hex { q: -radius, r: radius };
    for dir in [EAST, NORTH_EAST, NORTH_WEST, WEST, SOUTH_WEST, SOUTH_EAST] {
        for _ in 0..radius {
            out.push(hex);
            hex = shift(hex, dir);
        }
    }
    out
}

fn assemble(land_terrain: &[Terrain], land_rolls: &[Option<u8>]) -> BoardLayout {
    let land: Vec<Hex> = std::iter::once(Hex { q: 0, r: 0 })
        .chain(ring(1))
        .chain(ring(2))
        .collect();
    let ocean = ring(3);
    debug_assert_eq!(land.len(), LAND_CELLS);
    debug_assert_eq!(land_terrain.len(), LAND_CELLS);
    debug_assert_eq!(ocean.len(), OCEAN_CELLS);

    let mut cells = Vec::with_capacity(land.len() + ocean.len());
    let mut index_of: HashMap<Hex, usize> = HashMap::new();
    for (i, &hex) in land.iter().enumerate() {
        index_of.insert(hex, cells.len());
        cells.push(CellSpec {
            center: center(hex),
            terrain: land_terrain[i],
            roll: land_rolls[i],
        });
    }
    for &hex in &ocean {
        index_of.insert(hex, cells.len());
        cells.push(CellSpec {
            center: center(hex),
            terrain: Terrain::Ocean,
            roll: None,
        });
    }

    // Nodes exist only where land is involved: walk the land cells and claim
    // each corner the first time it is seen.
    let mut nodes: Vec<[usize; 3]> = Vec::new();
    let mut node_of: HashMap<Corner, usize> = HashMap::new();
    for &hex in &land {
        for corner in corners(hex) {
            node_of.entry(corner).or_insert_with(|| {
                nodes.push(corner_hexes(corner).map(|h| index_of[&h]));
                nodes.len() - 1
            });
        }
    }

    // Connectors are the sides of land hexes: consecutive corners around the
    // ring, deduplicated as unordered node pairs.
    let mut connectors: Vec<[usize; 2]> = Vec::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    for &hex in &land {
        let ring_nodes = corners(hex).map(|c| node_of[&c]);
        for i in 0..6 {
            let a = ring_nodes[i];
            let b = ring_nodes[(i + 1) % 6];
            if seen.insert((a.min(b), a.max(b))) {
                connectors.push([a, b]);
            }
        }
    }

    BoardLayout {
        cells,
        nodes,
        connectors,
    }
}
