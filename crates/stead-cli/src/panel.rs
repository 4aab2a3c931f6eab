//! Console summary panel.
//!
//! Subscribes to the engine's change signals and marks itself dirty; the main
//! loop repaints once per command, the console stand-in for the once-per-frame
//! repaint a canvas renderer would do. The panel only ever reads game state.

use std::cell::Cell;
use std::rc::Rc;

use stead_core::{control_state, Game, Phase, Resource, Terrain};

pub struct Panel {
    dirty: Rc<Cell<bool>>,
}

impl Panel {
    /// Wire the panel to every signal the game publishes.
    pub fn attach(game: &Game) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let signals = game.signals();

        let flag = Rc::clone(&dirty);
        signals.game.subscribe(move |_| {
            flag.set(true);
            true
        });
        let flag = Rc::clone(&dirty);
        signals.players.subscribe(move |_| {
            flag.set(true);
            true
        });
        let flag = Rc::clone(&dirty);
        signals.nodes.subscribe(move |_| {
            flag.set(true);
            true
        });
        let flag = Rc::clone(&dirty);
        signals.connectors.subscribe(move |_| {
            flag.set(true);
            true
        });
        let flag = Rc::clone(&dirty);
        signals.cells.subscribe(move |_| {
            flag.set(true);
            true
        });

        Self { dirty }
    }

    /// Read and reset the dirty flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    /// Paint the summary: phase, control, dice, per-player status.
    pub fn render(&self, game: &Game) {
        let control = control_state(game.action());
        let phase = match game.phase() {
            Phase::SetupVillage => "setup: place a village",
            Phase::SetupRoad => "setup: place a road",
            Phase::Turn => "turn",
            Phase::RobberDiscard => "robber: discard",
            Phase::RobberPlace => "robber: place",
        };

        println!("== {phase} | player {} to move ==", game.current_player());
        match game.dice() {
            Some((a, b)) => println!("dice: {a} + {b} = {}", a + b),
            None => println!("dice: not thrown"),
        }
        println!(
            "button: [{}] {}",
            if control.enabled { "x" } else { " " },
            control.label
        );

        for player in game.players() {
            let marker = if player.id == game.current_player() {
                ">"
            } else {
                " "
            };
            let counts = player.hand.as_set();
            let cards: Vec<String> = Resource::ALL
                .iter()
                .filter(|&&r| counts.get(r) > 0)
                .map(|&r| format!("{r} x{}", counts.get(r)))
                .collect();
            println!(
                "{marker} player {}: {} roads, {} villages left, {} cards [{}]",
                player.id,
                player.roads_remaining,
                player.villages_remaining,
                player.hand.len(),
                cards.join(", "),
            );
        }
    }

    /// Paint the board: every owned or highlighted entity plus the robber.
    pub fn render_board(&self, game: &Game) {
        let board = game.board();

        println!("-- cells --");
        for (i, cell) in board.cells().iter().enumerate() {
            let terrain = match cell.terrain {
                Terrain::Producing(r) => format!("{r}"),
                Terrain::Desert => "desert".to_string(),
                Terrain::Ocean => continue,
            };
            let roll = cell
                .roll
                .map(|v| format!(" ({v})"))
                .unwrap_or_default();
            let robber = if cell.has_robber { " [robber]" } else { "" };
            let mark = if cell.selectable { " *" } else { "" };
            println!("  cell {i}: {terrain}{roll}{robber}{mark}");
        }

        println!("-- building sites --");
        for (i, node) in board.nodes().iter().enumerate() {
            match (node.owner, node.selectable) {
                (Some(owner), _) => println!("  node {i}: player {owner}"),
                (None, true) => println!("  node {i}: *"),
                (None, false) => {}
            }
        }

        println!("-- road sites --");
        for (i, connector) in board.connectors().iter().enumerate() {
            match (connector.owner, connector.selectable) {
                (Some(owner), _) => println!("  road {i}: player {owner}"),
                (None, true) => println!("  road {i}: *"),
                (None, false) => {}
            }
        }
    }

    /// Paint the current player's hand with card ids for the toggle command.
    pub fn render_hand(&self, game: &Game) {
        let player = game.player(game.current_player());
        if player.hand.is_empty() {
            println!("player {} holds no cards", player.id);
            return;
        }
        println!("player {}:", player.id);
        for card in player.hand.cards() {
            let mark = if card.selected { "x" } else { " " };
            println!("  card {}: [{mark}] {}", card.id.0, card.resource);
        }
    }
}
