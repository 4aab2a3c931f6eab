//! Stead interactive console front-end.
//!
//! Stands in for the canvas/DOM layer: resolves typed commands into engine
//! clicks and repaints a summary panel whenever the engine announces changes.

use std::io::{self, BufRead, Write};

use clap::Parser;
use stead_core::{ClickTarget, Game, GameConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod panel;

use commands::{Command, HELP};
use panel::Panel;

#[derive(Debug, Parser)]
#[command(name = "stead", about = "A settlers-style village building game")]
struct Args {
    /// Number of players (2-6)
    #[arg(long, default_value_t = 4)]
    players: u8,

    /// Seat that places first (1-based)
    #[arg(long, default_value_t = 1)]
    first: u8,

    /// Dice seed, for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut game = Game::new(GameConfig {
        players: args.players,
        first_player: args.first,
        seed: args.seed,
    })?;
    info!(players = args.players, seed = game.seed(), "game ready");

    let panel = Panel::attach(&game);
    println!("{HELP}");
    panel.render(&game);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match Command::parse(&line) {
            Ok(Command::Click(target)) => {
                if !in_range(&game, target) {
                    println!("no such entity on this board");
                } else if !game.handle_click(target) {
                    println!("nothing happened");
                }
            }
            Ok(Command::Card(card)) => {
                if !game.toggle_card(card) {
                    println!("no card to toggle right now");
                }
            }
            Ok(Command::Hand) => panel.render_hand(&game),
            Ok(Command::Board) => panel.render_board(&game),
            Ok(Command::Dump) => println!("{}", serde_json::to_string_pretty(&game)?),
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => break,
            Err(commands::ParseError::Empty) => {}
            Err(error) => println!("{error}"),
        }

        if panel.take_dirty() {
            panel.render(&game);
        }
    }

    Ok(())
}

/// Clicks carry raw arena indices typed by the user; reject the out-of-range
/// ones a real hit-test could never produce.
fn in_range(game: &Game, target: ClickTarget) -> bool {
    let board = game.board();
    match target {
        ClickTarget::Node(id) => id.0 < board.nodes().len(),
        ClickTarget::Connector(id) => id.0 < board.connectors().len(),
        ClickTarget::Cell(id) => id.0 < board.cells().len(),
        ClickTarget::Control => true,
    }
}
