//! Console command parsing.
//!
//! Each command names an entity by arena index, standing in for the pointer
//! hit-testing a canvas front-end would do before handing the engine a
//! resolved click target.

use stead_core::{CardId, CellId, ClickTarget, ConnectorId, NodeId};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Click(ClickTarget),
    /// Toggle a card of the discarding player's hand.
    Card(CardId),
    Hand,
    Board,
    Dump,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("'{0}' needs an index, e.g. '{0} 3'")]
    MissingIndex(&'static str),

    #[error("'{0}' is not a valid index")]
    BadIndex(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut tokens = line.split_whitespace();
        let head = tokens.next().ok_or(ParseError::Empty)?;
        let index = |name| {
            let token = tokens.clone().next().ok_or(ParseError::MissingIndex(name))?;
            token
                .parse::<usize>()
                .map_err(|_| ParseError::BadIndex(token.to_string()))
        };

        match head {
            "node" | "n" => Ok(Command::Click(ClickTarget::Node(NodeId(index("node")?)))),
            "road" | "r" => Ok(Command::Click(ClickTarget::Connector(ConnectorId(index(
                "road",
            )?)))),
            "cell" | "c" => Ok(Command::Click(ClickTarget::Cell(CellId(index("cell")?)))),
            "button" | "b" => Ok(Command::Click(ClickTarget::Control)),
            "card" => Ok(Command::Card(CardId(index("card")? as u32))),
            "hand" => Ok(Command::Hand),
            "board" => Ok(Command::Board),
            "dump" => Ok(Command::Dump),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

pub const HELP: &str = "\
commands:
  node <i>     click building site i
  road <i>     click road site i
  cell <i>     click hex i (robber placement)
  button       press the action control
  card <i>     toggle card i for the discard selection
  hand         show the current player's cards
  board        show the board state
  dump         dump the full game state as JSON
  help         this text
  quit         leave the game";
