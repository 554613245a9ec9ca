//! Stdin command parsing

use thiserror::Error;

use rookline_domain::{DomainError, Square};

pub const HELP: &str = "\
commands:
  e2 e4      move a piece (also e2e4 or e2-e4)
  /resign    resign the game
  /undo      ask to take back the last move
  /rematch   ask for a rematch
  /call      start a voice call
  /help      show this help
  /quit      leave the room";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Move { from: Square, to: Square },
    Resign,
    Undo,
    Rematch,
    Call,
    Help,
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error(transparent)]
    Square(#[from] DomainError),
}

impl std::str::FromStr for ConsoleCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if let Some(command) = line.strip_prefix('/') {
            return match command.to_ascii_lowercase().as_str() {
                "resign" => Ok(Self::Resign),
                "undo" => Ok(Self::Undo),
                "rematch" => Ok(Self::Rematch),
                "call" => Ok(Self::Call),
                "help" | "?" => Ok(Self::Help),
                "quit" | "exit" | "leave" => Ok(Self::Quit),
                _ => Err(CommandError::Unknown(line.to_string())),
            };
        }

        let squares: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|s| !s.is_empty())
            .collect();
        let (from, to) = match squares.as_slice() {
            [from, to] => (*from, *to),
            [joined] if joined.len() == 4 && joined.is_ascii() => joined.split_at(2),
            _ => return Err(CommandError::Unknown(line.to_string())),
        };
        Ok(Self::Move {
            from: from.parse()?,
            to: to.parse()?,
        })
    }
}
