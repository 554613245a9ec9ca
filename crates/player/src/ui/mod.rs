//! Console presentation for the runner binary

pub mod board_text;
pub mod commands;

pub use board_text::{render_board, render_moves, render_status};
pub use commands::{CommandError, ConsoleCommand};
