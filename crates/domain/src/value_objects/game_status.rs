use serde::{Deserialize, Serialize};

/// Lifecycle of one game instance as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Room created, second player has not joined yet
    #[default]
    Waiting,
    /// Both players seated, moves accepted
    Active,
    Finished,
    Resigned,

    /// Forward-compatibility fallback for newer statuses.
    #[serde(other)]
    Unknown,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Finished | GameStatus::Resigned)
    }
}
