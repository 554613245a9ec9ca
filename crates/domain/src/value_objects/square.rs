use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A board square label, `a1` through `h8`.
///
/// Ordering is by file then rank, which keeps board dumps stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Build from zero-based file (`a` = 0) and rank (`1` = 0).
    pub fn from_coords(file: u8, rank: u8) -> Result<Self, DomainError> {
        if file > 7 || rank > 7 {
            return Err(DomainError::InvalidSquare(format!("({file}, {rank})")));
        }
        Ok(Self { file, rank })
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(b'a' + self.file), self.rank + 1)
    }
}

impl std::str::FromStr for Square {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Ok(Self {
                file: file - b'a',
                rank: rank - b'1',
            }),
            _ => Err(DomainError::InvalidSquare(s.to_string())),
        }
    }
}

impl TryFrom<String> for Square {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(value: Square) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_corner_squares() {
        let a1: Square = "a1".parse().expect("a1");
        let h8: Square = "h8".parse().expect("h8");
        assert_eq!((a1.file(), a1.rank()), (0, 0));
        assert_eq!((h8.file(), h8.rank()), (7, 7));
        assert_eq!(h8.to_string(), "h8");
    }

    #[test]
    fn rejects_off_board_labels() {
        for label in ["i1", "a9", "a0", "", "e22", "E2"] {
            assert!(label.parse::<Square>().is_err(), "{label} should be rejected");
        }
        assert!(Square::from_coords(8, 0).is_err());
    }
}
