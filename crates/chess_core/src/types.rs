use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shakmaty::{File, Rank, Role, Square, uci::UciMove};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl From<shakmaty::Color> for Color {
    fn from(c: shakmaty::Color) -> Self {
        match c {
            shakmaty::Color::White => Color::White,
            shakmaty::Color::Black => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Why a piece of text is not a move in long-form notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("empty move")]
    Empty,
    /// Wrong length or non-ASCII input.
    #[error("{0:?} is not a move, expected something like e2e4 or e7e8q")]
    Malformed(String),
    #[error("{square:?} is not a square on the board (in {text:?})")]
    Square { text: String, square: String },
    #[error("{piece:?} is not a promotion piece (in {text:?}), use q, r, b or n")]
    Promotion { text: String, piece: char },
    #[error("{0:?} starts and ends on the same square")]
    SameSquare(String),
}

/// A move in long-form notation: origin, destination, optional promotion.
///
/// A `Move` only says which squares are involved. Whether it can be played
/// is a question for a [`RulesOracle`](crate::RulesOracle) and a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Role>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(self, role: Role) -> Self {
        Self {
            promotion: Some(role),
            ..self
        }
    }

    pub fn from(&self) -> Square {
        self.from
    }

    pub fn to(&self) -> Square {
        self.to
    }

    pub fn promotion(&self) -> Option<Role> {
        self.promotion
    }

    pub(crate) fn to_uci(self) -> UciMove {
        UciMove::Normal {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    /// Drops and null moves have no long-form equivalent.
    pub(crate) fn from_uci(uci: &UciMove) -> Option<Move> {
        match *uci {
            UciMove::Normal {
                from,
                to,
                promotion,
            } => Some(Move {
                from,
                to,
                promotion,
            }),
            _ => None,
        }
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        if text.is_empty() {
            return Err(MoveParseError::Empty);
        }
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(MoveParseError::Malformed(text));
        }

        let from = parse_square(&text, &text[0..2])?;
        let to = parse_square(&text, &text[2..4])?;
        if from == to {
            return Err(MoveParseError::SameSquare(text));
        }

        let promotion = match text.as_bytes().get(4) {
            None => None,
            Some(&b) => Some(promotion_role(b as char).ok_or_else(|| {
                MoveParseError::Promotion {
                    text: text.clone(),
                    piece: b as char,
                }
            })?),
        };

        Ok(Move {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", promotion_char(role))?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Move {
    type Error = MoveParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Move> for String {
    fn from(mv: Move) -> Self {
        mv.to_string()
    }
}

fn parse_square(text: &str, coord: &str) -> Result<Square, MoveParseError> {
    let b = coord.as_bytes();
    let (f, r) = (b[0], b[1]);
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return Err(MoveParseError::Square {
            text: text.to_string(),
            square: coord.to_string(),
        });
    }
    Ok(Square::from_coords(
        File::new(u32::from(f - b'a')),
        Rank::new(u32::from(r - b'1')),
    ))
}

fn promotion_role(c: char) -> Option<Role> {
    match c {
        'q' => Some(Role::Queen),
        'r' => Some(Role::Rook),
        'b' => Some(Role::Bishop),
        'n' => Some(Role::Knight),
        _ => None,
    }
}

fn promotion_char(role: Role) -> char {
    match role {
        Role::Queen => 'q',
        Role::Rook => 'r',
        Role::Bishop => 'b',
        Role::Knight => 'n',
        Role::King => 'k',
        Role::Pawn => 'p',
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
