//! Board-level value types shared by the safety analyzer and the detectors.

use shakmaty::{Board, Color, File, Move, Piece, Rank, Role, Square};

/// Material value of a piece. The king is priceless.
pub fn piece_value(role: Role) -> f64 {
    match role {
        Role::Pawn => 1.0,
        Role::Knight | Role::Bishop => 3.0,
        Role::Rook => 5.0,
        Role::Queen => 9.0,
        Role::King => f64::INFINITY,
    }
}

/// A piece standing on a square of some board snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPiece {
    pub square: Square,
    pub role: Role,
    pub color: Color,
}

impl BoardPiece {
    pub fn new(square: Square, piece: Piece) -> Self {
        Self {
            square,
            role: piece.role,
            color: piece.color,
        }
    }

    /// Look up the piece on `square`.
    pub fn at(board: &Board, square: Square) -> Option<Self> {
        board.piece_at(square).map(|piece| Self::new(square, piece))
    }

    pub fn piece(&self) -> Piece {
        self.role.of(self.color)
    }

    pub fn value(&self) -> f64 {
        piece_value(self.role)
    }
}

/// A candidate move used for attacker/defender bookkeeping.
///
/// Two raw moves are equal when they move the same piece between the same
/// squares; the promotion is ignored.
#[derive(Debug, Clone, Copy, Eq)]
pub struct RawMove {
    pub role: Role,
    pub color: Color,
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl PartialEq for RawMove {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.role == other.role
            && self.color == other.color
    }
}

impl RawMove {
    /// Move `piece` from `from` to `to`. Pawns reaching the last rank become queens.
    pub fn new(piece: Piece, from: Square, to: Square) -> Self {
        let promotion = (piece.role == Role::Pawn && to.rank() == last_rank(piece.color))
            .then_some(Role::Queen);
        Self {
            role: piece.role,
            color: piece.color,
            from,
            to,
            promotion,
        }
    }

    /// The piece making the move, on its origin square.
    pub fn mover(&self) -> BoardPiece {
        BoardPiece {
            square: self.from,
            role: self.role,
            color: self.color,
        }
    }

    /// The piece that stands on `to` once the move is made.
    pub fn landed(&self) -> BoardPiece {
        BoardPiece {
            square: self.to,
            role: self.promotion.unwrap_or(self.role),
            color: self.color,
        }
    }
}

/// The move just played, as seen by the safety analyzer and the detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub role: Role,
    pub color: Color,
    pub from: Square,
    /// Destination of the moving piece. For castling this is the king's square.
    pub to: Square,
    pub captured: Option<Role>,
    pub promotion: Option<Role>,
}

impl PlayedMove {
    /// Describe `m`, played by `color`.
    pub fn from_move(m: &Move, color: Color) -> Self {
        match *m {
            Move::Normal {
                role,
                from,
                capture,
                to,
                promotion,
            } => Self {
                role,
                color,
                from,
                to,
                captured: capture,
                promotion,
            },
            Move::EnPassant { from, to } => Self {
                role: Role::Pawn,
                color,
                from,
                to,
                captured: Some(Role::Pawn),
                promotion: None,
            },
            Move::Castle { king, rook } => {
                let file = if rook.file() > king.file() { File::G } else { File::C };
                Self {
                    role: Role::King,
                    color,
                    from: king,
                    to: Square::from_coords(file, king.rank()),
                    captured: None,
                    promotion: None,
                }
            }
            Move::Put { role, to } => Self {
                role,
                color,
                from: to,
                to,
                captured: None,
                promotion: None,
            },
        }
    }

    /// Describe a raw move played on `board`.
    pub fn from_raw(board: &Board, mv: &RawMove) -> Self {
        Self {
            role: mv.role,
            color: mv.color,
            from: mv.from,
            to: mv.to,
            captured: board.piece_at(mv.to).map(|p| p.role),
            promotion: mv.promotion,
        }
    }

    /// Square of the piece that was captured, looked up on the board the
    /// move was played from.
    pub fn capture_square(&self, before: &Board) -> Option<Square> {
        self.captured?;
        if self.role == Role::Pawn && before.piece_at(self.to).is_none() {
            // En passant: the captured pawn stands beside the origin square.
            return Some(Square::from_coords(self.to.file(), self.from.rank()));
        }
        Some(self.to)
    }
}

pub(crate) fn last_rank(color: Color) -> Rank {
    match color {
        Color::White => Rank::Eighth,
        Color::Black => Rank::First,
    }
}

/// Serialize a colour as `"white"` / `"black"`.
pub(crate) mod serde_color {
    use serde::{Deserialize, Deserializer, Serializer};
    use shakmaty::Color;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match color {
            Color::White => "white",
            Color::Black => "black",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "white" => Ok(Color::White),
            "black" => Ok(Color::Black),
            other => Err(serde::de::Error::unknown_variant(other, &["white", "black"])),
        }
    }
}
