use derive_new::new;
use enum_map::Enum;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use strum::EnumIter;

use crate::force::Force;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

// A piece has no identity beyond the square it occupies: the board is rebuilt wholesale from
// every position string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, new)]
pub struct Piece {
    pub kind: PieceKind,
    pub force: Force,
}

// What a pawn may become. Travels over the wire as an uppercase letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter)]
pub enum PromotionTarget {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl PieceKind {
    pub fn to_full_algebraic(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_algebraic_char(notation: char) -> Option<Self> {
        match notation {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

impl Piece {
    // Uppercase for white, lowercase for black.
    pub fn to_ascii(self) -> char {
        let ch = self.kind.to_full_algebraic();
        match self.force {
            Force::White => ch,
            Force::Black => ch.to_ascii_lowercase(),
        }
    }

    pub fn from_ascii(ch: char) -> Option<Self> {
        let kind = PieceKind::from_algebraic_char(ch.to_ascii_uppercase())?;
        let force = if ch.is_ascii_uppercase() { Force::White } else { Force::Black };
        Some(Piece { kind, force })
    }

    pub fn to_pictogram(self) -> char { piece_to_pictogram(self.kind, self.force) }
}

impl PromotionTarget {
    pub fn to_piece_kind(self) -> PieceKind {
        match self {
            PromotionTarget::Knight => PieceKind::Knight,
            PromotionTarget::Bishop => PieceKind::Bishop,
            PromotionTarget::Rook => PieceKind::Rook,
            PromotionTarget::Queen => PieceKind::Queen,
        }
    }

    pub fn from_piece_kind(kind: PieceKind) -> Option<Self> {
        match kind {
            PieceKind::Knight => Some(PromotionTarget::Knight),
            PieceKind::Bishop => Some(PromotionTarget::Bishop),
            PieceKind::Rook => Some(PromotionTarget::Rook),
            PieceKind::Queen => Some(PromotionTarget::Queen),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    pub fn to_algebraic(self) -> char { self.to_piece_kind().to_full_algebraic() }

    // Accepts either case: users type "q" as readily as "Q".
    pub fn from_algebraic_char(ch: char) -> Option<Self> {
        PieceKind::from_algebraic_char(ch.to_ascii_uppercase()).and_then(Self::from_piece_kind)
    }
}

impl Serialize for PromotionTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_algebraic().encode_utf8(&mut [0; 4]))
    }
}

impl<'de> Deserialize<'de> for PromotionTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self::from_algebraic_char(ch),
            _ => None,
        }
        .ok_or_else(|| de::Error::custom(format!("invalid promotion target: \"{}\"", s)))
    }
}

pub fn piece_to_pictogram(piece_kind: PieceKind, force: Force) -> char {
    use self::Force::*;
    use self::PieceKind::*;
    match (force, piece_kind) {
        (White, Pawn) => '♙',
        (White, Knight) => '♘',
        (White, Bishop) => '♗',
        (White, Rook) => '♖',
        (White, Queen) => '♕',
        (White, King) => '♔',
        (Black, Pawn) => '♟',
        (Black, Knight) => '♞',
        (Black, Bishop) => '♝',
        (Black, Rook) => '♜',
        (Black, Queen) => '♛',
        (Black, King) => '♚',
    }
}


#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn ascii_is_case_sensitive() {
        assert_eq!(Piece::from_ascii('K'), Some(Piece::new(PieceKind::King, Force::White)));
        assert_eq!(Piece::from_ascii('k'), Some(Piece::new(PieceKind::King, Force::Black)));
        assert_eq!(Piece::from_ascii('x'), None);
        assert_eq!(Piece::from_ascii('1'), None);
        for kind in PieceKind::iter() {
            for force in [Force::White, Force::Black] {
                let piece = Piece::new(kind, force);
                assert_eq!(Piece::from_ascii(piece.to_ascii()), Some(piece));
            }
        }
    }

    #[test]
    fn promotion_targets() {
        assert_eq!(PromotionTarget::iter().count(), 4);
        assert_eq!(PromotionTarget::from_piece_kind(PieceKind::King), None);
        assert_eq!(PromotionTarget::from_algebraic_char('q'), Some(PromotionTarget::Queen));
        assert_eq!(PromotionTarget::from_algebraic_char('P'), None);
        assert_eq!(serde_json::to_string(&PromotionTarget::Knight).unwrap(), "\"N\"");
        assert_eq!(
            serde_json::from_str::<PromotionTarget>("\"R\"").unwrap(),
            PromotionTarget::Rook
        );
    }
}
