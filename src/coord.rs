use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;


// Rank. Zero-based internally: `Row::_1` has index 0.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Row {
    idx: u8,
}

impl Row {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_ROWS);
        Self { idx }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('1' as u32)?;
        (idx < NUM_ROWS as u32).then(|| Self::from_zero_based(idx as u8))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'1') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_ROWS).map(Self::from_zero_based)
    }
}


// File. Zero-based internally: `Col::A` has index 0.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Col {
    idx: u8,
}

impl Col {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_COLS);
        Self { idx }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('a' as u32)?;
        (idx < NUM_COLS as u32).then(|| Self::from_zero_based(idx as u8))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_COLS).map(Self::from_zero_based)
    }
}


// A board square. Ordered rank-first so that sorted collections read naturally bottom-up.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: Row,
    pub col: Col,
}

impl Coord {
    pub const fn new(row: Row, col: Col) -> Self { Self { row, col } }

    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (col, row) = s.chars().collect_tuple()?;
        Some(Coord {
            row: Row::from_algebraic(row)?,
            col: Col::from_algebraic(col)?,
        })
    }
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }

    pub fn all() -> impl Iterator<Item = Coord> {
        Row::all().cartesian_product(Col::all()).map(|(row, col)| Coord { row, col })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Coord({})", self) }
}

// Squares travel over the wire as plain "e4" strings, both as values and as map keys.
impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Coord::from_algebraic(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid square: \"{}\"", s)))
    }
}


macro_rules! named_rows {
    ($($name:ident = $ch:literal),* $(,)?) => {
        impl Row {
            $(pub const $name: Row = Row::from_zero_based($ch as u8 - b'1');)*
        }
    };
}

macro_rules! named_cols {
    ($($name:ident = $ch:literal),* $(,)?) => {
        impl Col {
            $(pub const $name: Col = Col::from_zero_based($ch as u8 - b'a');)*
        }
    };
}

macro_rules! named_coords {
    ($($col:ident: [$($name:ident = $row:ident),*]),* $(,)?) => {
        impl Coord {
            $($(pub const $name: Coord = Coord::new(Row::$row, Col::$col);)*)*
        }
    };
}

named_rows!(_1 = '1', _2 = '2', _3 = '3', _4 = '4', _5 = '5', _6 = '6', _7 = '7', _8 = '8');
named_cols!(A = 'a', B = 'b', C = 'c', D = 'd', E = 'e', F = 'f', G = 'g', H = 'h');
named_coords!(
    A: [A1 = _1, A2 = _2, A3 = _3, A4 = _4, A5 = _5, A6 = _6, A7 = _7, A8 = _8],
    B: [B1 = _1, B2 = _2, B3 = _3, B4 = _4, B5 = _5, B6 = _6, B7 = _7, B8 = _8],
    C: [C1 = _1, C2 = _2, C3 = _3, C4 = _4, C5 = _5, C6 = _6, C7 = _7, C8 = _8],
    D: [D1 = _1, D2 = _2, D3 = _3, D4 = _4, D5 = _5, D6 = _6, D7 = _7, D8 = _8],
    E: [E1 = _1, E2 = _2, E3 = _3, E4 = _4, E5 = _5, E6 = _6, E7 = _7, E8 = _8],
    F: [F1 = _1, F2 = _2, F3 = _3, F4 = _4, F5 = _5, F6 = _6, F7 = _7, F8 = _8],
    G: [G1 = _1, G2 = _2, G3 = _3, G4 = _4, G5 = _5, G6 = _6, G7 = _7, G8 = _8],
    H: [H1 = _1, H2 = _2, H3 = _3, H4 = _4, H5 = _5, H6 = _6, H7 = _7, H8 = _8],
);
