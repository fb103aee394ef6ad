// Move ledger: moves confirmed by the server, paired into numbered turn rows. Append-only
// within a game; cleared only when a new game starts.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::coord::Coord;
use crate::piece::PromotionTarget;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveNotation {
    pub from: Coord,
    pub to: Coord,
    pub promote_to: Option<PromotionTarget>,
}

// `e2-e4`, or `e7-e8=Q` for promotions.
impl fmt::Display for MoveNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)?;
        if let Some(promote_to) = self.promote_to {
            write!(f, "={}", promote_to.to_algebraic())?;
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct TurnRow {
    pub number: u32,
    pub white: String,
    // Empty until the following half-move is appended.
    pub black: String,
}

#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct MoveHistory {
    rows: Vec<TurnRow>,
    num_moves: usize,
}

impl MoveHistory {
    pub fn new() -> Self { Self::default() }

    pub fn rows(&self) -> &[TurnRow] { &self.rows }
    pub fn num_moves(&self) -> usize { self.num_moves }
    pub fn is_empty(&self) -> bool { self.num_moves == 0 }

    // Even move count: the move opens a new row. Odd: it fills the black half of the last row.
    pub fn append(&mut self, notation: MoveNotation) {
        let text = notation.to_string();
        let number = (self.num_moves / 2 + 1) as u32;
        if self.num_moves % 2 == 0 {
            self.rows.push(TurnRow { number, white: text, black: String::new() });
        } else if let Some(last) = self.rows.last_mut() {
            last.black = text;
        }
        self.num_moves += 1;
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.num_moves = 0;
    }

    // The most recent `limit` rows: what a list scrolled to the bottom shows.
    pub fn visible_rows(&self, limit: usize) -> &[TurnRow] {
        &self.rows[self.rows.len().saturating_sub(limit)..]
    }

    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| format!("{}. {} {}", row.number, row.white, row.black).trim_end().to_owned())
            .join("\n")
    }
}
