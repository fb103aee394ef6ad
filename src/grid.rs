use std::ops;

use ndarray::{Array, Array2};

use crate::coord::{Coord, NUM_COLS, NUM_ROWS};
use crate::force::Force;
use crate::piece::{Piece, PieceKind};


// Square -> piece mapping for one position. Empty squares hold `None`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Grid {
    data: Array2<Option<Piece>>,
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            data: Array::from_elem((NUM_ROWS as usize, NUM_COLS as usize), None),
        }
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(|coord| self[coord].map(|piece| (coord, piece)))
    }

    pub fn num_pieces(&self) -> usize { self.data.iter().flatten().count() }

    pub fn find_king(&self, force: Force) -> Option<Coord> {
        self.pieces()
            .find(|(_, piece)| piece.kind == PieceKind::King && piece.force == force)
            .map(|(coord, _)| coord)
    }
}

impl ops::Index<Coord> for Grid {
    type Output = Option<Piece>;
    fn index(&self, pos: Coord) -> &Self::Output { &self.data[coord_to_index(pos)] }
}

impl ops::IndexMut<Coord> for Grid {
    fn index_mut(&mut self, pos: Coord) -> &mut Self::Output {
        &mut self.data[coord_to_index(pos)]
    }
}

fn coord_to_index(pos: Coord) -> [usize; 2] {
    [pos.row.to_zero_based() as usize, pos.col.to_zero_based() as usize]
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_find_king() {
        let mut grid = Grid::new();
        assert_eq!(grid.num_pieces(), 0);
        grid[Coord::E1] = Some(Piece::new(PieceKind::King, Force::White));
        grid[Coord::E8] = Some(Piece::new(PieceKind::King, Force::Black));
        grid[Coord::A2] = Some(Piece::new(PieceKind::Pawn, Force::White));
        assert_eq!(grid.num_pieces(), 3);
        assert_eq!(grid.find_king(Force::White), Some(Coord::E1));
        assert_eq!(grid.find_king(Force::Black), Some(Coord::E8));
        assert_eq!(grid[Coord::A3], None);
    }
}
