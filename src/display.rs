// Board rendering model. A `RenderedBoard` is what a front end paints: one piece glyph per
// occupied square plus highlight flags. It is always rebuilt from a `Position`, never patched
// piece-by-piece, so a repaint cannot leave stale pieces or highlights behind.

use enum_map::Enum;
use ndarray::{Array, Array2};
use strum::EnumIter;

use crate::coord::{Col, Coord, NUM_COLS, NUM_ROWS, Row};
use crate::fen::Position;
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::Piece;
use crate::selection::Selection;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Enum, EnumIter)]
pub enum DisplayPlayer {
    Top,
    Bottom,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoardOrientation {
    Normal,  // White at bottom
    Rotated, // Black at bottom
}

// These coords describe board squares, like `Coord`. But here row 0 corresponds to the top-most
// row, which could be rank '1' or rank '8' on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DisplayCoord {
    pub x: u8,
    pub y: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct SquareHighlights {
    pub selected: bool,
    pub legal_destination: bool,
    pub check: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct RenderedSquare {
    pub piece: Option<Piece>,
    pub highlights: SquareHighlights,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RenderedBoard {
    squares: Array2<RenderedSquare>,
}

impl RenderedBoard {
    pub fn empty() -> Self {
        RenderedBoard {
            squares: Array::from_elem(
                (NUM_ROWS as usize, NUM_COLS as usize),
                RenderedSquare::default(),
            ),
        }
    }

    // Full repaint: drops every previously rendered piece and highlight, then places the pieces
    // of `position`. When `in_check` is set, the king of the side to move is highlighted.
    pub fn from_position(position: &Position, in_check: bool) -> Self {
        let mut board = RenderedBoard::empty();
        for (coord, piece) in position.grid.pieces() {
            board.square_mut(coord).piece = Some(piece);
        }
        if in_check {
            if let Some(king) = position.grid.find_king(position.active_force) {
                board.square_mut(king).highlights.check = true;
            }
        }
        board
    }

    pub fn square(&self, coord: Coord) -> &RenderedSquare { &self.squares[coord_to_index(coord)] }

    fn square_mut(&mut self, coord: Coord) -> &mut RenderedSquare {
        &mut self.squares[coord_to_index(coord)]
    }

    pub fn clear_selection_highlights(&mut self) {
        for square in self.squares.iter_mut() {
            square.highlights.selected = false;
            square.highlights.legal_destination = false;
        }
    }

    pub fn apply_selection(&mut self, selection: &Selection) {
        self.clear_selection_highlights();
        if let Some(selected) = selection.selected() {
            self.square_mut(selected).highlights.selected = true;
        }
        for &dest in selection.highlighted_destinations() {
            self.square_mut(dest).highlights.legal_destination = true;
        }
    }

    // Reads the occupancy back from what has been painted.
    pub fn occupancy(&self) -> Grid {
        let mut grid = Grid::new();
        for coord in Coord::all() {
            grid[coord] = self.square(coord).piece;
        }
        grid
    }

    pub fn selected_square(&self) -> Option<Coord> {
        Coord::all().find(|&coord| self.square(coord).highlights.selected)
    }

    pub fn legal_destination_squares(&self) -> Vec<Coord> {
        Coord::all().filter(|&coord| self.square(coord).highlights.legal_destination).collect()
    }

    pub fn check_square(&self) -> Option<Coord> {
        Coord::all().find(|&coord| self.square(coord).highlights.check)
    }
}

fn coord_to_index(pos: Coord) -> [usize; 2] {
    [pos.row.to_zero_based() as usize, pos.col.to_zero_based() as usize]
}

pub fn get_display_player(force: Force, orientation: BoardOrientation) -> DisplayPlayer {
    use BoardOrientation::*;
    use Force::*;
    match (orientation, force) {
        (Normal, White) | (Rotated, Black) => DisplayPlayer::Bottom,
        (Normal, Black) | (Rotated, White) => DisplayPlayer::Top,
    }
}

pub fn to_display_coord(coord: Coord, orientation: BoardOrientation) -> DisplayCoord {
    match orientation {
        BoardOrientation::Normal => DisplayCoord {
            x: coord.col.to_zero_based(),
            y: NUM_ROWS - coord.row.to_zero_based() - 1,
        },
        BoardOrientation::Rotated => DisplayCoord {
            x: NUM_COLS - coord.col.to_zero_based() - 1,
            y: coord.row.to_zero_based(),
        },
    }
}

pub fn from_display_coord(q: DisplayCoord, orientation: BoardOrientation) -> Option<Coord> {
    if q.x >= NUM_COLS || q.y >= NUM_ROWS {
        return None;
    }
    Some(match orientation {
        BoardOrientation::Normal => Coord::new(
            Row::from_zero_based(NUM_ROWS - q.y - 1),
            Col::from_zero_based(q.x),
        ),
        BoardOrientation::Rotated => Coord::new(
            Row::from_zero_based(q.y),
            Col::from_zero_based(NUM_COLS - q.x - 1),
        ),
    })
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fen::{STARTING_FEN, position_from_fen};
    use crate::piece::PieceKind;

    #[test]
    fn occupancy_round_trip() {
        for fen in [
            STARTING_FEN,
            "r3k2r/pppq1ppp/2npbn2/4p3/4P3/2NPBN2/PPPQ1PPP/R3K2R b KQkq - 2 8",
            "8/8/8/8/8/8/8/8 w - - 0 1",
            "7k/5Q2/6K1/8/8/8/8/8 b - - 10 60",
        ] {
            let position = position_from_fen(fen).unwrap();
            let board = RenderedBoard::from_position(&position, false);
            assert_eq!(board.occupancy(), position.grid);
        }
    }

    #[test]
    fn check_highlights_king_to_move() {
        let position = position_from_fen("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1").unwrap();
        let board = RenderedBoard::from_position(&position, true);
        assert_eq!(board.check_square(), Some(Coord::E8));
        assert_eq!(
            board.square(Coord::E8).piece,
            Some(Piece::new(PieceKind::King, Force::Black))
        );
        let board = RenderedBoard::from_position(&position, false);
        assert_eq!(board.check_square(), None);
    }

    #[test]
    fn display_coords() {
        use BoardOrientation::*;
        assert_eq!(to_display_coord(Coord::A8, Normal), DisplayCoord { x: 0, y: 0 });
        assert_eq!(to_display_coord(Coord::A8, Rotated), DisplayCoord { x: 7, y: 7 });
        assert_eq!(to_display_coord(Coord::H1, Rotated), DisplayCoord { x: 0, y: 0 });
        for orientation in [Normal, Rotated] {
            for coord in Coord::all() {
                let q = to_display_coord(coord, orientation);
                assert_eq!(from_display_coord(q, orientation), Some(coord));
            }
        }
        assert_eq!(from_display_coord(DisplayCoord { x: 8, y: 0 }, Normal), None);
        assert_eq!(get_display_player(Force::Black, Normal), DisplayPlayer::Top);
        assert_eq!(get_display_player(Force::Black, Rotated), DisplayPlayer::Bottom);
    }
}
