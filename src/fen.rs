// Position-encoding strings (FEN). The server sends a full six-field FEN with every response.
// Only the placement and the side to move affect the UI; the remaining fields are kept as
// pass-through state and written back unchanged.
//
// Malformed strings are rejected as a whole: a partially parsed board is never returned.

use itertools::Itertools;

use crate::coord::{Col, Coord, NUM_COLS, NUM_ROWS, Row};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::Piece;


pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Position {
    pub grid: Grid,
    pub active_force: Force,
    // Either "-" or a set of castling letters ("KQkq" or Shredder-FEN files). Not interpreted.
    pub castling_rights: String,
    pub en_passant_target: Option<Coord>,
    pub half_turn_clock: u32,
    pub full_turn_index: u32,
}

impl Position {
    pub fn starting() -> Self {
        // Parsing a constant: covered by tests.
        position_from_fen(STARTING_FEN).unwrap()
    }
}

fn force_to_fen(force: Force) -> char {
    match force {
        Force::White => 'w',
        Force::Black => 'b',
    }
}
fn force_from_fen(s: &str) -> Result<Force, String> {
    match s {
        "w" => Ok(Force::White),
        "b" => Ok(Force::Black),
        _ => Err(format!("invalid FEN: invalid side to move: {}", s)),
    }
}

fn castling_rights_from_fen(s: &str) -> Result<String, String> {
    if s == "-" {
        return Ok(s.to_owned());
    }
    let valid_letter =
        |ch: char| "KQkq".contains(ch) || Col::from_algebraic(ch.to_ascii_lowercase()).is_some();
    if s.is_empty() || !s.chars().all(valid_letter) || !s.chars().all_unique() {
        return Err(format!("invalid FEN: invalid castling rights: {}", s));
    }
    Ok(s.to_owned())
}

fn en_passant_target_to_fen(en_passant_target: Option<Coord>) -> String {
    match en_passant_target {
        None => "-".to_owned(),
        Some(pos) => pos.to_algebraic(),
    }
}
fn en_passant_target_from_fen(s: &str) -> Result<Option<Coord>, String> {
    if s == "-" {
        return Ok(None);
    }
    let pos = Coord::from_algebraic(s)
        .ok_or_else(|| format!("invalid FEN: invalid en passant target: {}", s))?;
    if pos.row != Row::_3 && pos.row != Row::_6 {
        return Err(format!("invalid FEN: en passant target on wrong rank: {}", s));
    }
    Ok(Some(pos))
}

fn grid_from_fen(grid_notation: &str) -> Result<Grid, String> {
    let rows = grid_notation.split('/').collect_vec();
    if rows.len() != NUM_ROWS as usize {
        return Err(format!("invalid FEN: has {} rows, expected {}", rows.len(), NUM_ROWS));
    }
    let mut grid = Grid::new();
    // Ranks are listed from 8 down to 1.
    for (row, row_notation) in Row::all().rev().zip(rows) {
        let mut col: u32 = 0;
        for ch in row_notation.chars() {
            if let Some(n) = ch.to_digit(10) {
                if n == 0 || n > NUM_COLS as u32 {
                    return Err(format!(
                        "invalid FEN: bad empty-square count '{}' in rank {}",
                        ch,
                        row.to_algebraic()
                    ));
                }
                col += n;
            } else if let Some(piece) = Piece::from_ascii(ch) {
                if col >= NUM_COLS as u32 {
                    return Err(format!("invalid FEN: rank {} is too long", row.to_algebraic()));
                }
                grid[Coord::new(row, Col::from_zero_based(col as u8))] = Some(piece);
                col += 1;
            } else {
                return Err(format!("invalid FEN: unknown piece: {}", ch));
            }
        }
        if col != NUM_COLS as u32 {
            return Err(format!(
                "invalid FEN: rank {} has {} columns, expected {}",
                row.to_algebraic(),
                col,
                NUM_COLS
            ));
        }
    }
    Ok(grid)
}

fn grid_to_fen(grid: &Grid) -> String {
    Row::all()
        .rev()
        .map(|row| {
            let mut row_notation = String::new();
            let mut empty_col_count: u8 = 0;
            for col in Col::all() {
                if let Some(piece) = grid[Coord::new(row, col)] {
                    if empty_col_count > 0 {
                        row_notation.push_str(&empty_col_count.to_string());
                        empty_col_count = 0;
                    }
                    row_notation.push(piece.to_ascii());
                } else {
                    empty_col_count += 1;
                }
            }
            if empty_col_count > 0 {
                row_notation.push_str(&empty_col_count.to_string());
            }
            row_notation
        })
        .join("/")
}

pub fn position_to_fen(position: &Position) -> String {
    format!(
        "{} {} {} {} {} {}",
        grid_to_fen(&position.grid),
        force_to_fen(position.active_force),
        position.castling_rights,
        en_passant_target_to_fen(position.en_passant_target),
        position.half_turn_clock,
        position.full_turn_index
    )
}

// Trailing fields may be omitted (e.g. a bare placement string); they get the values of a
// fresh game.
pub fn position_from_fen(fen: &str) -> Result<Position, String> {
    let fields = fen.split_whitespace().collect_vec();
    if fields.is_empty() || fields.len() > 6 {
        return Err(format!("invalid FEN: expected 1 to 6 fields, got {}: {}", fields.len(), fen));
    }
    let field = |idx: usize, default: &'static str| fields.get(idx).copied().unwrap_or(default);

    let grid = grid_from_fen(fields[0])?;
    let active_force = force_from_fen(field(1, "w"))?;
    let castling_rights = castling_rights_from_fen(field(2, "-"))?;
    let en_passant_target = en_passant_target_from_fen(field(3, "-"))?;
    let half_turn_clock = field(4, "0");
    let half_turn_clock = half_turn_clock
        .parse::<u32>()
        .map_err(|_| format!("invalid FEN: invalid half-turn clock: {}", half_turn_clock))?;
    let full_turn_index = field(5, "1");
    let full_turn_index = full_turn_index
        .parse::<u32>()
        .map_err(|_| format!("invalid FEN: invalid full turn index: {}", full_turn_index))?;

    Ok(Position {
        grid,
        active_force,
        castling_rights,
        en_passant_target,
        half_turn_clock,
        full_turn_index,
    })
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::piece::PieceKind;

    #[test]
    fn starting_position() {
        let position = position_from_fen(STARTING_FEN).unwrap();
        assert_eq!(position.grid.num_pieces(), 32);
        assert_eq!(position.active_force, Force::White);
        assert_eq!(position.grid[Coord::E1], Some(Piece::new(PieceKind::King, Force::White)));
        assert_eq!(position.grid[Coord::D8], Some(Piece::new(PieceKind::Queen, Force::Black)));
        assert_eq!(position.grid[Coord::E4], None);
        assert_eq!(position_to_fen(&position), STARTING_FEN);
        assert_eq!(Position::starting(), position);
    }

    #[test]
    fn mid_game_round_trip() {
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
        let position = position_from_fen(fen).unwrap();
        assert_eq!(position.half_turn_clock, 4);
        assert_eq!(position.grid[Coord::H5], Some(Piece::new(PieceKind::Queen, Force::White)));
        assert_eq!(position_to_fen(&position), fen);

        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        let position = position_from_fen(fen).unwrap();
        assert_eq!(position.en_passant_target, Some(Coord::F6));
        assert_eq!(position_to_fen(&position), fen);
    }

    #[test]
    fn missing_trailing_fields() {
        let position = position_from_fen("8/8/8/4k3/8/8/8/4K3 b").unwrap();
        assert_eq!(position.active_force, Force::Black);
        assert_eq!(position.castling_rights, "-");
        assert_eq!(position.full_turn_index, 1);
    }

    #[test]
    fn malformed() {
        assert!(position_from_fen("").is_err());
        assert!(position_from_fen("8/8/8/8/8/8/8 w - - 0 1").is_err()); // 7 ranks
        assert!(position_from_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(position_from_fen("7/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(position_from_fen("ppppppppp/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(position_from_fen("x7/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(position_from_fen("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
        assert!(position_from_fen("8/8/8/8/8/8/8/8 w KK - 0 1").is_err());
        assert!(position_from_fen("8/8/8/8/8/8/8/8 w - e4 0 1").is_err());
        assert!(position_from_fen("8/8/8/8/8/8/8/8 w - - x 1").is_err());
        assert!(position_from_fen("8/8/8/8/8/8/8/8 w - - 0 1 extra").is_err());
    }
}
