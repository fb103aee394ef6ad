// Sample positions and server responses shared by unit and integration tests.

use itertools::Itertools;

use crate::coord::{Coord, Row};
use crate::event::ServerResponse;
use crate::fen::STARTING_FEN;
use crate::legal_moves::LegalMoves;


// The 20 opening moves of white.
pub fn starting_legal_moves() -> LegalMoves {
    let pawn_moves = Coord::all()
        .filter(|coord| coord.row == Row::_2)
        .flat_map(|from| {
            let one = Coord::new(Row::_3, from.col);
            let two = Coord::new(Row::_4, from.col);
            [(from, one), (from, two)]
        })
        .collect_vec();
    let knight_moves = [
        (Coord::B1, Coord::A3),
        (Coord::B1, Coord::C3),
        (Coord::G1, Coord::F3),
        (Coord::G1, Coord::H3),
    ];
    LegalMoves::from_pairs(pawn_moves.into_iter().chain(knight_moves))
}

// Builds a successful response. Squares are given in algebraic form, e.g. `[("e2", "e4")]`.
pub fn response(board: &str, status: &str, moves: &[(&str, &str)]) -> ServerResponse {
    let legal_moves = LegalMoves::from_pairs(moves.iter().map(|&(from, to)| {
        (
            Coord::from_algebraic(from).unwrap(),
            Coord::from_algebraic(to).unwrap(),
        )
    }));
    ServerResponse {
        board: Some(board.to_owned()),
        status: Some(status.to_owned()),
        valid_moves: Some(legal_moves),
        ..ServerResponse::default()
    }
}

pub fn starting_response() -> ServerResponse {
    ServerResponse {
        board: Some(STARTING_FEN.to_owned()),
        status: Some("Game started".to_owned()),
        valid_moves: Some(starting_legal_moves()),
        ..ServerResponse::default()
    }
}

pub fn error_response(message: &str) -> ServerResponse {
    ServerResponse {
        error: Some(message.to_owned()),
        ..ServerResponse::default()
    }
}
