#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod client;
pub mod coord;
pub mod dirty;
pub mod display;
pub mod error;
pub mod event;
pub mod fen;
pub mod force;
pub mod grid;
pub mod history;
pub mod legal_moves;
pub mod piece;
pub mod promotion;
pub mod selection;
pub mod status;
pub mod test_util;

pub use coord::{Col, Coord, Row};
pub use force::Force;
pub use piece::{Piece, PieceKind, PromotionTarget};
