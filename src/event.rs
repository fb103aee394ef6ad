// Wire format of the game server: two POST endpoints with JSON bodies, both answering with the
// same `ServerResponse` shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::coord::Coord;
use crate::fen::{Position, position_from_fen};
use crate::force::Force;
use crate::legal_moves::LegalMoves;
use crate::piece::PromotionTarget;
use crate::status::GameStatus;


#[derive(
    Clone, Copy, PartialEq, Eq, Default, Debug, EnumIter, EnumString, IntoStaticStr,
    Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn name(self) -> &'static str { self.into() }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NewGameRequest {
    pub difficulty: Difficulty,
    pub player_color: Force,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MakeMoveRequest {
    pub from: Coord,
    pub to: Coord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionTarget>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(untagged)]
pub enum GameRequest {
    NewGame(NewGameRequest),
    MakeMove(MakeMoveRequest),
}

impl GameRequest {
    // Path relative to the server base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            GameRequest::NewGame(_) => "new_game",
            GameRequest::MakeMove(_) => "make_move",
        }
    }
}

// Every field is optional on the wire: a rejection carries only `error` (plus, for `make_move`,
// the unchanged board which is ignored). `player_color` and `difficulty` are echoed by `new_game`;
// they are informational only and kept as free text so an unexpected value never fails parsing.
#[derive(Clone, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub struct ServerResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_moves: Option<LegalMoves>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_check: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

// Everything a successful response replaces, as one unit.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameSnapshot {
    pub position: Position,
    pub status: GameStatus,
    pub legal_moves: LegalMoves,
    pub in_check: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ResponseError {
    // The server refused the request (e.g. "Illegal move").
    Rejected(String),
    // The response cannot be applied, e.g. the position string is malformed.
    Malformed(String),
}

impl ServerResponse {
    pub fn into_snapshot(self) -> Result<GameSnapshot, ResponseError> {
        if let Some(error) = self.error {
            return Err(ResponseError::Rejected(error));
        }
        let board = self.board.ok_or_else(|| ResponseError::Malformed("missing board".to_owned()))?;
        let position = position_from_fen(&board).map_err(ResponseError::Malformed)?;
        // An empty map is a valid answer (e.g. mate), a missing one is not.
        let legal_moves = self
            .valid_moves
            .ok_or_else(|| ResponseError::Malformed("missing valid_moves".to_owned()))?;
        let status = GameStatus::parse(self.status.as_deref().unwrap_or(""));
        let in_check = self.in_check.unwrap_or_else(|| status.is_check());
        Ok(GameSnapshot { position, status, legal_moves, in_check })
    }
}

// Network failure or an unparsable response body.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

pub trait GameServer {
    fn send(&self, request: &GameRequest) -> Result<ServerResponse, TransportError>;
}
