use serde::{Deserialize, Serialize};


// Status line vocabulary of the game server. Anything unrecognized is kept verbatim.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameStatus {
    GameStarted,
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    Other(String),
}

impl GameStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "Game started" => GameStatus::GameStarted,
            "Ongoing" => GameStatus::Ongoing,
            "Check" => GameStatus::Check,
            "Checkmate" => GameStatus::Checkmate,
            "Stalemate" => GameStatus::Stalemate,
            "Draw due to insufficient material" => GameStatus::InsufficientMaterial,
            other => GameStatus::Other(other.to_owned()),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            GameStatus::GameStarted => "Game started",
            GameStatus::Ongoing => "Ongoing",
            GameStatus::Check => "Check",
            GameStatus::Checkmate => "Checkmate",
            GameStatus::Stalemate => "Stalemate",
            GameStatus::InsufficientMaterial => "Draw due to insufficient material",
            GameStatus::Other(s) => s,
        }
    }

    // Exact match only. A free-form message that merely mentions "Check" is not a check.
    pub fn is_check(&self) -> bool { matches!(self, GameStatus::Check | GameStatus::Checkmate) }

    pub fn is_game_over(&self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::InsufficientMaterial
        )
    }
}

impl From<String> for GameStatus {
    fn from(s: String) -> Self { GameStatus::parse(&s) }
}

impl From<GameStatus> for String {
    fn from(status: GameStatus) -> Self { status.text().to_owned() }
}
