use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::coord::Row;


// The color a human plays for. Serialized as "white"/"black" to match the game server.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Force {
    White,
    Black,
}

impl Force {
    pub fn opponent(self) -> Force {
        match self {
            Force::White => Force::Black,
            Force::Black => Force::White,
        }
    }

    // The rank where pawns of this force promote.
    pub fn last_row(self) -> Row {
        match self {
            Force::White => Row::_8,
            Force::Black => Row::_1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Force::White => "White",
            Force::Black => "Black",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Some(Force::White),
            "black" | "b" => Some(Force::Black),
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&Force::White).unwrap(), "\"white\"");
        assert_eq!(serde_json::from_str::<Force>("\"black\"").unwrap(), Force::Black);
        assert_eq!(Force::from_name("Black"), Some(Force::Black));
        assert_eq!(Force::from_name("red"), None);
    }
}
