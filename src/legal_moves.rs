use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::coord::Coord;


// Server-computed moves: origin square -> squares the piece there may move to this turn.
// The client never second-guesses it; a square missing from the map has no legal moves.
#[derive(Clone, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegalMoves {
    moves: BTreeMap<Coord, BTreeSet<Coord>>,
}

impl LegalMoves {
    pub fn new() -> Self { Self::default() }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (Coord, Coord)>) -> Self {
        let mut moves: BTreeMap<Coord, BTreeSet<Coord>> = BTreeMap::new();
        for (from, to) in pairs {
            moves.entry(from).or_default().insert(to);
        }
        LegalMoves { moves }
    }

    pub fn destinations(&self, from: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.moves.get(&from).into_iter().flatten().copied()
    }

    pub fn is_legal(&self, from: Coord, to: Coord) -> bool {
        self.moves.get(&from).is_some_and(|dests| dests.contains(&to))
    }

    pub fn is_empty(&self) -> bool { self.moves.values().all(|dests| dests.is_empty()) }

    pub fn num_moves(&self) -> usize { self.moves.values().map(|dests| dests.len()).sum() }
}


#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn from_server_json() {
        let moves: LegalMoves =
            serde_json::from_str(r#"{"e2": ["e3", "e4"], "g1": ["f3", "h3"]}"#).unwrap();
        assert_eq!(moves.num_moves(), 4);
        assert!(moves.is_legal(Coord::E2, Coord::E4));
        assert!(!moves.is_legal(Coord::E2, Coord::E5));
        assert!(!moves.is_legal(Coord::D2, Coord::D4));
        assert_eq!(moves.destinations(Coord::G1).collect_vec(), vec![Coord::F3, Coord::H3]);
        assert_eq!(moves.destinations(Coord::A1).count(), 0);
    }

    #[test]
    fn rejects_bad_squares() {
        assert!(serde_json::from_str::<LegalMoves>(r#"{"e9": ["e3"]}"#).is_err());
        assert!(serde_json::from_str::<LegalMoves>(r#"{"e2": ["x3"]}"#).is_err());
    }

    #[test]
    fn empty_map() {
        let moves: LegalMoves = serde_json::from_str("{}").unwrap();
        assert!(moves.is_empty());
    }
}
