use log::debug;
use strum::IntoEnumIterator;

use crate::coord::Coord;
use crate::error::InputError;
use crate::force::Force;
use crate::piece::{Piece, PieceKind, PromotionTarget};


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PendingPromotion {
    pub from: Coord,
    pub to: Coord,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PromotionMove {
    pub from: Coord,
    pub to: Coord,
    pub promote_to: PromotionTarget,
}

// Two-state machine. While `AwaitingChoice`, no other move may be submitted. There is no
// cancel: the state persists until a piece is chosen or a new game starts.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum PromotionFlow {
    #[default]
    Idle,
    AwaitingChoice(PendingPromotion),
}

// Only the piece kind and the destination rank matter: straight advances and captures
// promote alike.
pub fn requires_promotion(moved_piece: Option<Piece>, to: Coord, player: Force) -> bool {
    match moved_piece {
        Some(piece) => {
            piece.kind == PieceKind::Pawn && piece.force == player && to.row == player.last_row()
        }
        None => false,
    }
}

pub fn promotion_choices() -> impl Iterator<Item = PromotionTarget> { PromotionTarget::iter() }

impl PromotionFlow {
    pub fn is_awaiting(&self) -> bool { matches!(self, PromotionFlow::AwaitingChoice(_)) }

    pub fn pending(&self) -> Option<PendingPromotion> {
        match *self {
            PromotionFlow::Idle => None,
            PromotionFlow::AwaitingChoice(pending) => Some(pending),
        }
    }

    pub fn begin(&mut self, from: Coord, to: Coord) -> Result<(), InputError> {
        if self.is_awaiting() {
            return Err(InputError::PromotionPending);
        }
        debug!("Awaiting promotion choice for {}-{}", from, to);
        *self = PromotionFlow::AwaitingChoice(PendingPromotion { from, to });
        Ok(())
    }

    // Completes the flow and returns the move to submit. Back to `Idle` either way.
    pub fn choose(&mut self, promote_to: PromotionTarget) -> Result<PromotionMove, InputError> {
        let PendingPromotion { from, to } = self.pending().ok_or(InputError::NoPromotionPending)?;
        *self = PromotionFlow::Idle;
        Ok(PromotionMove { from, to, promote_to })
    }

    pub fn reset(&mut self) { *self = PromotionFlow::Idle; }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn pawn(force: Force) -> Option<Piece> { Some(Piece::new(PieceKind::Pawn, force)) }

    #[test]
    fn promotion_trigger() {
        use Force::*;
        assert!(requires_promotion(pawn(White), Coord::E8, White));
        assert!(requires_promotion(pawn(White), Coord::D8, White)); // capture
        assert!(requires_promotion(pawn(Black), Coord::A1, Black));
        assert!(!requires_promotion(pawn(White), Coord::E7, White));
        assert!(!requires_promotion(pawn(White), Coord::E1, White));
        assert!(!requires_promotion(pawn(Black), Coord::E8, Black));
        // Opponent pawns never trigger the flow.
        assert!(!requires_promotion(pawn(Black), Coord::E1, White));
        assert!(!requires_promotion(Some(Piece::new(PieceKind::Rook, White)), Coord::E8, White));
        assert!(!requires_promotion(Some(Piece::new(PieceKind::Queen, Black)), Coord::E1, Black));
        assert!(!requires_promotion(None, Coord::E8, White));
    }

    #[test]
    fn state_machine() {
        let mut flow = PromotionFlow::default();
        assert_eq!(flow.choose(PromotionTarget::Queen), Err(InputError::NoPromotionPending));
        flow.begin(Coord::E7, Coord::E8).unwrap();
        assert!(flow.is_awaiting());
        assert_eq!(flow.begin(Coord::A7, Coord::A8), Err(InputError::PromotionPending));
        assert_eq!(
            flow.choose(PromotionTarget::Knight),
            Ok(PromotionMove {
                from: Coord::E7,
                to: Coord::E8,
                promote_to: PromotionTarget::Knight
            })
        );
        assert_eq!(flow, PromotionFlow::Idle);
        assert_eq!(promotion_choices().count(), 4);
    }
}
