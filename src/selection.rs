// Selection & legality. Click and drag are two ways of proposing the same thing (an origin and
// then a destination), so both go through `select_square` and `propose_destination`. Legality
// comes only from the server-supplied `LegalMoves`.

use log::debug;

use crate::coord::Coord;
use crate::error::InputError;
use crate::force::Force;
use crate::grid::Grid;
use crate::legal_moves::LegalMoves;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputModality {
    Click,
    Drag,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TargetOutcome {
    // Legal destination chosen for the current selection. Selection is cleared.
    Move { from: Coord, to: Coord },
    // Selection switched to another playable piece.
    Selected(Coord),
    // Selection dropped without a replacement.
    Deselected,
    // Nothing was selected and the square is not playable.
    Noop,
}

// Everything the controller needs to know about the current game to decide legality.
#[derive(Clone, Copy, Debug)]
pub struct BoardContext<'a> {
    pub grid: &'a Grid,
    pub legal_moves: &'a LegalMoves,
    pub player: Force,
}

impl BoardContext<'_> {
    pub fn check_playable(&self, coord: Coord) -> Result<(), InputError> {
        match self.grid[coord] {
            None => Err(InputError::EmptySquare),
            Some(piece) if piece.force != self.player => Err(InputError::NotPlayable),
            Some(_) => Ok(()),
        }
    }

    pub fn is_playable(&self, coord: Coord) -> bool { self.check_playable(coord).is_ok() }
}

// Invariant: `selected` is either `None` or a square holding a piece of the player's color at
// the time of selection; `highlighted` is exactly the legal destination set of `selected`.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Selection {
    selected: Option<Coord>,
    highlighted: Vec<Coord>,
    dragging: bool,
}

impl Selection {
    pub fn new() -> Self { Self::default() }

    pub fn selected(&self) -> Option<Coord> { self.selected }
    pub fn highlighted_destinations(&self) -> &[Coord] { &self.highlighted }
    pub fn is_dragging(&self) -> bool { self.dragging }

    pub fn select_square(&mut self, ctx: BoardContext, coord: Coord) -> Result<(), InputError> {
        ctx.check_playable(coord)?;
        self.clear();
        self.selected = Some(coord);
        // A piece without legal moves (e.g. pinned) is still selectable and highlights nothing.
        self.highlighted = ctx.legal_moves.destinations(coord).collect();
        debug!("Selected {} with {} legal destinations", coord, self.highlighted.len());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.highlighted.clear();
        self.dragging = false;
    }

    pub fn handle_target_chosen(&mut self, ctx: BoardContext, coord: Coord) -> TargetOutcome {
        self.propose_destination(ctx, coord, InputModality::Click)
    }

    pub fn propose_destination(
        &mut self, ctx: BoardContext, coord: Coord, modality: InputModality,
    ) -> TargetOutcome {
        if let Some(from) = self.selected {
            if ctx.legal_moves.is_legal(from, coord) {
                self.clear();
                return TargetOutcome::Move { from, to: coord };
            }
            self.clear();
            // Dropping a dragged piece elsewhere only cancels the drag. Clicking another
            // playable piece switches the selection to it.
            if modality == InputModality::Click && self.select_square(ctx, coord).is_ok() {
                return TargetOutcome::Selected(coord);
            }
            TargetOutcome::Deselected
        } else if modality == InputModality::Click && self.select_square(ctx, coord).is_ok() {
            TargetOutcome::Selected(coord)
        } else {
            TargetOutcome::Noop
        }
    }

    // A drag can only begin on a playable piece. Otherwise it is refused before anything
    // changes, including the existing selection.
    pub fn start_drag(&mut self, ctx: BoardContext, coord: Coord) -> Result<(), InputError> {
        self.select_square(ctx, coord)?;
        self.dragging = true;
        Ok(())
    }

    pub fn drop_piece(
        &mut self, ctx: BoardContext, coord: Coord,
    ) -> Result<TargetOutcome, InputError> {
        if !self.dragging {
            return Err(InputError::NoDragInProgress);
        }
        Ok(self.propose_destination(ctx, coord, InputModality::Drag))
    }

    // Ends the drag but keeps the piece selected, so that press-and-release on a piece acts
    // like a click on it.
    pub fn abort_drag(&mut self) { self.dragging = false; }
}
