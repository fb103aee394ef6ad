// Game session controller. `ClientState` owns all session state and changes only through two
// entry points: `apply_input` for user commands and `process_server_response` for answers to the
// requests it emitted. Outgoing requests go to an mpsc channel; the caller performs the I/O and
// feeds the result back. At most one request is in flight at any time.

use std::collections::VecDeque;
use std::sync::mpsc;

use enum_map::{EnumMap, enum_map};
use log::{debug, info, warn};

use crate::coord::Coord;
use crate::dirty::Dirty;
use crate::display::{BoardOrientation, DisplayPlayer, RenderedBoard, get_display_player};
use crate::error::InputError;
use crate::event::{
    Difficulty, GameRequest, GameSnapshot, MakeMoveRequest, NewGameRequest, ResponseError,
    ServerResponse, TransportError,
};
use crate::fen::Position;
use crate::force::Force;
use crate::history::{MoveHistory, MoveNotation};
use crate::internal_error_message;
use crate::legal_moves::LegalMoves;
use crate::piece::PromotionTarget;
use crate::promotion::{PendingPromotion, PromotionFlow, PromotionMove, requires_promotion};
use crate::selection::{BoardContext, Selection, TargetOutcome};


pub const NEW_GAME_FAILED: &str = "Error starting new game";
pub const MAKE_MOVE_FAILED: &str = "Error making move";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UserInput {
    Click(Coord),
    DragStart(Coord),
    DragDrop(Coord),
    DragAbort,
    ChoosePromotion(PromotionTarget),
    NewGame { difficulty: Difficulty, player_color: Force },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    GameStarted,
    MoveConfirmed(MoveNotation),
    PromotionRequested(PendingPromotion),
    // Status line now shows what went wrong.
    RequestFailed,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EventError {
    ServerReturnedError(String),
    MalformedResponse(String),
    TransportFailed(String),
    CannotApplyEvent(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum PendingRequest {
    NewGame { difficulty: Difficulty, player_color: Force },
    MakeMove(MoveNotation),
}

impl PendingRequest {
    fn failure_message(&self) -> &'static str {
        match self {
            PendingRequest::NewGame { .. } => NEW_GAME_FAILED,
            PendingRequest::MakeMove(_) => MAKE_MOVE_FAILED,
        }
    }
}

pub struct ClientState {
    requests_tx: mpsc::Sender<GameRequest>,
    player_color: Force,
    difficulty: Difficulty,
    orientation: BoardOrientation,
    // `None` until the first new game response arrives.
    game: Option<GameSnapshot>,
    selection: Selection,
    promotion: PromotionFlow,
    history: Dirty<MoveHistory>,
    board: Dirty<RenderedBoard>,
    status_line: String,
    pending: Option<PendingRequest>,
    notable_events: VecDeque<NotableEvent>,
}

impl ClientState {
    pub fn new(requests_tx: mpsc::Sender<GameRequest>) -> Self {
        ClientState {
            requests_tx,
            player_color: Force::White,
            difficulty: Difficulty::default(),
            orientation: BoardOrientation::Normal,
            game: None,
            selection: Selection::new(),
            promotion: PromotionFlow::Idle,
            history: Dirty::new(MoveHistory::new()),
            board: Dirty::new(RenderedBoard::empty()),
            status_line: String::new(),
            pending: None,
            notable_events: VecDeque::new(),
        }
    }

    pub fn player_color(&self) -> Force { self.player_color }
    pub fn difficulty(&self) -> Difficulty { self.difficulty }
    pub fn orientation(&self) -> BoardOrientation { self.orientation }
    pub fn game(&self) -> Option<&GameSnapshot> { self.game.as_ref() }
    pub fn position(&self) -> Option<&Position> { self.game.as_ref().map(|g| &g.position) }
    pub fn legal_moves(&self) -> Option<&LegalMoves> {
        self.game.as_ref().map(|g| &g.legal_moves)
    }
    pub fn selection(&self) -> &Selection { &self.selection }
    pub fn promotion(&self) -> &PromotionFlow { &self.promotion }
    pub fn history(&self) -> &MoveHistory { &self.history }
    pub fn rendered_board(&self) -> &RenderedBoard { &self.board }
    pub fn status_line(&self) -> &str { &self.status_line }
    pub fn is_request_pending(&self) -> bool { self.pending.is_some() }

    pub fn set_orientation(&mut self, orientation: BoardOrientation) {
        self.orientation = orientation;
        // Labels and squares move together.
        self.board.get_mut();
    }

    pub fn take_board_dirt(&self) -> bool { self.board.take_dirt() }
    pub fn take_history_dirt(&self) -> bool { self.history.take_dirt() }

    pub fn next_notable_event(&mut self) -> Option<NotableEvent> { self.notable_events.pop_front() }

    // "You" for the local player, "Computer" for the opponent, each at its side of the board.
    pub fn player_labels(&self) -> EnumMap<DisplayPlayer, String> {
        let me = self.player_color;
        let my_side = get_display_player(me, self.orientation);
        enum_map! {
            side => if side == my_side {
                format!("You ({})", me.name())
            } else {
                format!("Computer ({})", me.opponent().name())
            }
        }
    }

    pub fn apply_input(&mut self, input: UserInput) -> Result<(), InputError> {
        if self.pending.is_some() {
            return Err(InputError::RequestPending);
        }
        match input {
            UserInput::NewGame { difficulty, player_color } => {
                self.start_new_game(difficulty, player_color);
                Ok(())
            }
            UserInput::ChoosePromotion(promote_to) => {
                let PromotionMove { from, to, promote_to } = self.promotion.choose(promote_to)?;
                self.submit_move(from, to, Some(promote_to));
                Ok(())
            }
            UserInput::Click(coord) => {
                let ctx = board_context(&self.game, &self.promotion, self.player_color)?;
                let outcome = self.selection.handle_target_chosen(ctx, coord);
                self.process_target_outcome(outcome)
            }
            UserInput::DragStart(coord) => {
                let ctx = board_context(&self.game, &self.promotion, self.player_color)?;
                let result = self.selection.start_drag(ctx, coord);
                self.repaint_selection();
                result
            }
            UserInput::DragDrop(coord) => {
                let ctx = board_context(&self.game, &self.promotion, self.player_color)?;
                let outcome = self.selection.drop_piece(ctx, coord)?;
                self.process_target_outcome(outcome)
            }
            UserInput::DragAbort => {
                board_context(&self.game, &self.promotion, self.player_color)?;
                self.selection.abort_drag();
                Ok(())
            }
        }
    }

    pub fn process_server_response(
        &mut self, response: Result<ServerResponse, TransportError>,
    ) -> Result<(), EventError> {
        let Some(pending) = self.pending.take() else {
            return Err(EventError::CannotApplyEvent(internal_error_message!(
                "got a response without a pending request"
            )));
        };
        let response = match response {
            Ok(response) => response,
            Err(err) => {
                warn!("{} request failed: {}", request_name(&pending), err);
                self.report_failure(pending.failure_message().to_owned());
                return Err(EventError::TransportFailed(err.0));
            }
        };
        let echoed_color = response.player_color.clone();
        let echoed_difficulty = response.difficulty.clone();
        let snapshot = match response.into_snapshot() {
            Ok(snapshot) => snapshot,
            Err(ResponseError::Rejected(message)) => {
                warn!("Server rejected {} request: {}", request_name(&pending), message);
                self.report_failure(message.clone());
                return Err(EventError::ServerReturnedError(message));
            }
            Err(ResponseError::Malformed(message)) => {
                warn!("Malformed {} response: {}", request_name(&pending), message);
                self.report_failure(format!("Invalid server response: {}", message));
                return Err(EventError::MalformedResponse(message));
            }
        };
        match pending {
            PendingRequest::NewGame { difficulty, player_color } => {
                let color_mismatch = |c: &String| Force::from_name(c) != Some(player_color);
                if let Some(echoed) = echoed_color.filter(color_mismatch) {
                    warn!("Server echoed player color {:?}, keeping {}", echoed, player_color.name());
                }
                if let Some(echoed) = echoed_difficulty.filter(|d| d != difficulty.name()) {
                    warn!("Server echoed difficulty {:?}, keeping {}", echoed, difficulty.name());
                }
                info!("New game started: {} vs computer ({})", player_color.name(), difficulty.name());
                self.player_color = player_color;
                self.difficulty = difficulty;
                self.promotion.reset();
                self.history.get_mut().clear();
                self.install_snapshot(snapshot);
                self.notable_events.push_back(NotableEvent::GameStarted);
            }
            PendingRequest::MakeMove(notation) => {
                info!("Move confirmed: {}", notation);
                self.install_snapshot(snapshot);
                self.history.get_mut().append(notation);
                self.notable_events.push_back(NotableEvent::MoveConfirmed(notation));
            }
        }
        Ok(())
    }

    fn process_target_outcome(&mut self, outcome: TargetOutcome) -> Result<(), InputError> {
        if let TargetOutcome::Move { from, to } = outcome {
            let moved_piece = self.game.as_ref().and_then(|game| game.position.grid[from]);
            if requires_promotion(moved_piece, to, self.player_color) {
                self.promotion.begin(from, to)?;
                self.notable_events
                    .push_back(NotableEvent::PromotionRequested(PendingPromotion { from, to }));
            } else {
                self.submit_move(from, to, None);
            }
        }
        self.repaint_selection();
        Ok(())
    }

    fn start_new_game(&mut self, difficulty: Difficulty, player_color: Force) {
        debug!("Requesting new game: {:?}, {:?}", difficulty, player_color);
        self.send_request(
            PendingRequest::NewGame { difficulty, player_color },
            GameRequest::NewGame(NewGameRequest { difficulty, player_color }),
        );
    }

    fn submit_move(&mut self, from: Coord, to: Coord, promotion: Option<PromotionTarget>) {
        let notation = MoveNotation { from, to, promote_to: promotion };
        debug!("Submitting move {}", notation);
        self.selection.clear();
        self.repaint_selection();
        self.send_request(
            PendingRequest::MakeMove(notation),
            GameRequest::MakeMove(MakeMoveRequest { from, to, promotion }),
        );
    }

    fn send_request(&mut self, pending: PendingRequest, request: GameRequest) {
        if self.requests_tx.send(request).is_err() {
            warn!("Request channel closed, dropping {} request", request_name(&pending));
            self.report_failure(pending.failure_message().to_owned());
            return;
        }
        self.pending = Some(pending);
    }

    // Position, legal moves and status are replaced together; selection never survives it.
    fn install_snapshot(&mut self, snapshot: GameSnapshot) {
        self.selection.clear();
        self.board.set(RenderedBoard::from_position(&snapshot.position, snapshot.in_check));
        self.status_line = snapshot.status.text().to_owned();
        self.game = Some(snapshot);
    }

    fn repaint_selection(&mut self) {
        let selection = &self.selection;
        self.board.update(|board| board.apply_selection(selection));
    }

    fn report_failure(&mut self, message: String) {
        self.status_line = message;
        self.notable_events.push_back(NotableEvent::RequestFailed);
    }
}

// Board input is accepted only with a game on screen and no promotion choice outstanding.
fn board_context<'a>(
    game: &'a Option<GameSnapshot>, promotion: &PromotionFlow, player: Force,
) -> Result<BoardContext<'a>, InputError> {
    if promotion.is_awaiting() {
        return Err(InputError::PromotionPending);
    }
    let game = game.as_ref().ok_or(InputError::NoGameInProgress)?;
    Ok(BoardContext {
        grid: &game.position.grid,
        legal_moves: &game.legal_moves,
        player,
    })
}

fn request_name(request: &PendingRequest) -> &'static str {
    match request {
        PendingRequest::NewGame { .. } => "new_game",
        PendingRequest::MakeMove(_) => "make_move",
    }
}
