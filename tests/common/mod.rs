// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::mpsc;

use chessfront::client::{ClientState, EventError, UserInput};
use chessfront::coord::{Col, Coord, Row};
use chessfront::error::InputError;
use chessfront::event::{Difficulty, GameRequest, GameServer, ServerResponse, TransportError};
use chessfront::force::Force;
use chessfront::grid::Grid;
use chessfront::piece::Piece;
use itertools::Itertools;


#[macro_export]
macro_rules! click {
    ($coord:ident) => {
        chessfront::client::UserInput::Click(chessfront::coord::Coord::$coord)
    };
}

#[macro_export]
macro_rules! drag_start {
    ($coord:ident) => {
        chessfront::client::UserInput::DragStart(chessfront::coord::Coord::$coord)
    };
}

#[macro_export]
macro_rules! drag_drop {
    ($coord:ident) => {
        chessfront::client::UserInput::DragDrop(chessfront::coord::Coord::$coord)
    };
}

// Answers requests from a pre-recorded script and remembers what it was asked.
#[derive(Default)]
pub struct ScriptedServer {
    responses: RefCell<VecDeque<Result<ServerResponse, TransportError>>>,
    requests: RefCell<Vec<GameRequest>>,
}

impl ScriptedServer {
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<GameRequest> { self.requests.borrow().clone() }
}

impl GameServer for ScriptedServer {
    fn send(&self, request: &GameRequest) -> Result<ServerResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("script exhausted".to_owned())))
    }
}

pub struct TestClient {
    pub state: ClientState,
    pub server: ScriptedServer,
    requests_rx: mpsc::Receiver<GameRequest>,
    outgoing: VecDeque<GameRequest>,
}

impl TestClient {
    #[allow(dead_code)]
    pub fn new() -> Self {
        let (requests_tx, requests_rx) = mpsc::channel();
        TestClient {
            state: ClientState::new(requests_tx),
            server: ScriptedServer::default(),
            requests_rx,
            outgoing: VecDeque::new(),
        }
    }

    // Client with a game already started from `response`.
    #[allow(dead_code)]
    pub fn with_game(player_color: Force, response: ServerResponse) -> Self {
        let mut client = TestClient::new();
        client
            .input(UserInput::NewGame { difficulty: Difficulty::Medium, player_color })
            .unwrap();
        client.respond(Ok(response)).unwrap();
        client
    }

    #[allow(dead_code)]
    pub fn input(&mut self, input: UserInput) -> Result<(), InputError> {
        self.state.apply_input(input)
    }

    // Requests the client has emitted but nobody has sent yet.
    #[allow(dead_code)]
    pub fn num_outgoing_requests(&mut self) -> usize {
        self.outgoing.extend(self.requests_rx.try_iter());
        self.outgoing.len()
    }

    // Sends the single outgoing request through the scripted server and applies its answer.
    #[allow(dead_code)]
    pub fn respond(
        &mut self, response: Result<ServerResponse, TransportError>,
    ) -> Result<(), EventError> {
        self.outgoing.extend(self.requests_rx.try_iter());
        let request = self.outgoing.pop_front().expect("client sent no request");
        self.server.responses.borrow_mut().push_back(response);
        let result = self.server.send(&request);
        self.state.process_server_response(result)
    }

    #[allow(dead_code)]
    pub fn last_request_json(&self) -> serde_json::Value {
        let request = self.server.requests.borrow().last().cloned().expect("no requests sent");
        serde_json::to_value(request).unwrap()
    }
}

// Parses a board drawn as text: eight lines, rank 8 first, pieces in ASCII and '.' for empty.
#[allow(dead_code)]
pub fn parse_grid(board_str: &str) -> Grid {
    let rows = board_str
        .split('\n')
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().filter(|ch| !ch.is_whitespace()).collect_vec())
        .collect_vec();
    assert_eq!(rows.len(), 8);
    let mut grid = Grid::new();
    for (row_idx, row) in rows.iter().rev().enumerate() {
        assert_eq!(row.len(), 8);
        for (col_idx, &ch) in row.iter().enumerate() {
            let coord = Coord::new(
                Row::from_zero_based(row_idx as u8),
                Col::from_zero_based(col_idx as u8),
            );
            grid[coord] = if ch == '.' { None } else { Some(Piece::from_ascii(ch).unwrap()) };
        }
    }
    grid
}
