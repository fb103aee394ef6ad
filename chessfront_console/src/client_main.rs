use std::fmt;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use chessfront::client::{ClientState, NotableEvent, UserInput};
use chessfront::coord::Coord;
use chessfront::display::BoardOrientation;
use chessfront::error::InputError;
use chessfront::event::{Difficulty, GameServer, ServerResponse, TransportError};
use chessfront::force::Force;
use chessfront::piece::PromotionTarget;
use crossterm::event::{self as term_event, MouseButton, MouseEventKind};
use crossterm::style::{self, Stylize};
use crossterm::{cursor, execute, terminal};
use log::{info, warn};
use scopeguard::defer;

use crate::client_config::ClientConfig;
use crate::network::HttpGameServer;
use crate::tui;


enum IncomingEvent {
    Network(Result<ServerResponse, TransportError>),
    Terminal(term_event::Event),
    Tick,
}

enum Command {
    Input(Vec<UserInput>),
    Quit,
}

// What the last left-button press started. A press that cannot start a drag becomes a click
// if released on the same square.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum MousePress {
    Drag(Coord),
    Click(Coord),
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl fmt::Display) -> io::Result<()> {
    let s = v.to_string();
    // Note. Not using `lines()` because it removes trailing new line.
    for line in s.split('\n') {
        execute!(
            stdout,
            style::Print(line),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            cursor::MoveToNextLine(1),
            cursor::Hide
        )?;
    }
    Ok(())
}

// Board and move list as last painted. Redrawn only when the client reports a change or the
// screen was wiped.
struct BoardPane {
    board: String,
    history: Vec<String>,
    height: u16,
    needs_repaint: bool,
}

impl BoardPane {
    fn new() -> Self {
        BoardPane {
            board: String::new(),
            history: Vec::new(),
            height: 0,
            needs_repaint: true,
        }
    }

    // Re-renders the parts that changed. Returns whether the pane must be painted again.
    fn refresh(&mut self, client_state: &ClientState, config: &ClientConfig) -> bool {
        if client_state.take_board_dirt() {
            self.board = tui::render_board(
                client_state.rendered_board(),
                client_state.orientation(),
                &client_state.player_labels(),
                config.unicode_pieces,
            );
            self.needs_repaint = true;
        }
        if client_state.take_history_dirt() {
            self.history = tui::render_history(client_state.history(), config.history_rows);
            self.needs_repaint = true;
        }
        std::mem::take(&mut self.needs_repaint)
    }

    fn text(&self) -> String {
        format!("{}\n", tui::render_side_by_side(&self.board, &self.history))
    }
}

fn render(
    stdout: &mut io::Stdout, app_start_time: Instant, config: &ClientConfig,
    client_state: &ClientState, pane: &mut BoardPane, keyboard_input: &str,
    command_error: &Option<String>,
) -> io::Result<()> {
    if pane.refresh(client_state, config) {
        let text = pane.text();
        pane.height = u16::try_from(text.split('\n').count()).unwrap_or(u16::MAX);
        execute!(stdout, cursor::MoveTo(0, 0))?;
        writeln_raw(stdout, text)?;
    }
    execute!(stdout, cursor::MoveTo(0, pane.height))?;

    let status = client_state.status_line();
    let status_style = match client_state.game() {
        Some(game) if game.status.is_game_over() => style::Color::Magenta,
        _ => style::Color::White,
    };
    writeln_raw(stdout, status.with(status_style))?;
    if client_state.promotion().is_awaiting() {
        writeln_raw(stdout, tui::render_promotion_prompt())?;
    } else if client_state.is_request_pending() {
        writeln_raw(stdout, "Waiting for server...".with(style::Color::DarkGrey))?;
    } else {
        writeln_raw(stdout, "")?;
    }

    // Simulate cursor: real cursor blinking is broken with Show/Hide.
    let show_cursor = app_start_time.elapsed().as_millis() % 1000 >= 500;
    let cursor = if show_cursor { '▂' } else { ' ' };
    writeln_raw(stdout, format!("> {}{}", keyboard_input, cursor))?;
    match command_error {
        Some(err) => writeln_raw(stdout, err.clone().with(style::Color::Red))?,
        None => writeln_raw(stdout, "")?,
    }
    execute!(stdout, terminal::Clear(terminal::ClearType::FromCursorDown))?;
    Ok(())
}

// "e2" selects or targets a square, "e2e4" / "e2-e4" moves, "/new [white|black] [level]"
// starts over, "/quit" exits.
fn parse_command(input: &str, config: &ClientConfig) -> Result<Command, String> {
    let input = input.trim();
    if let Some(cmd) = input.strip_prefix('/') {
        let mut words = cmd.split_whitespace();
        return match words.next() {
            Some("quit") => Ok(Command::Quit),
            Some("new") => {
                let mut player_color = config.player_color;
                let mut difficulty = config.difficulty;
                for word in words {
                    if let Some(force) = Force::from_name(word) {
                        player_color = force;
                    } else if let Ok(level) = word.parse::<Difficulty>() {
                        difficulty = level;
                    } else {
                        return Err(format!("Unknown /new argument: '{}'", word));
                    }
                }
                Ok(Command::Input(vec![UserInput::NewGame { difficulty, player_color }]))
            }
            _ => Err(format!("Unknown command: '{}'", cmd)),
        };
    }
    let squares = input.replace('-', "");
    if !squares.is_ascii() {
        return Err(format!("Cannot parse '{}'", input));
    }
    let parse_square =
        |s: &str| Coord::from_algebraic(s).ok_or_else(|| format!("Invalid square: '{}'", s));
    match squares.len() {
        2 => Ok(Command::Input(vec![UserInput::Click(parse_square(&squares)?)])),
        4 => Ok(Command::Input(vec![
            UserInput::Click(parse_square(&squares[..2])?),
            UserInput::Click(parse_square(&squares[2..])?),
        ])),
        _ => Err(format!("Cannot parse '{}'", input)),
    }
}

fn describe_input_error(err: InputError) -> String {
    match err {
        InputError::NoGameInProgress => "No game in progress".to_owned(),
        InputError::RequestPending => "Waiting for the server".to_owned(),
        InputError::PromotionPending => "Choose a promotion piece first".to_owned(),
        InputError::NoPromotionPending => "Nothing to promote".to_owned(),
        InputError::EmptySquare => "That square is empty".to_owned(),
        InputError::NotPlayable => "That is not your piece".to_owned(),
        InputError::NoDragInProgress => "No piece is being dragged".to_owned(),
    }
}

fn board_orientation(config: &ClientConfig, player_color: Force) -> BoardOrientation {
    if config.rotate_for_black && player_color == Force::Black {
        BoardOrientation::Rotated
    } else {
        BoardOrientation::Normal
    }
}

pub fn run(config: ClientConfig) -> anyhow::Result<()> {
    let server = HttpGameServer::new(config.base_url()?)?;
    info!("Using server {}", config.server_url);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("Enabling raw terminal mode")?;
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        term_event::EnableMouseCapture,
        cursor::Hide
    )?;
    defer! {
        let _ = execute!(
            io::stdout(),
            term_event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        );
        let _ = terminal::disable_raw_mode();
    };
    let app_start_time = Instant::now();

    let (tx, rx) = mpsc::channel();
    let tx_net = tx.clone();
    let tx_local = tx.clone();
    let tx_tick = tx;
    let (requests_tx, requests_rx) = mpsc::channel();
    thread::spawn(move || {
        for request in requests_rx {
            let response = server.send(&request);
            if tx_net.send(IncomingEvent::Network(response)).is_err() {
                break;
            }
        }
    });
    thread::spawn(move || {
        loop {
            match term_event::read() {
                Ok(ev) => {
                    if tx_local.send(IncomingEvent::Terminal(ev)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!("Cannot read terminal input: {}", err);
                    break;
                }
            }
        }
    });
    thread::spawn(move || {
        loop {
            thread::sleep(Duration::from_millis(100));
            if tx_tick.send(IncomingEvent::Tick).is_err() {
                break;
            }
        }
    });

    let mut client_state = ClientState::new(requests_tx);
    let mut pane = BoardPane::new();
    let mut keyboard_input = String::new();
    let mut mouse_press = None;
    let first_game = UserInput::NewGame {
        difficulty: config.difficulty,
        player_color: config.player_color,
    };
    let mut command_error = client_state.apply_input(first_game).err().map(describe_input_error);
    for event in rx {
        match event {
            IncomingEvent::Network(response) => {
                if let Err(err) = client_state.process_server_response(response) {
                    // Status line already explains it to the user.
                    warn!("{:?}", err);
                }
            }
            IncomingEvent::Terminal(term_event::Event::Key(event)) => {
                if event.kind != term_event::KeyEventKind::Press {
                    continue;
                }
                match event.code {
                    term_event::KeyCode::Char(ch) => {
                        let promotion = PromotionTarget::from_algebraic_char(ch);
                        match promotion {
                            Some(target)
                                if keyboard_input.is_empty()
                                    && client_state.promotion().is_awaiting() =>
                            {
                                command_error = client_state
                                    .apply_input(UserInput::ChoosePromotion(target))
                                    .err()
                                    .map(describe_input_error);
                            }
                            _ => keyboard_input.push(ch),
                        }
                    }
                    term_event::KeyCode::Backspace => {
                        keyboard_input.pop();
                    }
                    term_event::KeyCode::Esc => {
                        keyboard_input.clear();
                    }
                    term_event::KeyCode::Enter => {
                        match parse_command(&keyboard_input, &config) {
                            Ok(Command::Quit) => return Ok(()),
                            Ok(Command::Input(inputs)) => {
                                command_error = inputs
                                    .into_iter()
                                    .map(|input| client_state.apply_input(input))
                                    .find_map(Result::err)
                                    .map(describe_input_error);
                            }
                            Err(err) => command_error = Some(err),
                        }
                        keyboard_input.clear();
                    }
                    _ => {}
                }
            }
            IncomingEvent::Terminal(term_event::Event::Mouse(event)) => {
                let orientation = client_state.orientation();
                let coord = tui::square_at(event.column, event.row, orientation);
                let result = match (event.kind, coord) {
                    (MouseEventKind::Down(MouseButton::Left), Some(coord)) => {
                        match client_state.apply_input(UserInput::DragStart(coord)) {
                            Ok(()) => {
                                mouse_press = Some(MousePress::Drag(coord));
                                Ok(())
                            }
                            // Not a piece of ours: may still be a destination or a deselect.
                            Err(InputError::EmptySquare | InputError::NotPlayable) => {
                                mouse_press = Some(MousePress::Click(coord));
                                Ok(())
                            }
                            Err(err) => Err(err),
                        }
                    }
                    (MouseEventKind::Up(MouseButton::Left), _) => {
                        match (mouse_press.take(), coord) {
                            (Some(MousePress::Drag(from)), Some(to)) if from != to => {
                                client_state.apply_input(UserInput::DragDrop(to))
                            }
                            (Some(MousePress::Drag(_)), _) => {
                                client_state.apply_input(UserInput::DragAbort)
                            }
                            (Some(MousePress::Click(pressed)), Some(released))
                                if pressed == released =>
                            {
                                client_state.apply_input(UserInput::Click(released))
                            }
                            _ => Ok(()),
                        }
                    }
                    _ => Ok(()),
                };
                if let Err(err) = result {
                    command_error = Some(describe_input_error(err));
                }
            }
            IncomingEvent::Terminal(_) => {}
            IncomingEvent::Tick => {
                // Any event triggers repaint, so no additional action is required.
            }
        }
        while let Some(event) = client_state.next_notable_event() {
            match event {
                NotableEvent::GameStarted => {
                    let orientation = board_orientation(&config, client_state.player_color());
                    client_state.set_orientation(orientation);
                    command_error = None;
                    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                    pane.needs_repaint = true;
                }
                NotableEvent::MoveConfirmed(_) => {
                    command_error = None;
                }
                NotableEvent::PromotionRequested(_) => {}
                NotableEvent::RequestFailed => {}
            }
        }
        render(
            &mut stdout,
            app_start_time,
            &config,
            &client_state,
            &mut pane,
            &keyboard_input,
            &command_error,
        )?;
    }
    anyhow::bail!("Unexpected end of events stream")
}


#[cfg(test)]
mod tests {
    use chessfront::test_util::starting_response;

    use super::*;

    fn parse(input: &str) -> Result<Vec<UserInput>, String> {
        match parse_command(input, &ClientConfig::default())? {
            Command::Input(inputs) => Ok(inputs),
            Command::Quit => Ok(vec![]),
        }
    }

    #[test]
    fn keyboard_commands() {
        assert_eq!(parse("e2"), Ok(vec![UserInput::Click(Coord::E2)]));
        assert_eq!(
            parse("e2-e4"),
            Ok(vec![UserInput::Click(Coord::E2), UserInput::Click(Coord::E4)])
        );
        assert_eq!(parse("g1f3").unwrap().len(), 2);
        assert_eq!(
            parse("/new black hard"),
            Ok(vec![UserInput::NewGame {
                difficulty: Difficulty::Hard,
                player_color: Force::Black,
            }])
        );
        assert_eq!(
            parse("/new"),
            Ok(vec![UserInput::NewGame {
                difficulty: Difficulty::Medium,
                player_color: Force::White,
            }])
        );
        assert!(matches!(parse_command("/quit", &ClientConfig::default()), Ok(Command::Quit)));
        assert!(parse("/new purple").is_err());
        assert!(parse("/resign").is_err());
        assert!(parse("z9").is_err());
        assert!(parse("e2e").is_err());
        assert!(parse("a€").is_err());
    }

    #[test]
    fn board_pane_repaints_only_on_change() {
        let config = ClientConfig::default();
        let (requests_tx, _requests_rx) = mpsc::channel();
        let mut client_state = ClientState::new(requests_tx);
        let mut pane = BoardPane::new();
        client_state
            .apply_input(UserInput::NewGame {
                difficulty: Difficulty::Medium,
                player_color: Force::White,
            })
            .unwrap();
        client_state.process_server_response(Ok(starting_response())).unwrap();

        assert!(pane.refresh(&client_state, &config));
        assert!(!pane.refresh(&client_state, &config));

        client_state.apply_input(UserInput::Click(Coord::E2)).unwrap();
        assert!(pane.refresh(&client_state, &config));
        assert!(!pane.refresh(&client_state, &config));

        client_state.apply_input(UserInput::Click(Coord::E7)).unwrap();
        assert!(pane.refresh(&client_state, &config));
        // Nothing selected: clicking an empty square changes nothing.
        client_state.apply_input(UserInput::Click(Coord::E5)).unwrap();
        assert!(!pane.refresh(&client_state, &config));

        pane.needs_repaint = true;
        assert!(pane.refresh(&client_state, &config));
    }
}
