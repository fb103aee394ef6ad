use chessfront::coord::{Col, Coord, NUM_COLS, NUM_ROWS, Row};
use chessfront::display::{
    BoardOrientation, DisplayCoord, DisplayPlayer, RenderedBoard, RenderedSquare,
    from_display_coord, to_display_coord,
};
use chessfront::history::MoveHistory;
use chessfront::piece::PromotionTarget;
use chessfront::promotion::promotion_choices;
use console::Style;
use enum_map::EnumMap;
use itertools::Itertools;


const SQUARE_WIDTH: u16 = 3;
// Visible width of every line produced by `render_board`: header columns on both sides.
pub const BOARD_WIDTH: usize = (NUM_COLS as usize + 2) * SQUARE_WIDTH as usize;
// Screen line of the top rank: player label and file letters come first.
const GRID_TOP: u16 = 2;

pub fn render_board(
    board: &RenderedBoard, orientation: BoardOrientation,
    labels: &EnumMap<DisplayPlayer, String>, unicode_pieces: bool,
) -> String {
    format!(
        "{:<width$}\n{}{:<width$}",
        labels[DisplayPlayer::Top],
        render_grid(board, orientation, unicode_pieces),
        labels[DisplayPlayer::Bottom],
        width = BOARD_WIDTH,
    )
}

fn render_grid(
    board: &RenderedBoard, orientation: BoardOrientation, unicode_pieces: bool,
) -> String {
    let colors = [
        Style::new().color256(233).on_color256(222),
        Style::new().color256(233).on_color256(230),
    ];
    let mut ret = String::new();
    for y in (-1)..=(NUM_ROWS as i32) {
        for x in (-1)..=(NUM_COLS as i32) {
            let row_header = x < 0 || x >= NUM_COLS.into();
            let col_header = y < 0 || y >= NUM_ROWS.into();
            let square = match (row_header, col_header) {
                (true, true) => format_square(' '),
                (true, false) => format_square(display_row(y as u8, orientation).to_algebraic()),
                (false, true) => format_square(display_col(x as u8, orientation).to_algebraic()),
                (false, false) => {
                    let q = DisplayCoord { x: x as u8, y: y as u8 };
                    match from_display_coord(q, orientation) {
                        Some(coord) => {
                            let color_idx =
                                (coord.row.to_zero_based() + coord.col.to_zero_based()) % 2;
                            let style = square_style(board.square(coord))
                                .unwrap_or_else(|| colors[color_idx as usize].clone());
                            style
                                .apply_to(format_square(square_glyph(
                                    board.square(coord),
                                    unicode_pieces,
                                )))
                                .to_string()
                        }
                        None => format_square(' '),
                    }
                }
            };
            ret.push_str(&square);
        }
        ret.push('\n');
    }
    ret
}

// Highlights override the checkered background. Check wins over everything else.
fn square_style(square: &RenderedSquare) -> Option<Style> {
    let highlights = square.highlights;
    let base = Style::new().color256(233);
    if highlights.check {
        Some(base.on_color256(203))
    } else if highlights.selected {
        Some(base.on_color256(220))
    } else if highlights.legal_destination {
        Some(base.on_color256(151))
    } else {
        None
    }
}

fn square_glyph(square: &RenderedSquare, unicode_pieces: bool) -> char {
    match square.piece {
        Some(piece) if unicode_pieces => piece.to_pictogram(),
        Some(piece) => piece.to_ascii(),
        None if square.highlights.legal_destination => '·',
        None => ' ',
    }
}

fn display_row(y: u8, orientation: BoardOrientation) -> Row {
    let coord = from_display_coord(DisplayCoord { x: 0, y }, orientation).unwrap_or(Coord::A1);
    coord.row
}

fn display_col(x: u8, orientation: BoardOrientation) -> Col {
    let coord = from_display_coord(DisplayCoord { x, y: 0 }, orientation).unwrap_or(Coord::A1);
    coord.col
}

fn format_square(ch: char) -> String { format!(" {} ", ch) }

// Maps a terminal cell (as reported by mouse events) to the board square drawn there.
pub fn square_at(column: u16, line: u16, orientation: BoardOrientation) -> Option<Coord> {
    let x = (column / SQUARE_WIDTH).checked_sub(1)?;
    let y = line.checked_sub(GRID_TOP)?;
    let q = DisplayCoord {
        x: u8::try_from(x).ok()?,
        y: u8::try_from(y).ok()?,
    };
    from_display_coord(q, orientation)
}

pub fn render_history(history: &MoveHistory, max_rows: usize) -> Vec<String> {
    let header = Style::new().bold().apply_to("Moves").to_string();
    let rows = history
        .visible_rows(max_rows)
        .iter()
        .map(|row| format!("{:>3}. {:<8} {}", row.number, row.white, row.black));
    std::iter::once(header).chain(rows).collect()
}

pub fn render_promotion_prompt() -> String {
    let choices = promotion_choices().map(promotion_choice_label).join("  ");
    format!("Promote to: {}", Style::new().yellow().apply_to(choices))
}

fn promotion_choice_label(target: PromotionTarget) -> String {
    let key = target.to_algebraic().to_ascii_lowercase();
    let name = match target {
        PromotionTarget::Knight => "knight",
        PromotionTarget::Bishop => "bishop",
        PromotionTarget::Rook => "rook",
        PromotionTarget::Queen => "queen",
    };
    format!("[{}] {}", key, name)
}

// Board on the left, move list on the right.
pub fn render_side_by_side(board: &str, history: &[String]) -> String {
    board
        .lines()
        .zip_longest(history.iter().map(String::as_str))
        .map(|pair| {
            let (left, right) = pair.or("", "");
            format!("{}    {}", pad_visible(left), right)
        })
        .join("\n")
}

fn pad_visible(s: &str) -> String {
    let visible = console::measure_text_width(s);
    format!("{}{}", s, " ".repeat(BOARD_WIDTH.saturating_sub(visible)))
}

pub fn square_center(coord: Coord, orientation: BoardOrientation) -> (u16, u16) {
    let q = to_display_coord(coord, orientation);
    ((u16::from(q.x) + 1) * SQUARE_WIDTH + 1, u16::from(q.y) + GRID_TOP)
}
