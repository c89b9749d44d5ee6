//! Board-to-SVG renderer. Produces the image attached to every game status.

use chess::{ChessMove, Color, File, Piece, Rank, Square};
use itertools::Itertools;

use crate::engine::ChessState;

const LIGHT_SQUARE: &str = "#f0d9b5";
const DARK_SQUARE: &str = "#b58863";
const LIGHT_HIGHLIGHT: &str = "#cdd26a";
const DARK_HIGHLIGHT: &str = "#aaa23a";

/// Renders the position from `orientation`'s point of view, highlighting the
/// squares of `last_move` when there is one.
pub fn render(state: &ChessState, orientation: Color, size: u32) -> Vec<u8> {
    let square_size = size as f32 / 8.0;
    let last_move = state.last_move();

    let squares = (0..8)
        .cartesian_product(0..8)
        .map(|(row, column)| {
            let square = square_at(orientation, row, column);
            let fill = square_fill(square, last_move, row, column);
            let x = column as f32 * square_size;
            let y = row as f32 * square_size;
            let mut element = format!(
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>",
                x, y, square_size, square_size, fill
            );
            if let Some(glyph) = piece_glyph(state, square) {
                element.push_str(&format!(
                    "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"{:.1}\" text-anchor=\"middle\">{}</text>",
                    x + square_size / 2.0,
                    y + square_size * 0.82,
                    square_size * 0.8,
                    glyph
                ));
            }
            element
        })
        .join("\n");

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" \
         viewBox=\"0 0 {size} {size}\">\n{squares}\n</svg>\n"
    )
    .into_bytes()
}

// Display row 0 is the top of the image; the mover's back rank sits at the
// bottom.
fn square_at(orientation: Color, row: usize, column: usize) -> Square {
    let (rank, file) = match orientation {
        Color::White => (7 - row, column),
        Color::Black => (row, 7 - column),
    };
    Square::make_square(Rank::from_index(rank), File::from_index(file))
}

fn square_fill(
    square: Square,
    last_move: Option<ChessMove>,
    row: usize,
    column: usize,
) -> &'static str {
    let light = (row + column) % 2 == 0;
    let highlighted = last_move
        .map(|mv| mv.get_source() == square || mv.get_dest() == square)
        .unwrap_or(false);
    match (light, highlighted) {
        (true, false) => LIGHT_SQUARE,
        (false, false) => DARK_SQUARE,
        (true, true) => LIGHT_HIGHLIGHT,
        (false, true) => DARK_HIGHLIGHT,
    }
}

fn piece_glyph(state: &ChessState, square: Square) -> Option<char> {
    let piece = state.board().piece_on(square)?;
    let glyph = match (piece, state.board().color_on(square)?) {
        (Piece::Pawn, Color::White) => '♙',
        (Piece::Knight, Color::White) => '♘',
        (Piece::Bishop, Color::White) => '♗',
        (Piece::Rook, Color::White) => '♖',
        (Piece::Queen, Color::White) => '♕',
        (Piece::King, Color::White) => '♔',
        (Piece::Pawn, Color::Black) => '♟',
        (Piece::Knight, Color::Black) => '♞',
        (Piece::Bishop, Color::Black) => '♝',
        (Piece::Rook, Color::Black) => '♜',
        (Piece::Queen, Color::Black) => '♛',
        (Piece::King, Color::Black) => '♚',
    };
    Some(glyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_squares_and_pieces() {
        let state = ChessState::new();
        let image = render(&state, Color::White, 600);
        let svg = String::from_utf8(image).unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<rect").count(), 64);
        // 32 pieces on the starting board
        assert_eq!(svg.matches("<text").count(), 32);
        assert_eq!(svg.matches('♙').count(), 8);
        assert_eq!(svg.matches('♚').count(), 1);
    }

    #[test]
    fn last_move_squares_are_highlighted() {
        let mut state = ChessState::new();
        state.apply_move("e4").unwrap();
        let svg = String::from_utf8(render(&state, Color::Black, 600)).unwrap();
        assert_eq!(svg.matches(LIGHT_HIGHLIGHT).count() + svg.matches(DARK_HIGHLIGHT).count(), 2);
    }

    #[test]
    fn orientation_flips_the_board() {
        let state = ChessState::new();
        let white_view = String::from_utf8(render(&state, Color::White, 400)).unwrap();
        let black_view = String::from_utf8(render(&state, Color::Black, 400)).unwrap();
        // white's pieces sit on the bottom half in the white view and the
        // top half in the black view
        let first_text = |svg: &str| {
            let start = svg.find("<text").unwrap();
            svg[start..].chars().find(|c| "♙♘♗♖♕♔♟♞♝♜♛♚".contains(*c)).unwrap()
        };
        assert_eq!(first_text(&white_view), '♜');
        assert_eq!(first_text(&black_view), '♖');
    }
}
