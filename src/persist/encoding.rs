//! Flat string encoding of a board.
//!
//! Two strings of `size²` characters each, row-major:
//!
//! - kinds: `'a' + ordinal`, upper-cased for a preview token;
//! - colors: `'0' + color`, with `'0'` for colorless tokens.
//!
//! ```
//! use gem_lines::core::Coord;
//! use gem_lines::grid::{Grid, Token};
//! use gem_lines::persist::{decode_grid, encode_grid};
//!
//! let mut grid = Grid::new(5);
//! grid.place(Coord::new(1, 0), Token::normal(3)).unwrap();
//! let (kinds, colors) = encode_grid(&grid);
//! assert!(kinds.starts_with("ab"));
//! assert!(colors.starts_with("03"));
//! assert_eq!(decode_grid(&kinds, &colors, 5, 7).unwrap(), grid);
//! ```

use crate::core::{Coord, SaveError};
use crate::grid::{Grid, Token, TokenKind};

/// Encode `grid` as `(kinds, colors)`.
#[must_use]
pub fn encode_grid(grid: &Grid) -> (String, String) {
    let mut kinds = String::with_capacity(grid.cell_count());
    let mut colors = String::with_capacity(grid.cell_count());
    for cell in grid.cells() {
        let token = cell.token();
        let kind = char::from(b'a' + token.kind().ordinal());
        kinds.push(if cell.is_preview() {
            kind.to_ascii_uppercase()
        } else {
            kind
        });
        colors.push(char::from(b'0' + token.color().unwrap_or(0)));
    }
    (kinds, colors)
}

/// Decode a board previously written by [`encode_grid`].
pub fn decode_grid(
    kinds: &str,
    colors: &str,
    size: usize,
    color_count: u8,
) -> Result<Grid, SaveError> {
    let expected = size * size;
    for text in [kinds, colors] {
        let actual = text.chars().count();
        if actual != expected {
            return Err(SaveError::LengthMismatch { expected, actual });
        }
    }

    let mut grid = Grid::new(size);
    for (index, (k, c)) in kinds.chars().zip(colors.chars()).enumerate() {
        let coord = Coord::from_index(index, size);
        let preview = k.is_ascii_uppercase();
        let kind = decode_kind(k)?;
        let color = decode_color(c)?;

        if kind.is_colored() && color >= color_count {
            return Err(SaveError::ColorOutOfRange { color, color_count });
        }
        if preview && kind == TokenKind::Empty {
            return Err(SaveError::EmptyPreview(coord));
        }

        let token = Token::new(kind, color);
        let cell = &mut grid[coord];
        if preview {
            cell.set_preview(token);
        } else {
            cell.set_active(token);
        }
    }
    Ok(grid)
}

fn decode_kind(c: char) -> Result<TokenKind, SaveError> {
    if !c.is_ascii_alphabetic() {
        return Err(SaveError::InvalidKind(c));
    }
    let ordinal = c.to_ascii_lowercase() as u8 - b'a';
    TokenKind::from_ordinal(ordinal).ok_or(SaveError::InvalidKind(c))
}

fn decode_color(c: char) -> Result<u8, SaveError> {
    c.to_digit(10)
        .map(|d| d as u8)
        .ok_or(SaveError::InvalidColor(c))
}
