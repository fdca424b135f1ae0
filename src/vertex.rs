//! Board point codec.
//!
//! SGF writes a point as two letters, column first. `a`..`z` stand for 0 to
//! 25 and `A`..`Z` continue with 26 to 51, so boards up to 52x52 are
//! addressable. Point lists may be compressed as rectangles `ab:cd`.

/// A board point as `(column, row)`.
pub type Vertex = (i32, i32);

/// The point returned for text that does not encode a point.
pub const NO_VERTEX: Vertex = (-1, -1);

const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn letter_index(byte: u8) -> Option<i32> {
    match byte {
        b'a'..=b'z' => Some(i32::from(byte - b'a')),
        b'A'..=b'Z' => Some(i32::from(byte - b'A') + 26),
        _ => None,
    }
}

fn index_letter(index: i32) -> Option<char> {
    let index = usize::try_from(index).ok()?;
    ALPHABET.get(index).map(|&b| char::from(b))
}

/// Decodes a two-letter point.
///
/// # Examples
///
/// ```rust
/// use sgf_format::{parse_vertex, NO_VERTEX};
///
/// assert_eq!(parse_vertex("bb"), (1, 1));
/// assert_eq!(parse_vertex("jj"), (9, 9));
/// assert_eq!(parse_vertex("Aa"), (26, 0));
/// assert_eq!(parse_vertex(""), NO_VERTEX);
/// assert_eq!(parse_vertex("a"), NO_VERTEX);
/// assert_eq!(parse_vertex("a1"), NO_VERTEX);
/// ```
#[must_use]
pub fn parse_vertex(text: &str) -> Vertex {
    match text.as_bytes() {
        &[x, y] => match (letter_index(x), letter_index(y)) {
            (Some(x), Some(y)) => (x, y),
            _ => NO_VERTEX,
        },
        _ => NO_VERTEX,
    }
}

/// Encodes a point; returns an empty string for points off every board.
///
/// # Examples
///
/// ```rust
/// use sgf_format::stringify_vertex;
///
/// assert_eq!(stringify_vertex((1, 1)), "bb");
/// assert_eq!(stringify_vertex((26, 51)), "AZ");
/// assert_eq!(stringify_vertex((-1, -1)), "");
/// assert_eq!(stringify_vertex((52, 0)), "");
/// ```
#[must_use]
pub fn stringify_vertex(vertex: Vertex) -> String {
    match (index_letter(vertex.0), index_letter(vertex.1)) {
        (Some(x), Some(y)) => [x, y].iter().collect(),
        _ => String::new(),
    }
}

/// Expands a point or a compressed rectangle of points.
///
/// The rectangle corners may come in any order. Points are listed column by
/// column.
///
/// # Examples
///
/// ```rust
/// use sgf_format::parse_compressed_vertices;
///
/// assert_eq!(
///     parse_compressed_vertices("ab:bc"),
///     vec![(0, 1), (0, 2), (1, 1), (1, 2)]
/// );
/// assert_eq!(parse_compressed_vertices("bb"), vec![(1, 1)]);
/// ```
#[must_use]
pub fn parse_compressed_vertices(text: &str) -> Vec<Vertex> {
    let Some((first, second)) = text.split_once(':') else {
        return vec![parse_vertex(text)];
    };

    let start = parse_vertex(first);
    let end = parse_vertex(second);
    if start == NO_VERTEX || end == NO_VERTEX {
        return Vec::new();
    }

    let (min_x, max_x) = (start.0.min(end.0), start.0.max(end.0));
    let (min_y, max_y) = (start.1.min(end.1), start.1.max(end.1));

    (min_x..=max_x)
        .flat_map(|x| (min_y..=max_y).map(move |y| (x, y)))
        .collect()
}
