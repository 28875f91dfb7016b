//! Terminal output of dependency trees.
//!
//! [`TreeRenderer`] lays a graph out as lines of ASCII art; [`wrap`] folds
//! drawings wider than the terminal into stacked bands.
//!
//! # Example
//!
//! ```rust
//! use depgrapher::graph::Graph;
//! use depgrapher::render;
//!
//! let mut graph = Graph::new();
//! graph.add_edge_and_nodes("app".to_string(), "lib".to_string());
//!
//! let mut out = Vec::new();
//! render::write_lines(&mut out, &render::render_full_tree(&graph)).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), " [app]\n   |\n   V\n [lib]\n");
//! ```

mod block;
mod tree;

pub use tree::{render_full_tree, render_tree, TreeRenderer, EMPTY_GRAPH};

use std::io::{self, IsTerminal, Write};

use crossterm::terminal;
use log::{debug, warn};

/// Splits lines wider than `max_width` into bands stacked vertically.
///
/// Band `k` holds columns `k * max_width .. (k + 1) * max_width` of every
/// line; bands are separated by an empty line. Nothing changes when every
/// line fits or when `max_width` is zero.
///
/// # Example
///
/// ```rust
/// use depgrapher::render::wrap;
///
/// let lines = vec!["abcdef".to_string(), "xy".to_string()];
/// assert_eq!(wrap(lines, 4), vec!["abcd", "xy", "", "ef", ""]);
/// ```
pub fn wrap(lines: Vec<String>, max_width: usize) -> Vec<String> {
    let widest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    if max_width == 0 || widest <= max_width {
        return lines;
    }

    let bands = widest.div_ceil(max_width);
    let mut wrapped = Vec::with_capacity(bands * (lines.len() + 1));
    for band in 0..bands {
        if band > 0 {
            wrapped.push(String::new());
        }
        for line in &lines {
            let part: String = line
                .chars()
                .skip(band * max_width)
                .take(max_width)
                .collect();
            wrapped.push(part.trim_end().to_string());
        }
    }
    wrapped
}

/// Returns the column count of the terminal attached to stdout.
///
/// `None` when stdout is not a terminal or its size is unknown, in which
/// case output should not be wrapped.
pub fn terminal_width() -> Option<usize> {
    if !io::stdout().is_terminal() {
        debug!("stdout is not a terminal, output will not be wrapped");
        return None;
    }
    match terminal::size() {
        Ok((0, _)) => {
            warn!("Terminal reports a width of zero, output will not be wrapped");
            None
        }
        Ok((columns, _)) => Some(usize::from(columns)),
        Err(e) => {
            warn!("Unable to get terminal size: {}", e);
            None
        }
    }
}

/// Writes each line followed by a newline.
pub fn write_lines<W: Write>(writer: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_wrap_fits() {
        let lines = owned(&["abc", "de"]);
        assert_eq!(wrap(lines.clone(), 3), lines);
        assert_eq!(wrap(lines.clone(), 0), lines);
    }

    #[test]
    fn test_wrap_three_bands() {
        let wrapped = wrap(owned(&["0123456789", "ab   cd"]), 4);
        assert_eq!(
            wrapped,
            owned(&["0123", "ab", "", "4567", " cd", "", "89", ""])
        );
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap(Vec::new(), 10).is_empty());
    }

    #[test]
    fn test_write_lines() {
        let mut out = Vec::new();
        write_lines(&mut out, &owned(&["a", "", "b"])).unwrap();
        assert_eq!(out, b"a\n\nb\n");
    }
}
