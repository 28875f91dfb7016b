//! Rectangular character blocks used to compose tree layouts.

use std::collections::VecDeque;

/// A rectangle of characters, every row exactly `width` wide.
///
/// Blocks are never edited in place once built: layouts are composed by
/// placing finished blocks beside or below each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    width: usize,
    rows: VecDeque<Vec<char>>,
}

impl Block {
    /// A single-row block holding `text`.
    pub fn leaf(text: &str) -> Self {
        let row: Vec<char> = text.chars().collect();
        Self {
            width: row.len(),
            rows: VecDeque::from([row]),
        }
    }

    /// A block of `height` blank rows.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: (0..height).map(|_| vec![' '; width]).collect(),
        }
    }

    /// Places blocks next to each other, top aligned.
    ///
    /// Shorter blocks are padded with blank rows at the bottom. A single
    /// block is returned as is.
    pub fn beside(mut blocks: Vec<Block>) -> Self {
        if blocks.len() == 1 {
            if let Some(block) = blocks.pop() {
                return block;
            }
        }

        let width = blocks.iter().map(|b| b.width).sum();
        let height = blocks.iter().map(|b| b.rows.len()).max().unwrap_or(0);

        let rows = (0..height)
            .map(|y| {
                let mut row = Vec::with_capacity(width);
                for block in &blocks {
                    match block.rows.get(y) {
                        Some(cells) => row.extend_from_slice(cells),
                        None => row.extend(std::iter::repeat(' ').take(block.width)),
                    }
                }
                row
            })
            .collect();

        Self { width, rows }
    }

    /// Stacks `lower` under `self`. Both must have the same width.
    ///
    /// Only the rows of the shorter block are moved.
    pub fn above(mut self, mut lower: Block) -> Self {
        debug_assert_eq!(self.width, lower.width);
        if self.rows.len() >= lower.rows.len() {
            self.rows.extend(lower.rows);
            self
        } else {
            while let Some(row) = self.rows.pop_back() {
                lower.rows.push_front(row);
            }
            lower
        }
    }

    /// Adds blank columns on both sides.
    pub fn pad(self, left: usize, right: usize) -> Self {
        let width = left + self.width + right;
        let rows = self
            .rows
            .into_iter()
            .map(|cells| {
                let mut row = Vec::with_capacity(width);
                row.extend(std::iter::repeat(' ').take(left));
                row.extend(cells);
                row.extend(std::iter::repeat(' ').take(right));
                row
            })
            .collect();
        Self { width, rows }
    }

    /// Writes `glyph` at column `x` of row `y`, clamping `x` to the block.
    pub fn with_glyph(mut self, x: usize, y: usize, glyph: char) -> Self {
        if self.width == 0 {
            return self;
        }
        if let Some(row) = self.rows.get_mut(y) {
            row[x.min(self.width - 1)] = glyph;
        }
        self
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Converts the rows to strings with trailing blanks removed.
    pub fn into_lines(self) -> Vec<String> {
        self.rows
            .into_iter()
            .map(|cells| cells.into_iter().collect::<String>().trim_end().to_string())
            .collect()
    }
}
