//! Grid assembler: 81 labels and their textual form.
use crate::cells::{CELL_COUNT, GRID_SIZE};
use crate::classifier::Label;
use crate::error::{Result, SudokuError};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Character written for an empty cell.
pub const EMPTY_SENTINEL: char = '0';

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridLayout {
    /// 81 characters on one line.
    #[default]
    Line,
    /// Nine lines of nine characters separated by `\n`.
    Rows,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub layout: GridLayout,
    /// Written instead of the best guess for low-confidence cells.
    pub low_confidence_marker: Option<char>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridTextError {
    #[error("expected 81 cells, found {0}")]
    WrongLength(usize),
    #[error("invalid cell character {ch:?} at position {index}")]
    InvalidChar { index: usize, ch: char },
}

/// 9×9 puzzle in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct PuzzleGrid {
    labels: Vec<Label>,
}

impl PuzzleGrid {
    pub fn from_labels(labels: Vec<Label>) -> Result<Self> {
        if labels.len() != CELL_COUNT {
            return Err(SudokuError::Segmentation(format!(
                "expected {CELL_COUNT} cell labels, got {}",
                labels.len()
            )));
        }
        Ok(Self { labels })
    }

    /// Grid from digits, 0 meaning empty. Values above 9 are treated as empty.
    pub fn from_digits(digits: &[[u8; GRID_SIZE]; GRID_SIZE]) -> Self {
        let labels = digits
            .iter()
            .flatten()
            .map(|&d| match d {
                1..=9 => Label::digit(d, 1.0),
                _ => Label::empty(),
            })
            .collect();
        Self { labels }
    }

    pub fn get(&self, row: usize, col: usize) -> &Label {
        &self.labels[row * GRID_SIZE + col]
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Digits per cell, 0 for empty.
    pub fn digits(&self) -> [[u8; GRID_SIZE]; GRID_SIZE] {
        let mut out = [[0u8; GRID_SIZE]; GRID_SIZE];
        for (i, label) in self.labels.iter().enumerate() {
            out[i / GRID_SIZE][i % GRID_SIZE] = label.digit.unwrap_or(0);
        }
        out
    }

    pub fn clue_count(&self) -> usize {
        self.labels.iter().filter(|l| !l.is_empty()).count()
    }

    /// `(row, col)` of every cell whose prediction was flagged.
    pub fn low_confidence_cells(&self) -> Vec<(usize, usize)> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.low_confidence)
            .map(|(i, _)| (i / GRID_SIZE, i % GRID_SIZE))
            .collect()
    }

    /// One-line summary of the uncertain cells, e.g.
    /// `low confidence at r2c2=7 (0.20)`; `None` when every cell is confident.
    pub fn low_confidence_note(&self) -> Option<String> {
        let cells: Vec<String> = self
            .low_confidence_cells()
            .into_iter()
            .map(|(row, col)| {
                let label = self.get(row, col);
                let guess = label.digit.map_or(EMPTY_SENTINEL, |d| char::from(b'0' + d));
                format!("r{}c{}={guess} ({:.2})", row + 1, col + 1, label.confidence)
            })
            .collect();
        (!cells.is_empty()).then(|| format!("low confidence at {}", cells.join(", ")))
    }

    pub fn render(&self, options: &RenderOptions) -> String {
        let mut out = String::with_capacity(CELL_COUNT + GRID_SIZE);
        for (i, label) in self.labels.iter().enumerate() {
            if options.layout == GridLayout::Rows && i > 0 && i % GRID_SIZE == 0 {
                out.push('\n');
            }
            let ch = match (label.digit, options.low_confidence_marker) {
                (Some(_), Some(marker)) if label.low_confidence => marker,
                (Some(d), _) => char::from(b'0' + d),
                (None, _) => EMPTY_SENTINEL,
            };
            out.push(ch);
        }
        out
    }

    pub fn to_line(&self) -> String {
        self.render(&RenderOptions::default())
    }
}

impl fmt::Display for PuzzleGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Accepts either layout; whitespace is ignored and `.` is read as empty.
impl FromStr for PuzzleGrid {
    type Err = GridTextError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut labels = Vec::with_capacity(CELL_COUNT);
        for (index, ch) in s.chars().filter(|c| !c.is_whitespace()).enumerate() {
            let label = match ch {
                '1'..='9' => Label::digit(ch as u8 - b'0', 1.0),
                '0' | '.' => Label::empty(),
                _ => return Err(GridTextError::InvalidChar { index, ch }),
            };
            labels.push(label);
        }
        if labels.len() != CELL_COUNT {
            return Err(GridTextError::WrongLength(labels.len()));
        }
        Ok(Self { labels })
    }
}

impl Serialize for PuzzleGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_line())
    }
}
