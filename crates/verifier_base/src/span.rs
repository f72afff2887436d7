//! Source location tracking for error reporting.
//!
//! An [`AstRange`] mirrors the `range` field the Parser collaborator attaches
//! to every node: a line/column interval rather than a byte offset, since the
//! Parser's JSON documents carry line/column pairs directly (see spec.md §6).
//! An integer offset may be applied to line numbers to account for an
//! injected prelude; [`AstRange::shift_lines`] performs that adjustment.

use std::fmt;

/// A line/column interval in the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AstRange {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl AstRange {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Covers from the start of `self` to the end of `other`.
    pub fn merge(self, other: AstRange) -> AstRange {
        let (start_line, start_column) = if self.start_line <= other.start_line {
            (self.start_line, self.start_column)
        } else {
            (other.start_line, other.start_column)
        };
        let (end_line, end_column) = if self.end_line >= other.end_line {
            (self.end_line, self.end_column)
        } else {
            (other.end_line, other.end_column)
        };
        AstRange {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Adjusts line numbers by `offset`, undoing an injected-prelude shift.
    pub fn shift_lines(self, offset: i64) -> AstRange {
        let shift = |line: u32| -> u32 { (line as i64 - offset).max(0) as u32 };
        AstRange {
            start_line: shift(self.start_line),
            end_line: shift(self.end_line),
            ..self
        }
    }
}

impl fmt::Display for AstRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_new_stores_positions() {
        let r = AstRange::new(1, 2, 1, 8);
        assert_eq!(r.start_line, 1);
        assert_eq!(r.end_column, 8);
    }

    #[test]
    fn range_merge_covers_both() {
        let a = AstRange::new(1, 0, 1, 5);
        let b = AstRange::new(2, 0, 2, 3);
        let m = a.merge(b);
        assert_eq!(m.start_line, 1);
        assert_eq!(m.end_line, 2);
        assert_eq!(m.end_column, 3);
    }

    #[test]
    fn shift_lines_subtracts_prelude_offset() {
        let r = AstRange::new(10, 0, 12, 4);
        let shifted = r.shift_lines(5);
        assert_eq!(shifted.start_line, 5);
        assert_eq!(shifted.end_line, 7);
    }

    #[test]
    fn shift_lines_clamps_at_zero() {
        let r = AstRange::new(2, 0, 3, 0);
        let shifted = r.shift_lines(10);
        assert_eq!(shifted.start_line, 0);
    }
}
