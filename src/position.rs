//! Source positions: the spatial substrate shared by tokens, AST nodes,
//! and diagnostics.

use std::fmt;

/// A precise location in a source file.
///
/// `byte_offset`, `line`, and `column` are all zero-based internally;
/// [`Position::line_number`] and [`Position::column_number`] convert to the
/// 1-based numbers used for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub file: String,
    pub byte_offset: usize,
    pub line_start_offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(
        file: impl Into<String>,
        byte_offset: usize,
        line_start_offset: usize,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            file: file.into(),
            byte_offset,
            line_start_offset,
            line,
            column,
        }
    }

    /// The all-zero sentinel meaning "no known position".
    pub fn no_pos() -> Position {
        Position {
            file: String::new(),
            byte_offset: 0,
            line_start_offset: 0,
            line: 0,
            column: 0,
        }
    }

    /// Returns a new position advanced by `n` bytes. Callers must guarantee
    /// the advance stays on the same line (this is only ever used for
    /// single-line tokens).
    pub fn advance(&self, n: usize) -> Position {
        Position {
            file: self.file.clone(),
            byte_offset: self.byte_offset + n,
            line_start_offset: self.line_start_offset,
            line: self.line,
            column: self.column + n,
        }
    }

    /// True iff any field differs from [`Position::no_pos`].
    pub fn is_valid(&self) -> bool {
        !self.file.is_empty() || self.byte_offset != 0 || self.line != 0 || self.column != 0
    }

    /// 1-based line number for display.
    pub fn line_number(&self) -> usize {
        self.line + 1
    }

    /// 1-based column number for display.
    pub fn column_number(&self) -> usize {
        self.column + 1
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::no_pos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "{}:{}", self.line_number(), self.column_number())
        } else {
            write!(f, "{}:{}:{}", self.file, self.line_number(), self.column_number())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pos_is_invalid() {
        assert!(!Position::no_pos().is_valid());
        assert!(!Position::default().is_valid());
    }

    #[test]
    fn advance_preserves_line_anchor() {
        let p = Position::new("main.ry", 10, 0, 2, 4);
        let advanced = p.advance(3);
        assert_eq!(advanced.byte_offset, 13);
        assert_eq!(advanced.column, 7);
        assert_eq!(advanced.line, 2);
        assert_eq!(advanced.line_start_offset, 0);
    }

    #[test]
    fn display_is_1_based() {
        let p = Position::new("", 0, 0, 0, 0);
        assert_eq!(p.line_number(), 1);
        assert_eq!(p.column_number(), 1);
    }

    #[test]
    fn is_valid_when_any_field_nonzero() {
        let p = Position::new("main.ry", 0, 0, 0, 0);
        assert!(p.is_valid());
    }

    #[test]
    fn equality_is_structural_on_file_line_column() {
        let a = Position::new("a.ry", 5, 0, 0, 5);
        let b = Position::new("a.ry", 5, 0, 0, 5);
        assert_eq!(a, b);
    }
}
