//! Byte offset to line/column conversion.

use rowan::TextSize;

/// 1-based line and byte column, as printed by Go tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(i, _)| TextSize::from(i as u32 + 1)),
        );
        Self { line_starts }
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = self.line_starts.partition_point(|start| *start <= offset) - 1;
        LineCol {
            line: line as u32 + 1,
            col: u32::from(offset - self.line_starts[line]) + 1,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line() {
        let index = LineIndex::new("package a\n");
        assert_eq!(index.line_col(0.into()), LineCol { line: 1, col: 1 });
        assert_eq!(index.line_col(8.into()), LineCol { line: 1, col: 9 });
    }

    #[test]
    fn after_newlines() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_col(2.into()), LineCol { line: 2, col: 1 });
        assert_eq!(index.line_col(4.into()), LineCol { line: 2, col: 3 });
        assert_eq!(index.line_col(6.into()), LineCol { line: 4, col: 1 });
    }
}
