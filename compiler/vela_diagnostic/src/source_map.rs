//! Source file bookkeeping: path, contents, and line starts.
//!
//! Spans are byte offsets; this module recovers 1-based line/column pairs
//! and line text for snippet rendering.

use vela_ir::Span;

/// A line/column position, both 1-based.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// One source file with a pre-computed line-start index.
pub struct SourceFile {
    path: String,
    src: String,
    /// Byte offset of the first character of each line.
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, src: impl Into<String>) -> Self {
        let src = src.into();
        let mut line_starts = vec![0u32];
        for (i, b) in src.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        SourceFile {
            path: path.into(),
            src,
            line_starts,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /// The line (1-based) containing a byte offset.
    fn line_index(&self, offset: u32) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        }
    }

    /// Convert a byte offset to a 1-based line/column pair.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let line = self.line_index(offset);
        let col = offset - self.line_starts[line] + 1;
        LineCol {
            line: line as u32 + 1,
            col,
        }
    }

    /// The text of a 1-based line, without its trailing newline.
    pub fn line_text(&self, line: u32) -> &str {
        let idx = line as usize - 1;
        let start = self.line_starts[idx] as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.src.len(), |&s| s as usize);
        self.src[start..end].trim_end_matches(['\n', '\r'])
    }

    /// Slice the source covered by a span.
    pub fn span_text(&self, span: Span) -> &str {
        &self.src[span.to_range()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_basics() {
        let file = SourceFile::new("test.vela", "ab\ncd\nef");
        assert_eq!(file.line_col(0), LineCol { line: 1, col: 1 });
        assert_eq!(file.line_col(1), LineCol { line: 1, col: 2 });
        assert_eq!(file.line_col(3), LineCol { line: 2, col: 1 });
        assert_eq!(file.line_col(7), LineCol { line: 3, col: 2 });
    }

    #[test]
    fn line_text() {
        let file = SourceFile::new("test.vela", "first\nsecond\r\nthird");
        assert_eq!(file.line_text(1), "first");
        assert_eq!(file.line_text(2), "second");
        assert_eq!(file.line_text(3), "third");
    }

    #[test]
    fn span_text() {
        let file = SourceFile::new("test.vela", "var x: i32;");
        assert_eq!(file.span_text(Span::new(4, 5)), "x");
    }
}
