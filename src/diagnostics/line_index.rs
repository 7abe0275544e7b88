use crate::span::Pos;

/// Maps 1-based line:column positions to byte offsets for a single source file.
pub struct LineIndex {
    /// Byte offset of the start of each line. line_starts[0] == 0 always.
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts, len: source.len() }
    }

    /// Byte offset of `pos`. Columns count bytes, as the Go scanner does.
    /// Unknown positions map to 0; positions past the end clamp to the end.
    pub fn pos_to_offset(&self, pos: Pos) -> usize {
        if !pos.is_known() {
            return 0;
        }
        let line = pos.line as usize - 1;
        match self.line_starts.get(line) {
            Some(start) => (start + pos.col.saturating_sub(1) as usize).min(self.len),
            None => self.len,
        }
    }

    /// End of the identifier-like token starting at `start`, so a label can
    /// underline `_!` or `err` rather than a single byte.
    pub fn token_end(&self, source: &str, start: usize) -> usize {
        let rest = match source.get(start..) {
            Some(rest) => rest,
            None => return start,
        };
        let width: usize = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '!')
            .map(char::len_utf8)
            .sum();
        if width == 0 {
            (start + 1).min(self.len)
        } else {
            start + width
        }
    }
}
