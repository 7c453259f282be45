/// A line-oriented text buffer with nested indentation.
///
/// The indent prefix is applied to a line only when the first write to that
/// line happens, so indentation changes between writes to the same line have
/// no effect on it.
pub struct IndentedLineBuffer {
    indent: String,
    indent_size: usize,
    lines: Vec<String>,
    current: String,
}

impl IndentedLineBuffer {
    pub fn new() -> IndentedLineBuffer {
        IndentedLineBuffer::with_indent_size(4)
    }

    pub fn with_indent_size(indent_size: usize) -> IndentedLineBuffer {
        IndentedLineBuffer {
            indent: String::new(),
            indent_size,
            lines: Vec::new(),
            current: String::new(),
        }
    }

    /// Increase the indent by one level.
    pub fn indent(&mut self) -> &mut Self {
        for _ in 0..self.indent_size {
            self.indent.push(' ');
        }
        self
    }

    /// Decrease the indent by one level, clamped at zero.
    pub fn dedent(&mut self) -> &mut Self {
        let new_len = self.indent.len().saturating_sub(self.indent_size);
        self.indent.truncate(new_len);
        self
    }

    pub fn reset_indent(&mut self) -> &mut Self {
        self.indent.clear();
        self
    }

    /// Append text to the current line, prefixing the indent if the line is
    /// still empty.
    pub fn write(&mut self, text: &str) -> &mut Self {
        if !text.is_empty() && self.current.is_empty() && !self.indent.is_empty() {
            self.current.push_str(&self.indent);
        }
        self.current.push_str(text);
        self
    }

    /// Append text and complete the current line.
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.write(text);
        self.newline()
    }

    /// Complete the current line. A call with nothing written produces a
    /// truly empty line (no indent).
    pub fn newline(&mut self) -> &mut Self {
        self.lines.push(std::mem::take(&mut self.current));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.current.is_empty()
    }

    /// Replay this buffer into another one. Completed lines pick up the
    /// target's current indent, which is how indented child sections shift
    /// their whole content by one level.
    pub fn write_to(&self, out: &mut IndentedLineBuffer) {
        for line in &self.lines {
            out.line(line);
        }
        if !self.current.is_empty() {
            out.write(&self.current);
        }
    }

    /// Render to a string, terminating every completed line with a newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&self.current);
        out
    }
}

impl Default for IndentedLineBuffer {
    fn default() -> Self {
        IndentedLineBuffer::new()
    }
}
