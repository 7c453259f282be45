use crate::builder::line::IndentedLineBuffer;
use crate::builder::section::SectionBuffer;

/// A builder for javascript function blocks. The body is a section buffer
/// handle, so it can keep being filled after the builder has been appended
/// to its enclosing buffer.
pub struct FunctionBuilder {
    name: Option<String>,
    parameters: Vec<String>,
    body: SectionBuffer,
    end_with_newline: bool,
}

impl FunctionBuilder {
    pub fn new() -> FunctionBuilder {
        FunctionBuilder {
            name: None,
            parameters: Vec::new(),
            body: SectionBuffer::new(),
            end_with_newline: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn parameter(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(name.into());
        self
    }

    pub fn end_with_newline(mut self) -> Self {
        self.end_with_newline = true;
        self
    }

    pub fn body(&self) -> SectionBuffer {
        self.body.clone()
    }

    pub fn write_to(&self, out: &mut IndentedLineBuffer) {
        match &self.name {
            Some(name) => {
                out.write(&format!("function {}(", name));
            }
            None => {
                out.write("function(");
            }
        }
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                out.write(", ");
            }
            out.write(parameter);
        }
        out.line(") {").indent();
        self.body.write_to(out);
        out.dedent().write("}");
        if self.end_with_newline {
            out.newline();
        }
    }
}

impl Default for FunctionBuilder {
    fn default() -> Self {
        FunctionBuilder::new()
    }
}
