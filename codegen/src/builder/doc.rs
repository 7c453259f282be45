use crate::builder::line::IndentedLineBuffer;

#[derive(Clone, Copy, PartialEq, Eq, Default)]
enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

struct DocParam {
    name: String,
    type_name: String,
    description: String,
}

/// A builder for jsdoc comment blocks.
#[derive(Default)]
pub struct DocBuilder {
    description: Option<String>,
    parameters: Vec<DocParam>,
    type_name: Option<String>,
    enum_type: Option<String>,
    return_type: Option<String>,
    extends_type: Option<String>,
    constructor: bool,
    access: Access,
}

impl DocBuilder {
    pub fn new() -> DocBuilder {
        DocBuilder::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn param(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.parameters.push(DocParam {
            name: name.into(),
            type_name: type_name.into(),
            description: description.into(),
        });
        self
    }

    /// Sets the `@type` annotation.
    pub fn value_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn enum_type(mut self, enum_type: impl Into<String>) -> Self {
        self.enum_type = Some(enum_type.into());
        self
    }

    pub fn return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn extends_type(mut self, extends_type: impl Into<String>) -> Self {
        self.extends_type = Some(extends_type.into());
        self
    }

    pub fn constructor(mut self) -> Self {
        self.constructor = true;
        self
    }

    pub fn protected(mut self) -> Self {
        self.access = Access::Protected;
        self
    }

    pub fn private(mut self) -> Self {
        self.access = Access::Private;
        self
    }

    pub fn write_to(&self, out: &mut IndentedLineBuffer) {
        out.line("/**");
        if let Some(description) = &self.description {
            out.line(&format!(" * {}", description));
        }
        for param in &self.parameters {
            out.line(&format!(
                " * @param {{{}}} {} {}",
                param.type_name, param.name, param.description
            ));
        }
        if let Some(type_name) = &self.type_name {
            out.line(&format!(" * @type {{{}}}", type_name));
        }
        if let Some(enum_type) = &self.enum_type {
            out.line(&format!(" * @enum {{{}}}", enum_type));
        }
        if let Some(return_type) = &self.return_type {
            out.line(&format!(" * @return {{{}}}", return_type));
        }
        if self.constructor {
            out.line(" * @constructor");
        }
        match self.access {
            Access::Private => {
                out.line(" * @private");
            }
            Access::Protected => {
                out.line(" * @protected");
            }
            Access::Public => {}
        }
        if let Some(extends_type) = &self.extends_type {
            out.line(&format!(" * @extends {{{}}}", extends_type));
        }
        out.line(" */");
    }
}
