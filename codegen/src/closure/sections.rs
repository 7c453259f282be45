use crate::builder::SectionKey;

/// Top-level sections of one generated file.
#[derive(Debug, Clone, Copy)]
pub(crate) enum GlobalSection {
    Docs = 0,
    Provides = 1,
    Requires = 2,
    Content = 3,
}

/// Sections of one generated message.
#[derive(Debug, Clone, Copy)]
pub(crate) enum MessageSection {
    Constructor = 0,
    Methods = 1,
}

/// Sections of one generated function or method.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FunctionSection {
    Docs = 0,
    Header = 1,
    Body = 2,
    Closer = 3,
}

/// Sections of one generated field or enum body.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldSection {
    Docs = 0,
    Body = 1,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ConstructorBodySection {
    Fields = 0,
}

impl SectionKey for GlobalSection {
    fn index(self) -> u32 {
        self as u32
    }
}

impl SectionKey for MessageSection {
    fn index(self) -> u32 {
        self as u32
    }
}

impl SectionKey for FunctionSection {
    fn index(self) -> u32 {
        self as u32
    }
}

impl SectionKey for FieldSection {
    fn index(self) -> u32 {
        self as u32
    }
}

impl SectionKey for ConstructorBodySection {
    fn index(self) -> u32 {
        self as u32
    }
}
