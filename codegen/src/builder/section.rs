use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::builder::doc::DocBuilder;
use crate::builder::func::FunctionBuilder;
use crate::builder::line::IndentedLineBuffer;

/// Anything usable as a section key. Generators define small enums whose
/// discriminants give the render order.
pub trait SectionKey: Copy {
    fn index(self) -> u32;
}

impl SectionKey for u32 {
    fn index(self) -> u32 {
        self
    }
}

/// One renderable unit appended under a section key.
pub enum Fragment {
    /// A literal written as-is, without a trailing newline.
    Literal(String),
    Lines(IndentedLineBuffer),
    Doc(DocBuilder),
    Func(FunctionBuilder),
    Child(SectionBuffer),
}

impl Fragment {
    fn write_to(&self, out: &mut IndentedLineBuffer) {
        match self {
            Fragment::Literal(text) => {
                out.write(text);
            }
            Fragment::Lines(lines) => lines.write_to(out),
            Fragment::Doc(doc) => doc.write_to(out),
            Fragment::Func(func) => func.write_to(out),
            Fragment::Child(child) => child.write_to(out),
        }
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Fragment {
        Fragment::Literal(text)
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Fragment {
        Fragment::Literal(text.to_string())
    }
}

impl From<IndentedLineBuffer> for Fragment {
    fn from(lines: IndentedLineBuffer) -> Fragment {
        Fragment::Lines(lines)
    }
}

impl From<DocBuilder> for Fragment {
    fn from(doc: DocBuilder) -> Fragment {
        Fragment::Doc(doc)
    }
}

impl From<FunctionBuilder> for Fragment {
    fn from(func: FunctionBuilder) -> Fragment {
        Fragment::Func(func)
    }
}

impl From<SectionBuffer> for Fragment {
    fn from(child: SectionBuffer) -> Fragment {
        Fragment::Child(child)
    }
}

struct SectionInner {
    contents: BTreeMap<u32, Vec<Fragment>>,
    indented: bool,
}

/// An order-independent, section-keyed text assembler.
///
/// Sections render in ascending key order; fragments within one section
/// render in append order. The buffer is a cheap clone-able handle so a
/// recursive walk can keep writing into an ancestor's earlier sections
/// while deep inside generating a descendant. The generation core is
/// single-threaded, so the handle is `Rc`-based.
#[derive(Clone)]
pub struct SectionBuffer {
    inner: Rc<RefCell<SectionInner>>,
}

impl SectionBuffer {
    pub fn new() -> SectionBuffer {
        SectionBuffer::with_indent(false)
    }

    fn with_indent(indented: bool) -> SectionBuffer {
        SectionBuffer {
            inner: Rc::new(RefCell::new(SectionInner {
                contents: BTreeMap::new(),
                indented,
            })),
        }
    }

    /// Append a fragment under a key, creating the key on first use.
    pub fn section<K: SectionKey>(&self, key: K, fragment: impl Into<Fragment>) -> &Self {
        self.inner
            .borrow_mut()
            .contents
            .entry(key.index())
            .or_default()
            .push(fragment.into());
        self
    }

    /// Append a literal string fragment under a key.
    pub fn string_section<K: SectionKey>(&self, key: K, text: impl Into<String>) -> &Self {
        self.section(key, Fragment::Literal(text.into()))
    }

    /// Create and register a fresh nested buffer under `key`, returning a
    /// handle that stays writable after registration.
    pub fn child_section<K: SectionKey>(&self, key: K) -> SectionBuffer {
        let child = SectionBuffer::new();
        self.section(key, child.clone());
        child
    }

    /// Like `child_section`, but the child indents its whole content by one
    /// level when it renders.
    pub fn indented_child_section<K: SectionKey>(&self, key: K) -> SectionBuffer {
        let child = SectionBuffer::with_indent(true);
        self.section(key, child.clone());
        child
    }

    pub fn clear_section<K: SectionKey>(&self, key: K) {
        self.inner.borrow_mut().contents.remove(&key.index());
    }

    /// Discard every previously written fragment. Used to retract
    /// speculative output.
    pub fn clear_all(&self) {
        self.inner.borrow_mut().contents.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().contents.is_empty()
    }

    pub fn write_to(&self, out: &mut IndentedLineBuffer) {
        let inner = self.inner.borrow();
        if inner.indented {
            out.indent();
        }
        for fragments in inner.contents.values() {
            for fragment in fragments {
                fragment.write_to(out);
            }
        }
        if inner.indented {
            out.dedent();
        }
    }

    /// Render the whole buffer to a string. Rendering is deterministic and
    /// repeatable; nothing is consumed.
    pub fn render(&self) -> String {
        let mut buffer = IndentedLineBuffer::new();
        self.write_to(&mut buffer);
        buffer.render()
    }
}

impl Default for SectionBuffer {
    fn default() -> Self {
        SectionBuffer::new()
    }
}
