//! The Closure javascript generator: turns descriptor trees into
//! `goog.provide`d message constructors, validators, and decode dispatchers.

mod sections;

use std::path::PathBuf;

use lazy_static::lazy_static;
use regex::Regex;

use crate::builder::{DocBuilder, IndentedLineBuffer, SectionBuffer};
use crate::error::GenError;
use crate::naming::{file_namespace, TypeNameMap};
use crate::util::{quote, to_camel_case};
use crate::wire::{natural_wire_type, tag, WireType};
use protoclosure_descriptor::{
    EnumDescriptor, FieldDescriptor, FieldKind, FileDescriptor, Label, MessageDescriptor,
};
use sections::{ConstructorBodySection, FieldSection, FunctionSection, GlobalSection, MessageSection};

/// True unless the field's scalar kind is one of the 64-bit integer kinds or
/// the group kind. Unsupported fields are skipped from every emitted
/// artifact.
pub fn field_supported(kind: FieldKind) -> bool {
    !matches!(
        kind,
        FieldKind::Int64
            | FieldKind::Uint64
            | FieldKind::Sint64
            | FieldKind::Fixed64
            | FieldKind::Sfixed64
            | FieldKind::Group
    )
}

lazy_static! {
    static ref PROTO_SUFFIX: Regex = Regex::new(r"\.proto$").unwrap();
}

/// The relative output path for one schema file: basename stripped of its
/// `.proto` suffix, underscores removed, lowercased, `.js` appended, under
/// one directory component per namespace segment.
pub fn output_path(file: &FileDescriptor) -> PathBuf {
    let base = PROTO_SUFFIX.replace(&file.name, "");
    let base = match base.rfind('/') {
        Some(index) => &base[index + 1..],
        None => base.as_ref(),
    };
    let file_name = format!("{}.js", base.replace('_', "").to_lowercase());

    match file_namespace(file) {
        Some(namespace) => {
            let mut path: PathBuf = namespace.split('.').collect();
            path.push(file_name);
            path
        }
        None => PathBuf::from(file_name),
    }
}

/// Generates closure compatible javascript for one compilation unit.
pub struct ClosureGenerator<'a> {
    names: TypeNameMap<'a>,
    debug: bool,
}

impl<'a> ClosureGenerator<'a> {
    /// Build a generator for a compilation unit. The type name map is built
    /// once here, before any file is processed.
    pub fn new(files: &'a [FileDescriptor]) -> ClosureGenerator<'a> {
        ClosureGenerator {
            names: TypeNameMap::build(files),
            debug: false,
        }
    }

    /// Report skipped fields and other generation details to stderr.
    pub fn enable_debug(&mut self) {
        self.debug = true;
    }

    /// Process one schema file, writing its generated code into `out`.
    pub fn process_file(&self, file: &FileDescriptor, out: &SectionBuffer) -> Result<(), GenError> {
        let mut docs = IndentedLineBuffer::new();
        docs.line("// DO NOT EDIT!! This file contains auto-generated code")
            .newline();
        out.section(GlobalSection::Docs, docs);

        let mut requires = IndentedLineBuffer::new();
        requires
            .line("goog.require('protolib.Buffer');")
            .line("goog.require('protolib.Message');")
            .newline();
        out.section(GlobalSection::Requires, requires);

        // blank line before content
        let mut lead_in = IndentedLineBuffer::new();
        lead_in.newline();
        out.section(GlobalSection::Content, lead_in);

        self.process_enums(&file.enums, out)?;
        self.process_messages(&file.messages, out)
    }

    fn process_enums(
        &self,
        decls: &[EnumDescriptor],
        global: &SectionBuffer,
    ) -> Result<(), GenError> {
        for decl in decls {
            let buffer = global.child_section(GlobalSection::Content);
            self.process_enum(decl, global, &buffer)?;
        }
        Ok(())
    }

    fn process_messages(
        &self,
        decls: &[MessageDescriptor],
        global: &SectionBuffer,
    ) -> Result<(), GenError> {
        for decl in decls {
            let buffer = global.child_section(GlobalSection::Content);
            self.process_message(decl, global, &buffer)?;
        }
        Ok(())
    }

    fn process_enum(
        &self,
        decl: &EnumDescriptor,
        global: &SectionBuffer,
        buffer: &SectionBuffer,
    ) -> Result<(), GenError> {
        let js_name = self.names.for_enum(decl)?;

        let mut provides = IndentedLineBuffer::new();
        provides.line(&format!("goog.provide('{}');", js_name));
        global.section(GlobalSection::Provides, provides);

        buffer.section(FieldSection::Docs, DocBuilder::new().enum_type("number"));

        let mut body = IndentedLineBuffer::new();
        body.write(&format!("{} = {{", js_name)).indent();

        let mut first = true;
        for value in &decl.values {
            if first {
                first = false;
                body.newline();
            } else {
                body.line(",");
            }
            body.write(&format!("{}: {}", value.name, value.number));
        }

        body.newline().dedent().line("};").newline();
        buffer.section(FieldSection::Body, body);

        Ok(())
    }

    fn process_message(
        &self,
        descriptor: &MessageDescriptor,
        global: &SectionBuffer,
        buffer: &SectionBuffer,
    ) -> Result<(), GenError> {
        let js_name = self.names.for_message(descriptor)?;

        let mut provides = IndentedLineBuffer::new();
        provides.line(&format!("goog.provide('{}');", js_name));
        global.section(GlobalSection::Provides, provides);

        self.write_constructor(
            descriptor,
            js_name,
            &buffer.child_section(MessageSection::Constructor),
        )?;
        self.write_validator(
            descriptor,
            js_name,
            &buffer.child_section(MessageSection::Methods),
        )?;
        self.write_decoder(
            descriptor,
            js_name,
            &buffer.child_section(MessageSection::Methods),
        )?;

        self.process_enums(&descriptor.enums, global)?;
        self.process_messages(&descriptor.messages, global)
    }

    fn write_constructor(
        &self,
        message: &MessageDescriptor,
        js_name: &str,
        buffer: &SectionBuffer,
    ) -> Result<(), GenError> {
        buffer.section(
            FunctionSection::Docs,
            DocBuilder::new()
                .description(format!("Constructs an un-initialized {}", js_name))
                .constructor()
                .extends_type("protolib.Message"),
        );

        let mut header = IndentedLineBuffer::new();
        header.line(&format!("{} = function() {{", js_name));
        buffer.section(FunctionSection::Header, header);

        let body = buffer.child_section(FunctionSection::Body);

        for field in &message.fields {
            if !field_supported(field.kind) {
                self.note_skipped_field(field, js_name);
                continue;
            }

            let field_section = body.indented_child_section(ConstructorBodySection::Fields);
            let field_name = to_camel_case(&field.name, false);
            let type_name = self.javascript_type(field)?;
            let is_repeated = field.label == Label::Repeated;

            field_section.section(
                FieldSection::Docs,
                DocBuilder::new()
                    .description(format!(
                        "number = {} type = {}",
                        field.number,
                        field.kind.name()
                    ))
                    .value_type(format!(
                        "{}{}",
                        type_name,
                        if is_repeated { "[]" } else { "" }
                    )),
            );

            let mut assignment = IndentedLineBuffer::new();
            if is_repeated {
                assignment.line(&format!("this.{} = [];", field_name));
            } else {
                assignment.line(&format!(
                    "this.{} = {};",
                    field_name,
                    default_literal(field)
                ));
            }
            assignment.newline();
            field_section.section(FieldSection::Body, assignment);
        }

        let mut closer = IndentedLineBuffer::new();
        closer
            .line("};")
            .line(&format!("goog.inherits({}, protolib.Message);", js_name))
            .newline();
        buffer.section(FunctionSection::Closer, closer);

        Ok(())
    }

    /// The required-field validator. When no supported field is required,
    /// the override is retracted entirely and a one-line comment notes that
    /// the default validator applies; the override's presence is itself a
    /// signal that required fields exist.
    fn write_validator(
        &self,
        message: &MessageDescriptor,
        js_name: &str,
        buffer: &SectionBuffer,
    ) -> Result<(), GenError> {
        buffer.section(
            FunctionSection::Docs,
            DocBuilder::new()
                .description("Validates that all required fields have been set")
                .return_type("boolean"),
        );

        let mut header = IndentedLineBuffer::new();
        header.line(&format!("{}.prototype.isInitialized = function(){{", js_name));
        buffer.section(FunctionSection::Header, header);

        let mut body = IndentedLineBuffer::new();
        body.indent().write("return ");

        let mut has_required_field = false;

        for field in &message.fields {
            if !field_supported(field.kind) || field.label != Label::Required {
                continue;
            }
            if has_required_field {
                body.line(" &&");
            } else {
                has_required_field = true;
                body.indent().indent();
            }
            body.write(&format!("this.{} !== null", to_camel_case(&field.name, false)));
        }

        if has_required_field {
            body.line(";");
            buffer.section(FunctionSection::Body, body);

            let mut closer = IndentedLineBuffer::new();
            closer.line("};").newline();
            buffer.section(FunctionSection::Closer, closer);
        } else {
            buffer.clear_all();
            let mut note = IndentedLineBuffer::new();
            note.line(&format!(
                "// No required fields for {}, using default validator implementation.",
                js_name
            ))
            .newline();
            buffer.section(FunctionSection::Docs, note);
        }

        Ok(())
    }

    fn write_decoder(
        &self,
        message: &MessageDescriptor,
        js_name: &str,
        buffer: &SectionBuffer,
    ) -> Result<(), GenError> {
        buffer.section(
            FunctionSection::Docs,
            DocBuilder::new()
                .description("A method that gets called by the decode method to decode each field")
                .param("tag", "number", "The tag value for the field to decode")
                .param("buffer", "protolib.Buffer", "The buffer to decode from")
                .protected(),
        );

        let mut header = IndentedLineBuffer::new();
        header.line(&format!(
            "{}.prototype.decodeFieldCallback = function(tag, buffer){{",
            js_name
        ));
        buffer.section(FunctionSection::Header, header);

        let mut body = IndentedLineBuffer::new();
        body.indent().line("switch (tag) {").indent();

        for field in &message.fields {
            if !field_supported(field.kind) {
                self.note_skipped_field(field, js_name);
                continue;
            }

            let field_name = to_camel_case(&field.name, false);
            let unpacked_tag = tag(field, false)?;
            let wire_type = natural_wire_type(field.kind)?;

            body.line(&format!(
                "// wireType = {}, number = {}",
                wire_type.name(),
                field.number
            ));
            body.line(&format!("case {}:", unpacked_tag));
            body.indent();
            let expression = self.decode_expression(field)?;
            if field.label == Label::Repeated {
                body.line(&format!("this.{}.push({}); break;", field_name, expression));
            } else {
                body.line(&format!("this.{} = {}; break;", field_name, expression));
            }
            body.dedent();

            // Alternate case for the packed-array encoding of a repeated
            // scalar whose natural wire type is not already
            // length-delimited. The returned tag tells the runtime which
            // element tag the packed run repeats.
            if field.label == Label::Repeated && wire_type != WireType::LengthDelimited {
                body.line(&format!("// wireType = LENGTH_DELIMITED, number = {}", field.number));
                body.line(&format!("case {}:", tag(field, true)?));
                body.indent();
                body.line(&format!("return {};", unpacked_tag));
                body.dedent();
            }
        }

        body.dedent().line("}");
        buffer.section(FunctionSection::Body, body);

        let mut closer = IndentedLineBuffer::new();
        closer.line("};").newline();
        buffer.section(FunctionSection::Closer, closer);

        Ok(())
    }

    /// The javascript type of a field, for doc comments.
    fn javascript_type(&self, field: &FieldDescriptor) -> Result<String, GenError> {
        match field.kind {
            FieldKind::Bool => Ok("boolean".to_string()),
            FieldKind::Double
            | FieldKind::Float
            | FieldKind::Fixed32
            | FieldKind::Sfixed32
            | FieldKind::Int32
            | FieldKind::Uint32
            | FieldKind::Sint32 => Ok("number".to_string()),
            FieldKind::Bytes => Ok("ArrayBuffer".to_string()),
            FieldKind::String => Ok("string".to_string()),
            FieldKind::Enum | FieldKind::Message => {
                Ok(self.names.for_path(self.type_reference(field)?)?.to_string())
            }
            other => Err(GenError::Internal(format!(
                "Unsupported type: {}",
                other.name()
            ))),
        }
    }

    /// The decode operation against a positioned buffer, per scalar kind.
    fn decode_expression(&self, field: &FieldDescriptor) -> Result<String, GenError> {
        match field.kind {
            FieldKind::Bool => Ok("!!buffer.readVarint32()".to_string()),
            FieldKind::Enum => Ok("buffer.readVarint32()".to_string()),
            FieldKind::Int32 => Ok("buffer.readVarint32()".to_string()),
            FieldKind::Uint32 => Ok("buffer.readVarint32() >>> 0".to_string()),
            FieldKind::Sint32 => Ok("buffer.readVarint32ZigZag() | 0".to_string()),
            FieldKind::Bytes => Ok("buffer.readVBytes()".to_string()),
            FieldKind::String => Ok("buffer.readVString()".to_string()),
            FieldKind::Message => Ok(format!(
                "new {}().decode(buffer)",
                self.names.for_path(self.type_reference(field)?)?
            )),
            FieldKind::Double => Ok("buffer.readFloat64()".to_string()),
            FieldKind::Float => Ok("buffer.readFloat32()".to_string()),
            FieldKind::Fixed32 => Ok("buffer.readUint32()".to_string()),
            FieldKind::Sfixed32 => Ok("buffer.readInt32()".to_string()),
            other => Err(GenError::Internal(format!(
                "Unsupported type: {}",
                other.name()
            ))),
        }
    }

    fn type_reference<'f>(&self, field: &'f FieldDescriptor) -> Result<&'f str, GenError> {
        field.type_name.as_deref().ok_or_else(|| {
            GenError::Internal(format!("Field {:?} has no type reference", field.name))
        })
    }

    fn note_skipped_field(&self, field: &FieldDescriptor, js_name: &str) {
        if self.debug {
            eprintln!(
                "DEBUG: skipping unsupported field {} ({}) of {}",
                field.name,
                field.kind.name(),
                js_name
            );
        }
    }
}

/// The constructor initializer for a non-repeated field: the declared
/// default literal if present, else null. String defaults are quoted as
/// javascript string literals.
fn default_literal(field: &FieldDescriptor) -> String {
    match field.default_value.as_deref() {
        None | Some("") => "null".to_string(),
        Some(value) if field.kind == FieldKind::String => quote(value),
        Some(value) => value.to_string(),
    }
}
