use serde::Serialize;

/// One compiled schema file: the unit the generator emits one output file for.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FileDescriptor {
    /// The schema file path as recorded by the schema compiler, e.g. `proto/geo_point.proto`.
    pub name: String,
    pub package: Option<String>,
    /// Closure namespace override declared through the file-option extension.
    pub namespace: Option<String>,
    pub enums: Vec<EnumDescriptor>,
    pub messages: Vec<MessageDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MessageDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub enums: Vec<EnumDescriptor>,
    pub messages: Vec<MessageDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Unique within the owning message; never renumbered by the generator.
    pub number: u32,
    pub label: Label,
    pub kind: FieldKind,
    /// Schema-qualified path for enum/message references, e.g. `.a.b.Outer.Inner`.
    pub type_name: Option<String>,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EnumDescriptor {
    pub name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    Optional,
    Required,
    Repeated,
}

impl Label {
    /// Maps the wire value of `FieldDescriptorProto.Label`.
    pub fn from_proto(value: u64) -> Option<Label> {
        match value {
            1 => Some(Label::Optional),
            2 => Some(Label::Required),
            3 => Some(Label::Repeated),
            _ => None,
        }
    }
}

/// The scalar kind of a field, mirroring `FieldDescriptorProto.Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl FieldKind {
    /// Maps the wire value of `FieldDescriptorProto.Type`.
    pub fn from_proto(value: u64) -> Option<FieldKind> {
        match value {
            1 => Some(FieldKind::Double),
            2 => Some(FieldKind::Float),
            3 => Some(FieldKind::Int64),
            4 => Some(FieldKind::Uint64),
            5 => Some(FieldKind::Int32),
            6 => Some(FieldKind::Fixed64),
            7 => Some(FieldKind::Fixed32),
            8 => Some(FieldKind::Bool),
            9 => Some(FieldKind::String),
            10 => Some(FieldKind::Group),
            11 => Some(FieldKind::Message),
            12 => Some(FieldKind::Bytes),
            13 => Some(FieldKind::Uint32),
            14 => Some(FieldKind::Enum),
            15 => Some(FieldKind::Sfixed32),
            16 => Some(FieldKind::Sfixed64),
            17 => Some(FieldKind::Sint32),
            18 => Some(FieldKind::Sint64),
            _ => None,
        }
    }

    /// The schema-level spelling of the kind, used in generated doc comments.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Double => "double",
            FieldKind::Float => "float",
            FieldKind::Int64 => "int64",
            FieldKind::Uint64 => "uint64",
            FieldKind::Int32 => "int32",
            FieldKind::Fixed64 => "fixed64",
            FieldKind::Fixed32 => "fixed32",
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Group => "group",
            FieldKind::Message => "message",
            FieldKind::Bytes => "bytes",
            FieldKind::Uint32 => "uint32",
            FieldKind::Enum => "enum",
            FieldKind::Sfixed32 => "sfixed32",
            FieldKind::Sfixed64 => "sfixed64",
            FieldKind::Sint32 => "sint32",
            FieldKind::Sint64 => "sint64",
        }
    }
}
