use crate::error::DescriptorError;
use crate::reader::WireReader;
use crate::types::{
    EnumDescriptor, EnumValue, FieldDescriptor, FieldKind, FileDescriptor, Label,
    MessageDescriptor,
};

// Field numbers from descriptor.proto.
const FILE_SET_FILE: u32 = 1;

const FILE_NAME: u32 = 1;
const FILE_PACKAGE: u32 = 2;
const FILE_MESSAGE_TYPE: u32 = 4;
const FILE_ENUM_TYPE: u32 = 5;
const FILE_OPTIONS: u32 = 8;

const MESSAGE_NAME: u32 = 1;
const MESSAGE_FIELD: u32 = 2;
const MESSAGE_NESTED_TYPE: u32 = 3;
const MESSAGE_ENUM_TYPE: u32 = 4;

const FIELD_NAME: u32 = 1;
const FIELD_NUMBER: u32 = 3;
const FIELD_LABEL: u32 = 4;
const FIELD_TYPE: u32 = 5;
const FIELD_TYPE_NAME: u32 = 6;
const FIELD_DEFAULT_VALUE: u32 = 7;

const ENUM_NAME: u32 = 1;
const ENUM_VALUE: u32 = 2;

const ENUM_VALUE_NAME: u32 = 1;
const ENUM_VALUE_NUMBER: u32 = 2;

/// The FileOptions extension carrying the Closure namespace override.
const OPTIONS_CLOSURE_EXT: u32 = 50002;
const CLOSURE_EXT_NAMESPACE: u32 = 1;

const WIRE_LEN_DELIMITED: u32 = 2;

/// The largest field number protobuf allows, 2^29 - 1. Numbers above it
/// would also overflow the 32-bit tag computation downstream.
const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

/// Decode a binary `FileDescriptorSet` (the output of
/// `protoc --descriptor_set_out`) into the descriptor tree.
/// Returns `Err(DescriptorError)` on any read failure or invalid data.
pub fn decode_descriptor_set(data: &[u8]) -> Result<Vec<FileDescriptor>, DescriptorError> {
    let mut reader = WireReader::new(data);
    let mut files = Vec::new();

    while !reader.at_end() {
        let (number, wire_type) = reader.read_tag()?;
        if number == FILE_SET_FILE && wire_type == WIRE_LEN_DELIMITED {
            files.push(decode_file(reader.read_len_prefixed()?)?);
        } else {
            reader.skip(wire_type)?;
        }
    }

    Ok(files)
}

fn decode_file(data: &[u8]) -> Result<FileDescriptor, DescriptorError> {
    let mut reader = WireReader::new(data);
    let mut file = FileDescriptor::default();

    while !reader.at_end() {
        let (number, wire_type) = reader.read_tag()?;
        match (number, wire_type) {
            (FILE_NAME, WIRE_LEN_DELIMITED) => file.name = reader.read_string()?,
            (FILE_PACKAGE, WIRE_LEN_DELIMITED) => file.package = Some(reader.read_string()?),
            (FILE_MESSAGE_TYPE, WIRE_LEN_DELIMITED) => {
                file.messages.push(decode_message(reader.read_len_prefixed()?)?);
            }
            (FILE_ENUM_TYPE, WIRE_LEN_DELIMITED) => {
                file.enums.push(decode_enum(reader.read_len_prefixed()?)?);
            }
            (FILE_OPTIONS, WIRE_LEN_DELIMITED) => {
                file.namespace = decode_file_options(reader.read_len_prefixed()?)?;
            }
            _ => reader.skip(wire_type)?,
        }
    }

    Ok(file)
}

fn decode_message(data: &[u8]) -> Result<MessageDescriptor, DescriptorError> {
    let mut reader = WireReader::new(data);
    let mut message = MessageDescriptor::default();

    while !reader.at_end() {
        let (number, wire_type) = reader.read_tag()?;
        match (number, wire_type) {
            (MESSAGE_NAME, WIRE_LEN_DELIMITED) => message.name = reader.read_string()?,
            (MESSAGE_FIELD, WIRE_LEN_DELIMITED) => {
                message.fields.push(decode_field(reader.read_len_prefixed()?)?);
            }
            (MESSAGE_NESTED_TYPE, WIRE_LEN_DELIMITED) => {
                message.messages.push(decode_message(reader.read_len_prefixed()?)?);
            }
            (MESSAGE_ENUM_TYPE, WIRE_LEN_DELIMITED) => {
                message.enums.push(decode_enum(reader.read_len_prefixed()?)?);
            }
            _ => reader.skip(wire_type)?,
        }
    }

    Ok(message)
}

fn decode_field(data: &[u8]) -> Result<FieldDescriptor, DescriptorError> {
    let mut reader = WireReader::new(data);

    let mut name = String::new();
    let mut field_number: u32 = 0;
    let mut label = Label::Optional;
    let mut kind = None;
    let mut type_name = None;
    let mut default_value = None;

    while !reader.at_end() {
        let (number, wire_type) = reader.read_tag()?;
        match (number, wire_type) {
            (FIELD_NAME, WIRE_LEN_DELIMITED) => name = reader.read_string()?,
            (FIELD_NUMBER, 0) => {
                let value = reader.read_varint()?;
                if value == 0 || value > MAX_FIELD_NUMBER {
                    return Err(DescriptorError::Decode(format!(
                        "Invalid field number: {}",
                        value
                    )));
                }
                field_number = value as u32;
            }
            (FIELD_LABEL, 0) => {
                let value = reader.read_varint()?;
                label = Label::from_proto(value).ok_or_else(|| {
                    DescriptorError::Decode(format!("Invalid field label value: {}", value))
                })?;
            }
            (FIELD_TYPE, 0) => {
                let value = reader.read_varint()?;
                kind = Some(FieldKind::from_proto(value).ok_or_else(|| {
                    DescriptorError::Decode(format!("Invalid field type value: {}", value))
                })?);
            }
            (FIELD_TYPE_NAME, WIRE_LEN_DELIMITED) => type_name = Some(reader.read_string()?),
            (FIELD_DEFAULT_VALUE, WIRE_LEN_DELIMITED) => {
                default_value = Some(reader.read_string()?);
            }
            _ => reader.skip(wire_type)?,
        }
    }

    let kind = kind.ok_or_else(|| {
        DescriptorError::Decode(format!("Field {:?} is missing its type", name))
    })?;

    Ok(FieldDescriptor {
        name,
        number: field_number,
        label,
        kind,
        type_name,
        default_value,
    })
}

fn decode_enum(data: &[u8]) -> Result<EnumDescriptor, DescriptorError> {
    let mut reader = WireReader::new(data);
    let mut decl = EnumDescriptor::default();

    while !reader.at_end() {
        let (number, wire_type) = reader.read_tag()?;
        match (number, wire_type) {
            (ENUM_NAME, WIRE_LEN_DELIMITED) => decl.name = reader.read_string()?,
            (ENUM_VALUE, WIRE_LEN_DELIMITED) => {
                decl.values.push(decode_enum_value(reader.read_len_prefixed()?)?);
            }
            _ => reader.skip(wire_type)?,
        }
    }

    Ok(decl)
}

fn decode_enum_value(data: &[u8]) -> Result<EnumValue, DescriptorError> {
    let mut reader = WireReader::new(data);
    let mut name = String::new();
    let mut value: i32 = 0;

    while !reader.at_end() {
        let (number, wire_type) = reader.read_tag()?;
        match (number, wire_type) {
            (ENUM_VALUE_NAME, WIRE_LEN_DELIMITED) => name = reader.read_string()?,
            (ENUM_VALUE_NUMBER, 0) => value = reader.read_varint()? as i64 as i32,
            _ => reader.skip(wire_type)?,
        }
    }

    Ok(EnumValue { name, number: value })
}

/// Reads `FileOptions`, returning the Closure namespace override if declared.
fn decode_file_options(data: &[u8]) -> Result<Option<String>, DescriptorError> {
    let mut reader = WireReader::new(data);
    let mut namespace = None;

    while !reader.at_end() {
        let (number, wire_type) = reader.read_tag()?;
        if number == OPTIONS_CLOSURE_EXT && wire_type == WIRE_LEN_DELIMITED {
            let mut ext = WireReader::new(reader.read_len_prefixed()?);
            while !ext.at_end() {
                let (ext_number, ext_wire_type) = ext.read_tag()?;
                if ext_number == CLOSURE_EXT_NAMESPACE && ext_wire_type == WIRE_LEN_DELIMITED {
                    namespace = Some(ext.read_string()?);
                } else {
                    ext.skip(ext_wire_type)?;
                }
            }
        } else {
            reader.skip(wire_type)?;
        }
    }

    Ok(namespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Writer {
        buffer: Vec<u8>,
    }

    impl Writer {
        fn new() -> Self {
            Writer { buffer: Vec::new() }
        }

        fn write_varint(&mut self, mut value: u64) {
            loop {
                let mut byte = (value & 0x7F) as u8;
                value >>= 7;
                if value != 0 {
                    byte |= 0x80;
                    self.buffer.push(byte);
                } else {
                    self.buffer.push(byte);
                    break;
                }
            }
        }

        fn write_tag(&mut self, number: u32, wire_type: u32) {
            self.write_varint(((number << 3) | wire_type) as u64);
        }

        fn write_string(&mut self, number: u32, value: &str) {
            self.write_tag(number, 2);
            self.write_varint(value.len() as u64);
            self.buffer.extend_from_slice(value.as_bytes());
        }

        fn write_message(&mut self, number: u32, inner: Writer) {
            self.write_tag(number, 2);
            self.write_varint(inner.buffer.len() as u64);
            self.buffer.extend_from_slice(&inner.buffer);
        }

        fn write_uint(&mut self, number: u32, value: u64) {
            self.write_tag(number, 0);
            self.write_varint(value);
        }
    }

    fn encode_example_set() -> Vec<u8> {
        let mut field = Writer::new();
        field.write_string(FIELD_NAME, "client_id");
        field.write_uint(FIELD_NUMBER, 1);
        field.write_uint(FIELD_LABEL, 2); // required
        field.write_uint(FIELD_TYPE, 5); // int32

        let mut color = Writer::new();
        color.write_string(ENUM_NAME, "Color");
        let mut red = Writer::new();
        red.write_string(ENUM_VALUE_NAME, "RED");
        red.write_uint(ENUM_VALUE_NUMBER, 0);
        color.write_message(ENUM_VALUE, red);

        let mut message = Writer::new();
        message.write_string(MESSAGE_NAME, "Example");
        message.write_message(MESSAGE_FIELD, field);
        message.write_message(MESSAGE_ENUM_TYPE, color);

        let mut ext = Writer::new();
        ext.write_string(CLOSURE_EXT_NAMESPACE, "a.b");
        let mut options = Writer::new();
        options.write_message(OPTIONS_CLOSURE_EXT, ext);

        let mut file = Writer::new();
        file.write_string(FILE_NAME, "proto/example_file.proto");
        file.write_string(FILE_PACKAGE, "example");
        file.write_message(FILE_MESSAGE_TYPE, message);
        file.write_message(FILE_OPTIONS, options);

        let mut set = Writer::new();
        set.write_message(FILE_SET_FILE, file);
        set.buffer
    }

    #[test]
    fn decodes_a_full_descriptor_set() {
        let files = decode_descriptor_set(&encode_example_set()).expect("decode failed");
        assert_eq!(files.len(), 1);

        let file = &files[0];
        assert_eq!(file.name, "proto/example_file.proto");
        assert_eq!(file.package.as_deref(), Some("example"));
        assert_eq!(file.namespace.as_deref(), Some("a.b"));
        assert_eq!(file.messages.len(), 1);

        let message = &file.messages[0];
        assert_eq!(message.name, "Example");
        assert_eq!(message.fields.len(), 1);
        assert_eq!(message.enums.len(), 1);

        let field = &message.fields[0];
        assert_eq!(field.name, "client_id");
        assert_eq!(field.number, 1);
        assert_eq!(field.label, Label::Required);
        assert_eq!(field.kind, FieldKind::Int32);

        let color = &message.enums[0];
        assert_eq!(color.name, "Color");
        assert_eq!(color.values, vec![EnumValue { name: "RED".into(), number: 0 }]);
    }

    #[test]
    fn skips_unknown_fields() {
        let mut file = Writer::new();
        file.write_string(FILE_NAME, "simple.proto");
        // syntax = 12, unknown to this decoder
        file.write_string(12, "proto2");

        let mut set = Writer::new();
        set.write_message(FILE_SET_FILE, file);

        let files = decode_descriptor_set(&set.buffer).expect("decode failed");
        assert_eq!(files[0].name, "simple.proto");
    }

    #[test]
    fn rejects_invalid_field_type() {
        let mut field = Writer::new();
        field.write_string(FIELD_NAME, "broken");
        field.write_uint(FIELD_TYPE, 99);

        let mut message = Writer::new();
        message.write_string(MESSAGE_NAME, "Bad");
        message.write_message(MESSAGE_FIELD, field);

        let mut file = Writer::new();
        file.write_message(FILE_MESSAGE_TYPE, message);

        let mut set = Writer::new();
        set.write_message(FILE_SET_FILE, file);

        assert!(matches!(
            decode_descriptor_set(&set.buffer),
            Err(DescriptorError::Decode(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_field_numbers() {
        let mut field = Writer::new();
        field.write_string(FIELD_NAME, "huge");
        field.write_uint(FIELD_NUMBER, MAX_FIELD_NUMBER + 1);
        field.write_uint(FIELD_TYPE, 5); // int32

        let mut message = Writer::new();
        message.write_string(MESSAGE_NAME, "Bad");
        message.write_message(MESSAGE_FIELD, field);

        let mut file = Writer::new();
        file.write_message(FILE_MESSAGE_TYPE, message);

        let mut set = Writer::new();
        set.write_message(FILE_SET_FILE, file);

        assert!(matches!(
            decode_descriptor_set(&set.buffer),
            Err(DescriptorError::Decode(_))
        ));
    }

    #[test]
    fn accepts_the_largest_field_number() {
        let mut field = Writer::new();
        field.write_string(FIELD_NAME, "edge");
        field.write_uint(FIELD_NUMBER, MAX_FIELD_NUMBER);
        field.write_uint(FIELD_TYPE, 5); // int32

        let mut message = Writer::new();
        message.write_string(MESSAGE_NAME, "Edge");
        message.write_message(MESSAGE_FIELD, field);

        let mut file = Writer::new();
        file.write_message(FILE_MESSAGE_TYPE, message);

        let mut set = Writer::new();
        set.write_message(FILE_SET_FILE, file);

        let files = decode_descriptor_set(&set.buffer).expect("decode failed");
        assert_eq!(files[0].messages[0].fields[0].number, (1 << 29) - 1);
    }

    #[test]
    fn negative_enum_values_round_trip() {
        let mut value = Writer::new();
        value.write_string(ENUM_VALUE_NAME, "UNKNOWN");
        value.write_uint(ENUM_VALUE_NUMBER, -1i64 as u64);

        let mut decl = Writer::new();
        decl.write_string(ENUM_NAME, "Status");
        decl.write_message(ENUM_VALUE, value);

        let mut file = Writer::new();
        file.write_message(FILE_ENUM_TYPE, decl);

        let mut set = Writer::new();
        set.write_message(FILE_SET_FILE, file);

        let files = decode_descriptor_set(&set.buffer).expect("decode failed");
        assert_eq!(files[0].enums[0].values[0].number, -1);
    }
}
