use crate::error::GenError;
use protoclosure_descriptor::{FieldDescriptor, FieldKind, Label};

/// The binary encoding category of a field value on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    StartGroup,
    EndGroup,
    Fixed32,
}

impl WireType {
    /// The three-bit code stored in the low bits of a tag.
    pub fn code(self) -> u32 {
        match self {
            WireType::Varint => 0,
            WireType::Fixed64 => 1,
            WireType::LengthDelimited => 2,
            WireType::StartGroup => 3,
            WireType::EndGroup => 4,
            WireType::Fixed32 => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WireType::Varint => "VARINT",
            WireType::Fixed64 => "FIXED64",
            WireType::LengthDelimited => "LENGTH_DELIMITED",
            WireType::StartGroup => "START_GROUP",
            WireType::EndGroup => "END_GROUP",
            WireType::Fixed32 => "FIXED32",
        }
    }
}

/// The natural (non-packed) wire type for a scalar kind.
///
/// The 64-bit integer kinds are computed for completeness even though the
/// generators never emit fields of those kinds; only the group kind has no
/// wire type here. Hitting it means the supported-field filter was bypassed,
/// so it surfaces as an internal error rather than a user-facing one.
pub fn natural_wire_type(kind: FieldKind) -> Result<WireType, GenError> {
    match kind {
        FieldKind::Bool
        | FieldKind::Enum
        | FieldKind::Int32
        | FieldKind::Uint32
        | FieldKind::Sint32
        | FieldKind::Int64
        | FieldKind::Uint64
        | FieldKind::Sint64 => Ok(WireType::Varint),
        FieldKind::Bytes | FieldKind::String | FieldKind::Message => {
            Ok(WireType::LengthDelimited)
        }
        FieldKind::Double | FieldKind::Fixed64 | FieldKind::Sfixed64 => Ok(WireType::Fixed64),
        FieldKind::Float | FieldKind::Fixed32 | FieldKind::Sfixed32 => Ok(WireType::Fixed32),
        FieldKind::Group => Err(GenError::Internal(format!(
            "Unsupported type: {}",
            kind.name()
        ))),
    }
}

/// The tag integer prefixing an encoded field value:
/// `(field number << 3) | wire type`. When `packed` is set and the field is
/// repeated, the wire type is forced to LENGTH_DELIMITED, producing the
/// alternate tag that identifies a packed-array encoding.
pub fn tag(field: &FieldDescriptor, packed: bool) -> Result<u32, GenError> {
    let wire_type = if packed && field.label == Label::Repeated {
        WireType::LengthDelimited
    } else {
        natural_wire_type(field.kind)?
    };
    Ok((field.number << 3) | wire_type.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(number: u32, kind: FieldKind, label: Label) -> FieldDescriptor {
        FieldDescriptor {
            name: "f".to_string(),
            number,
            label,
            kind,
            type_name: None,
            default_value: None,
        }
    }

    #[test]
    fn unpacked_tag_combines_number_and_natural_wire_type() {
        let f = field(1, FieldKind::Int32, Label::Optional);
        assert_eq!(tag(&f, false).unwrap(), 8); // 1 << 3 | VARINT

        let f = field(2, FieldKind::String, Label::Repeated);
        assert_eq!(tag(&f, false).unwrap(), 18); // 2 << 3 | LENGTH_DELIMITED

        let f = field(3, FieldKind::Fixed32, Label::Repeated);
        assert_eq!(tag(&f, false).unwrap(), 29); // 3 << 3 | FIXED32

        let f = field(4, FieldKind::Double, Label::Optional);
        assert_eq!(tag(&f, false).unwrap(), 33); // 4 << 3 | FIXED64
    }

    #[test]
    fn packed_tag_forces_length_delimited_for_repeated_fields() {
        let f = field(3, FieldKind::Fixed32, Label::Repeated);
        assert_eq!(tag(&f, true).unwrap(), 26); // 3 << 3 | LENGTH_DELIMITED
    }

    #[test]
    fn packed_flag_is_ignored_for_non_repeated_fields() {
        let f = field(3, FieldKind::Fixed32, Label::Optional);
        assert_eq!(tag(&f, true).unwrap(), tag(&f, false).unwrap());
    }

    #[test]
    fn largest_field_number_fits_the_tag() {
        // the decoder caps field numbers at 2^29 - 1, the last value whose
        // shifted tag still fits in 32 bits
        let f = field((1 << 29) - 1, FieldKind::Int32, Label::Optional);
        assert_eq!(tag(&f, false).unwrap(), u32::MAX - 7);
    }

    #[test]
    fn sixty_four_bit_kinds_still_resolve_a_wire_type() {
        assert_eq!(natural_wire_type(FieldKind::Int64).unwrap(), WireType::Varint);
        assert_eq!(natural_wire_type(FieldKind::Fixed64).unwrap(), WireType::Fixed64);
    }

    #[test]
    fn group_kind_is_an_internal_error() {
        assert!(matches!(
            natural_wire_type(FieldKind::Group),
            Err(GenError::Internal(_))
        ));
    }
}
