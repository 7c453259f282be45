use protoclosure_codegen::builder::SectionBuffer;
use protoclosure_codegen::ClosureGenerator;
use protoclosure_descriptor::{
    EnumDescriptor, EnumValue, FieldDescriptor, FieldKind, FileDescriptor, Label,
    MessageDescriptor,
};

fn field(name: &str, number: u32, kind: FieldKind, label: Label) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        number,
        label,
        kind,
        type_name: None,
        default_value: None,
    }
}

fn message(name: &str, fields: Vec<FieldDescriptor>) -> MessageDescriptor {
    MessageDescriptor {
        name: name.to_string(),
        fields,
        enums: Vec::new(),
        messages: Vec::new(),
    }
}

fn file(package: Option<&str>, messages: Vec<MessageDescriptor>) -> FileDescriptor {
    FileDescriptor {
        name: "test.proto".to_string(),
        package: package.map(str::to_string),
        namespace: None,
        enums: Vec::new(),
        messages,
    }
}

fn generate(files: &[FileDescriptor]) -> String {
    let generator = ClosureGenerator::new(files);
    let buffer = SectionBuffer::new();
    for f in files {
        generator
            .process_file(f, &buffer)
            .unwrap_or_else(|err| panic!("generation failed: {}", err));
    }
    buffer.render()
}

#[test]
fn scalar_fields_get_one_case_per_field() {
    let files = vec![file(
        None,
        vec![message(
            "Point",
            vec![
                field("x", 1, FieldKind::Int32, Label::Optional),
                field("labels", 2, FieldKind::String, Label::Repeated),
            ],
        )],
    )];
    let code = generate(&files);

    // int32 #1 -> tag 8 (varint), repeated string #2 -> tag 18
    assert!(code.contains("case 8:"));
    assert!(code.contains("this.x = buffer.readVarint32(); break;"));
    assert!(code.contains("case 18:"));
    assert!(code.contains("this.labels.push(buffer.readVString()); break;"));

    // strings are already length-delimited, so no packed alternate case
    assert_eq!(code.matches("case 18:").count(), 1);

    // constructor initializers
    assert!(code.contains("this.x = null;"));
    assert!(code.contains("this.labels = [];"));
}

#[test]
fn repeated_fixed32_gets_a_packed_alternate_case() {
    let files = vec![file(
        None,
        vec![message(
            "Samples",
            vec![field("values", 3, FieldKind::Fixed32, Label::Repeated)],
        )],
    )];
    let code = generate(&files);

    // natural tag 29 (fixed32), packed tag 26 (length-delimited)
    assert!(code.contains("case 29:"));
    assert!(code.contains("this.values.push(buffer.readUint32()); break;"));
    assert!(code.contains("case 26:"));
    assert!(code.contains("return 29;"));
}

#[test]
fn messages_without_required_fields_keep_the_default_validator() {
    let files = vec![file(
        None,
        vec![message(
            "Loose",
            vec![field("x", 1, FieldKind::Int32, Label::Optional)],
        )],
    )];
    let code = generate(&files);

    assert!(!code.contains("isInitialized"));
    assert!(code.contains(
        "// No required fields for Loose, using default validator implementation."
    ));
}

#[test]
fn required_fields_are_validated_in_declaration_order() {
    let files = vec![file(
        None,
        vec![message(
            "Strict",
            vec![
                field("first_name", 1, FieldKind::String, Label::Required),
                field("age", 2, FieldKind::Int32, Label::Required),
                field("nickname", 3, FieldKind::String, Label::Optional),
            ],
        )],
    )];
    let code = generate(&files);

    assert!(code.contains("Strict.prototype.isInitialized = function(){"));
    assert!(code.contains("return this.firstName !== null &&"));
    assert!(code.contains("this.age !== null;"));
    assert!(!code.contains("this.nickname !== null"));
}

#[test]
fn nested_types_are_qualified_by_the_namespace_override() {
    let mut outer = message("Outer", Vec::new());
    outer.enums.push(EnumDescriptor {
        name: "Color".to_string(),
        values: vec![
            EnumValue {
                name: "RED".to_string(),
                number: 0,
            },
            EnumValue {
                name: "BLUE".to_string(),
                number: 1,
            },
        ],
    });
    let mut f = file(Some("pkg"), vec![outer]);
    f.namespace = Some("a.b".to_string());
    let code = generate(&[f]);

    assert!(code.contains("goog.provide('a.b.Outer');"));
    assert!(code.contains("goog.provide('a.b.Outer.Color');"));
    assert!(code.contains("a.b.Outer.Color = {"));
    assert!(code.contains("    RED: 0,\n    BLUE: 1\n};"));
}

#[test]
fn message_fields_decode_through_the_resolved_constructor() {
    let inner = message("Inner", Vec::new());
    let mut outer = message(
        "Outer",
        vec![FieldDescriptor {
            name: "child".to_string(),
            number: 4,
            label: Label::Optional,
            kind: FieldKind::Message,
            type_name: Some(".pkg.Outer.Inner".to_string()),
            default_value: None,
        }],
    );
    outer.messages.push(inner);
    let code = generate(&[file(Some("pkg"), vec![outer])]);

    // message #4 -> tag 34 (length-delimited)
    assert!(code.contains("case 34:"));
    assert!(code.contains("this.child = new pkg.Outer.Inner().decode(buffer); break;"));
}

#[test]
fn unsupported_fields_are_skipped_everywhere() {
    let files = vec![file(
        None,
        vec![message(
            "Mixed",
            vec![
                field("ticks", 1, FieldKind::Int64, Label::Required),
                field("name", 2, FieldKind::String, Label::Optional),
            ],
        )],
    )];
    let code = generate(&files);

    assert!(!code.contains("ticks"));
    assert!(code.contains("this.name = null;"));
    // the only required field was skipped, so the default validator applies
    assert!(!code.contains("isInitialized"));
}

#[test]
fn provides_come_before_requires_and_content() {
    let files = vec![file(None, vec![message("Only", Vec::new())])];
    let code = generate(&files);

    let provide = code
        .find("goog.provide('Only');")
        .unwrap_or_else(|| panic!("missing provide in:\n{}", code));
    let require = code
        .find("goog.require('protolib.Buffer');")
        .unwrap_or_else(|| panic!("missing require in:\n{}", code));
    let content = code
        .find("Only = function() {")
        .unwrap_or_else(|| panic!("missing constructor in:\n{}", code));
    assert!(provide < require);
    assert!(require < content);
    assert!(code.starts_with("// DO NOT EDIT!! This file contains auto-generated code"));
    assert!(code.contains("goog.inherits(Only, protolib.Message);"));
}
