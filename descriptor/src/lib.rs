//! protoclosure-descriptor
//!
//! This crate implements:
//!  1) The descriptor tree model consumed by the code generator
//!     (`FileDescriptor`, `MessageDescriptor`, `EnumDescriptor`, ...),
//!  2) A positioned wire reader over `&[u8]` (`WireReader`),
//!  3) `decode_descriptor_set` for the binary `FileDescriptorSet` emitted
//!     by `protoc --descriptor_set_out`, and
//!  4) Error types (`DescriptorError`).

pub mod decode;
pub mod error;
pub mod reader;
pub mod types;

pub use decode::decode_descriptor_set;
pub use error::DescriptorError;
pub use types::{
    EnumDescriptor, EnumValue, FieldDescriptor, FieldKind, FileDescriptor, Label,
    MessageDescriptor,
};
