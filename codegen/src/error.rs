use protoclosure_descriptor::DescriptorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid options: {0}")]
    Config(String),

    #[error("Unresolved type reference {0}")]
    UnresolvedType(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("protoc exited with code {0}")]
    Protoc(i32),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}
