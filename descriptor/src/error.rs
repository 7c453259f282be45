use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("Descriptor decode error: {0}")]
    Decode(String),

    #[error("Descriptor data ended unexpectedly at offset {0}")]
    Truncated(usize),
}
