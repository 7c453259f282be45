use crate::error::DescriptorError;

/// A positioned reader over protobuf wire data.
///
/// Example usage:
///
/// ```
/// let mut reader = protoclosure_descriptor::reader::WireReader::new(&[0x0a, 0x02, 0x68, 0x69]);
/// let (number, wire_type) = reader.read_tag().unwrap();
/// assert_eq!((number, wire_type), (1, 2));
/// assert_eq!(reader.read_len_prefixed().unwrap(), b"hi");
/// ```
pub struct WireReader<'a> {
    data: &'a [u8],
    index: usize,
}

impl<'a> WireReader<'a> {
    /// Create a new WireReader over the provided byte slice. The reader must
    /// not outlive the slice it borrows.
    pub fn new(data: &[u8]) -> WireReader {
        WireReader { data, index: 0 }
    }

    /// The current offset into the underlying slice.
    pub fn index(&self) -> usize {
        self.index
    }

    /// True once every byte has been consumed.
    pub fn at_end(&self) -> bool {
        self.index >= self.data.len()
    }

    fn read_byte(&mut self) -> Result<u8, DescriptorError> {
        if self.index >= self.data.len() {
            Err(DescriptorError::Truncated(self.index))
        } else {
            let value = self.data[self.index];
            self.index += 1;
            Ok(value)
        }
    }

    /// Try to read a base-128 varint starting at the current index.
    pub fn read_varint(&mut self) -> Result<u64, DescriptorError> {
        let mut shift: u32 = 0;
        let mut result: u64 = 0;

        loop {
            let byte = self.read_byte()?;
            result |= ((byte & 127) as u64) << shift;
            shift += 7;

            if (byte & 128) == 0 {
                return Ok(result);
            }
            if shift >= 64 {
                return Err(DescriptorError::Decode(format!(
                    "Varint overflows 64 bits at offset {}",
                    self.index
                )));
            }
        }
    }

    /// Try to read a field key, returning `(field_number, wire_type)`.
    pub fn read_tag(&mut self) -> Result<(u32, u32), DescriptorError> {
        let key = self.read_varint()?;
        Ok(((key >> 3) as u32, (key & 7) as u32))
    }

    /// Try to read a length-delimited value, returning the payload slice.
    pub fn read_len_prefixed(&mut self) -> Result<&'a [u8], DescriptorError> {
        let len = self.read_varint()?;
        // compared as u64 so an adversarial length cannot overflow the index
        if len > (self.data.len() - self.index) as u64 {
            return Err(DescriptorError::Truncated(self.index));
        }
        let len = len as usize;
        let value = &self.data[self.index..self.index + len];
        self.index += len;
        Ok(value)
    }

    /// Try to read a length-delimited UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, DescriptorError> {
        let offset = self.index;
        let bytes = self.read_len_prefixed()?;
        let text = std::str::from_utf8(bytes).map_err(|_| {
            DescriptorError::Decode(format!("Invalid UTF-8 string at offset {}", offset))
        })?;
        Ok(text.to_string())
    }

    /// Skip over one value of the given wire type.
    pub fn skip(&mut self, wire_type: u32) -> Result<(), DescriptorError> {
        match wire_type {
            0 => {
                self.read_varint()?;
            }
            1 => {
                self.advance(8)?;
            }
            2 => {
                self.read_len_prefixed()?;
            }
            5 => {
                self.advance(4)?;
            }
            other => {
                return Err(DescriptorError::Decode(format!(
                    "Cannot skip unknown wire type {} at offset {}",
                    other, self.index
                )));
            }
        }
        Ok(())
    }

    fn advance(&mut self, len: usize) -> Result<(), DescriptorError> {
        if len > self.data.len() - self.index {
            Err(DescriptorError::Truncated(self.index))
        } else {
            self.index += len;
            Ok(())
        }
    }
}
