use super::error::WireError;

/// A cursor over a received byte buffer.
///
/// Every read checks the remaining length first and returns
/// `WireError::UnexpectedEnd` on a short buffer. Reads never panic, since
/// the buffer contents are attacker-controlled.
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    fn take(&mut self, count: usize) -> Result<&'b [u8], WireError> {
        if self.remaining() < count {
            return Err(WireError::UnexpectedEnd {
                needed: count,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buffer[self.cursor..self.cursor + count];
        self.cursor += count;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        let bytes = self.take(4)?;
        // take() guarantees exactly 4 bytes
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_u64(&mut self) -> Result<u64, WireError> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(WireError::InvalidBool { value }),
        }
    }

    /// Rejects a declared element count that could not possibly fit in the
    /// remaining bytes, so a garbled length prefix cannot drive a huge
    /// allocation before the per-element reads fail.
    pub fn check_count(&self, count: u32, min_element_size: usize) -> Result<(), WireError> {
        let needed = (count as usize).saturating_mul(min_element_size);
        if needed > self.remaining() {
            return Err(WireError::CountTooLarge {
                count,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_values_in_order() {
        let buffer = [7u8, 1, 0, 0, 0, 1];
        let mut reader = ByteReader::new(&buffer);

        assert_eq!(reader.read_u8().unwrap(), 7);
        assert_eq!(reader.read_u32().unwrap(), 1);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn short_buffer_is_an_error() {
        let buffer = [1u8, 2, 3];
        let mut reader = ByteReader::new(&buffer);

        let result = reader.read_u32();
        assert_eq!(
            result,
            Err(WireError::UnexpectedEnd {
                needed: 4,
                remaining: 3
            })
        );
    }

    #[test]
    fn invalid_bool_byte_is_an_error() {
        let buffer = [2u8];
        let mut reader = ByteReader::new(&buffer);

        assert_eq!(
            reader.read_bool(),
            Err(WireError::InvalidBool { value: 2 })
        );
    }

    #[test]
    fn count_check_rejects_oversized_counts() {
        let buffer = [0u8; 8];
        let reader = ByteReader::new(&buffer);

        assert!(reader.check_count(2, 4).is_ok());
        assert_eq!(
            reader.check_count(u32::MAX, 4),
            Err(WireError::CountTooLarge {
                count: u32::MAX,
                remaining: 8
            })
        );
    }
}
