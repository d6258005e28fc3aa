use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use super::error::CursorError;

/// ByteCursor extracts fixed-width little-endian fields from an in-memory buffer.
///
/// The position only ever moves forward. Every read checks the remaining length before
/// touching the buffer, so a short buffer is always reported as `CursorError::TruncatedInput`
/// and the cursor is left where it was.
#[derive(Debug, Clone)]
pub struct ByteCursor<T: AsRef<[u8]>> {
    cursor: Cursor<T>,
}

impl<T: AsRef<[u8]>> ByteCursor<T> {
    pub fn new(data: T) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Total size of the underlying buffer in bytes
    pub fn len(&self) -> usize {
        self.cursor.get_ref().as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Take the next `n` bytes as a slice
    pub fn read(&mut self, n: usize) -> Result<&[u8], CursorError> {
        self.require(n)?;
        let start = self.position();
        self.cursor.set_position((start + n) as u64);
        Ok(&self.cursor.get_ref().as_ref()[start..start + n])
    }

    pub fn skip(&mut self, n: usize) -> Result<(), CursorError> {
        self.read(n).map(|_| ())
    }

    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        self.read_field(2, |c| c.read_u16::<LittleEndian>())
    }

    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        self.read_field(4, |c| c.read_u32::<LittleEndian>())
    }

    pub fn read_i32(&mut self) -> Result<i32, CursorError> {
        self.read_field(4, |c| c.read_i32::<LittleEndian>())
    }

    pub fn read_u64(&mut self) -> Result<u64, CursorError> {
        self.read_field(8, |c| c.read_u64::<LittleEndian>())
    }

    pub fn read_u16_vec(&mut self, count: usize) -> Result<Vec<u16>, CursorError> {
        let size = array_size(count, 2);
        self.require(size)?;
        let mut values = vec![0; count];
        self.read_checked(size, |c| c.read_u16_into::<LittleEndian>(&mut values))?;
        Ok(values)
    }

    pub fn read_u32_vec(&mut self, count: usize) -> Result<Vec<u32>, CursorError> {
        let size = array_size(count, 4);
        self.require(size)?;
        let mut values = vec![0; count];
        self.read_checked(size, |c| c.read_u32_into::<LittleEndian>(&mut values))?;
        Ok(values)
    }

    pub fn read_f32_vec(&mut self, count: usize) -> Result<Vec<f32>, CursorError> {
        let size = array_size(count, 4);
        self.require(size)?;
        let mut values = vec![0.0; count];
        self.read_checked(size, |c| c.read_f32_into::<LittleEndian>(&mut values))?;
        Ok(values)
    }

    /// Read a NUL-padded string field of fixed width
    pub fn read_fixed_string(&mut self, width: usize) -> Result<String, CursorError> {
        let bytes = self.read(width)?;
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    fn require(&self, requested: usize) -> Result<(), CursorError> {
        let remaining = self.remaining();
        if requested > remaining {
            Err(CursorError::TruncatedInput {
                requested,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    fn read_field<V>(
        &mut self,
        size: usize,
        read: impl FnOnce(&mut Cursor<T>) -> std::io::Result<V>,
    ) -> Result<V, CursorError> {
        self.require(size)?;
        self.read_checked(size, read)
    }

    /// Run a byteorder read whose `size` has already been checked with `require`
    fn read_checked<V>(
        &mut self,
        size: usize,
        read: impl FnOnce(&mut Cursor<T>) -> std::io::Result<V>,
    ) -> Result<V, CursorError> {
        read(&mut self.cursor).map_err(|_| CursorError::TruncatedInput {
            requested: size,
            remaining: self.remaining(),
        })
    }
}

// Saturate so an absurd element count is reported as truncation instead of overflowing
fn array_size(count: usize, width: usize) -> usize {
    count.saturating_mul(width)
}
