//! Bit-granular cursor over packed record data
//!
//! Packed tables store fields back to back with no byte alignment. The
//! buffer is treated as a little-endian bit stream: bit 0 of a field is the
//! lowest not-yet-consumed bit of the current byte.
//!
//! A read loads an over-sized word starting at the current byte, shifts left
//! to drop the bits above the field, then shifts right to drop the bits that
//! were already consumed. The position only ever moves forward.
//!
//! ```
//! use wowex_formats::bits::BitCursor;
//!
//! let data = [0b1010_0101, 0xff];
//! let mut cursor = BitCursor::new(&data, 0);
//! assert_eq!(cursor.read_u32(4).unwrap(), 0b0101);
//! assert_eq!(cursor.read_u32(4).unwrap(), 0b1010);
//! assert_eq!(cursor.read_u32(8).unwrap(), 0xff);
//! ```

mod raw;

pub use raw::RawValue;

use thiserror::Error;

/// Widest field a single read can produce
pub const MAX_FIELD_BITS: u32 = 64;

/// Errors raised by the bit cursor
///
/// Both variants mean the payload or its schema is broken; decoding cannot
/// continue past them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitCursorError {
    /// Requested width is zero or wider than a machine word
    #[error("invalid field width: {0} bits (expected 1..=64)")]
    InvalidWidth(u32),

    /// Read would run past the end of the buffer
    #[error("bit overrun: reading {bits} bits at bit {position} of a {available}-bit buffer")]
    Overrun {
        /// Absolute bit position of the read
        position: usize,
        /// Requested width
        bits: u32,
        /// Total bits in the buffer
        available: usize,
    },
}

/// Result type for cursor reads
pub type Result<T> = std::result::Result<T, BitCursorError>;

/// Forward-only reader of arbitrary-width unsigned fields
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    offset: usize,
    bit_pos: usize,
}

impl<'a> BitCursor<'a> {
    /// Create a cursor whose bit 0 is the first bit of `data[offset]`
    pub const fn new(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            offset,
            bit_pos: 0,
        }
    }

    /// Bits consumed since construction
    pub const fn position(&self) -> usize {
        self.bit_pos
    }

    /// Fixed byte offset the cursor started at
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Bits left between the current position and the end of the buffer
    pub fn remaining_bits(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.absolute_bit())
    }

    /// Read a field of up to 32 bits
    pub fn read_u32(&mut self, bits: u32) -> Result<u32> {
        if bits > 32 {
            return Err(BitCursorError::InvalidWidth(bits));
        }
        Ok(self.read_u64(bits)? as u32)
    }

    /// Read a field of up to 64 bits
    pub fn read_u64(&mut self, bits: u32) -> Result<u64> {
        if bits == 0 || bits > MAX_FIELD_BITS {
            return Err(BitCursorError::InvalidWidth(bits));
        }

        let position = self.absolute_bit();
        let available = self.data.len() * 8;
        if position + bits as usize > available {
            return Err(BitCursorError::Overrun {
                position,
                bits,
                available,
            });
        }

        let shift = (position % 8) as u32;
        let word = self.load_word(position / 8);
        let value = (word << (128 - shift - bits)) >> (128 - bits);

        self.bit_pos += bits as usize;
        Ok(value as u64)
    }

    /// Read a field and keep its declared width for later reinterpretation
    pub fn read_raw(&mut self, bits: u32) -> Result<RawValue> {
        let value = self.read_u64(bits)?;
        Ok(RawValue::new(value, bits))
    }

    /// Skip `bits` without decoding them
    pub fn skip(&mut self, bits: usize) -> Result<()> {
        let position = self.absolute_bit();
        let available = self.data.len() * 8;
        if position + bits > available {
            return Err(BitCursorError::Overrun {
                position,
                bits: u32::try_from(bits).unwrap_or(u32::MAX),
                available,
            });
        }
        self.bit_pos += bits;
        Ok(())
    }

    fn absolute_bit(&self) -> usize {
        self.offset * 8 + self.bit_pos
    }

    /// Little-endian load of up to 16 bytes; bytes past the end read as zero.
    fn load_word(&self, byte_index: usize) -> u128 {
        let mut bytes = [0u8; 16];
        let end = self.data.len().min(byte_index + bytes.len());
        if byte_index < end {
            bytes[..end - byte_index].copy_from_slice(&self.data[byte_index..end]);
        }
        u128::from_le_bytes(bytes)
    }
}
