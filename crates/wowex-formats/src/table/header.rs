//! Fixed `WDBC` payload header

use binrw::{BinRead, BinWrite};

/// Header at the start of every table payload
///
/// Records follow the 20-byte header back to back; the string block comes
/// right after the last record.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
#[brw(little, magic = b"WDBC")]
pub struct TableHeader {
    /// Number of records
    pub record_count: u32,
    /// Number of columns per record
    pub field_count: u32,
    /// Size of one record in bytes
    pub record_size: u32,
    /// Size of the trailing string block in bytes
    pub string_block_size: u32,
}

impl TableHeader {
    /// Encoded header size, magic included
    pub const SIZE: usize = 20;

    /// Byte offset of the first record
    pub const fn records_offset(&self) -> usize {
        Self::SIZE
    }

    /// Byte offset of the string block
    pub const fn string_block_offset(&self) -> u64 {
        Self::SIZE as u64 + self.record_count as u64 * self.record_size as u64
    }

    /// Payload length implied by the header
    pub const fn expected_len(&self) -> u64 {
        self.string_block_offset() + self.string_block_size as u64
    }
}
