//! Shared builders for synthetic payloads

#![allow(dead_code)]

/// Little-endian bit packer, independent of the crate's cursor
#[derive(Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bits: usize,
}

impl BitWriter {
    pub fn push(&mut self, value: u64, width: u32) {
        for bit in 0..width {
            if self.bits % 8 == 0 {
                self.bytes.push(0);
            }
            if (value >> bit) & 1 == 1 {
                let last = self.bytes.len() - 1;
                self.bytes[last] |= 1 << (self.bits % 8);
            }
            self.bits += 1;
        }
    }

    /// Pad with zero bytes up to `size` and return the record
    pub fn finish(mut self, size: usize) -> Vec<u8> {
        assert!(self.bytes.len() <= size, "record overflows its slot");
        self.bytes.resize(size, 0);
        self.bytes
    }
}

/// Assemble a `WDBC` payload from finished records and a string block
pub fn wdbc(field_count: u32, record_size: u32, records: &[Vec<u8>], strings: &[u8]) -> Vec<u8> {
    let mut out = b"WDBC".to_vec();
    for v in [records.len() as u32, field_count, record_size, strings.len() as u32] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    for record in records {
        out.extend_from_slice(record);
    }
    out.extend_from_slice(strings);
    out
}

/// String block builder that hands out offsets
pub struct StringBlock {
    bytes: Vec<u8>,
}

impl StringBlock {
    pub fn new() -> Self {
        Self { bytes: vec![0] }
    }

    pub fn add(&mut self, value: &str) -> u32 {
        let offset = self.bytes.len() as u32;
        self.bytes.extend_from_slice(value.as_bytes());
        self.bytes.push(0);
        offset
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
