//! Reinterpretation of raw field bits

/// Raw bits of one field together with its declared width
///
/// The cursor only ever produces unsigned integers. Turning them into signed
/// values or floats is an explicit step taken when the schema asks for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawValue {
    bits: u64,
    width: u32,
}

impl RawValue {
    /// Wrap `bits` read from a field `width` bits wide
    pub const fn new(bits: u64, width: u32) -> Self {
        Self { bits, width }
    }

    /// Declared field width in bits
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Bits as an unsigned 64-bit value
    pub const fn as_u64(&self) -> u64 {
        self.bits
    }

    /// Low 32 bits as an unsigned value
    pub const fn as_u32(&self) -> u32 {
        self.bits as u32
    }

    /// Bits as a signed value, sign-extended from the declared width
    pub const fn as_i64(&self) -> i64 {
        if self.width >= 64 {
            return self.bits as i64;
        }
        let unused = 64 - self.width;
        ((self.bits << unused) as i64) >> unused
    }

    /// Low 32 bits as an IEEE-754 single
    pub fn as_f32(&self) -> f32 {
        f32::from_bits(self.as_u32())
    }

    /// Bits as an IEEE-754 double
    pub fn as_f64(&self) -> f64 {
        f64::from_bits(self.bits)
    }

    /// Storage size of the value in bytes
    ///
    /// `ceil(width / 8)` rounded up to the next power of two, so 1..=8 bits
    /// take one byte, 9..=16 two, 17..=32 four and 33..=64 eight. A 12-bit
    /// field therefore occupies two bytes, a 24-bit field four.
    pub const fn byte_len(&self) -> usize {
        (self.width as usize).div_ceil(8).next_power_of_two()
    }

    /// Little-endian bytes trimmed to [`Self::byte_len`]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.bits.to_le_bytes()[..self.byte_len()].to_vec()
    }
}
