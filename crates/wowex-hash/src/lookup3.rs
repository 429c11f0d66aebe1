//! Bob Jenkins' lookup3 hash, 64-bit variant
//!
//! Root indices key every named file by the lookup3 hash of its normalized
//! path, so the output here has to stay bit-exact with the hashes baked into
//! the archive. The input is consumed in zero-padded 12-byte blocks: all but
//! the last block go through [`mix`], the last one through [`final_mix`].
//! The result packs register `c` into the high half and `b` into the low
//! half, which is what `hashlittle2()` with zero seeds returns as `(pc, pb)`.
//!
//! Not a cryptographic hash.

const BLOCK_LEN: usize = 12;
const SEED: u32 = 0xdead_beef;

/// Hash raw bytes into the 64-bit lookup key.
///
/// The empty input skips mixing entirely and yields `0xdeadbeef_deadbeef`.
///
/// # Examples
///
/// ```
/// use wowex_hash::lookup3::hash64;
///
/// assert_eq!(hash64(b"Four score and seven years ago"), 0x1777_0551_ce72_26e6);
/// ```
pub fn hash64(data: &[u8]) -> u64 {
    // Length is folded in modulo 2^32, same as the reference uint32_t length.
    let init = SEED.wrapping_add(data.len() as u32);
    let (mut a, mut b, mut c) = (init, init, init);

    if data.is_empty() {
        return pack(c, b);
    }

    let last_start = (data.len() - 1) / BLOCK_LEN * BLOCK_LEN;
    let (body, tail) = data.split_at(last_start);

    for block in body.chunks_exact(BLOCK_LEN) {
        absorb(block, &mut a, &mut b, &mut c);
        mix(&mut a, &mut b, &mut c);
    }

    let mut last = [0u8; BLOCK_LEN];
    last[..tail.len()].copy_from_slice(tail);
    absorb(&last, &mut a, &mut b, &mut c);
    final_mix(&mut a, &mut b, &mut c);

    pack(c, b)
}

/// Normalize an archive path the way root indices expect it.
///
/// ASCII letters are upper-cased and forward slashes become backslashes.
pub fn normalize_path(path: &str) -> String {
    path.chars()
        .map(|ch| match ch {
            '/' => '\\',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Normalize a path and hash it.
pub fn hash_path(path: &str) -> u64 {
    hash64(normalize_path(path).as_bytes())
}

fn pack(high: u32, low: u32) -> u64 {
    (u64::from(high) << 32) | u64::from(low)
}

fn absorb(block: &[u8], a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_add(u32::from_le_bytes([block[0], block[1], block[2], block[3]]));
    *b = b.wrapping_add(u32::from_le_bytes([block[4], block[5], block[6], block[7]]));
    *c = c.wrapping_add(u32::from_le_bytes([block[8], block[9], block[10], block[11]]));
}

/// Reversible mix of three registers (rotations 4, 6, 8, 16, 19, 4).
fn mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(4);
    *c = c.wrapping_add(*b);

    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(6);
    *a = a.wrapping_add(*c);

    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(8);
    *b = b.wrapping_add(*a);

    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(16);
    *c = c.wrapping_add(*b);

    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(19);
    *a = a.wrapping_add(*c);

    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(4);
    *b = b.wrapping_add(*a);
}

/// Final avalanche (rotations 14, 11, 25, 16, 4, 14, 24).
fn final_mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(14));

    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(11));

    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(25));

    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(16));

    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(4));

    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(14));

    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(24));
}
