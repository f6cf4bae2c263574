//! Multivariate schemes work with long vectors over GF(16).  Two layouts are used here: a
//! byte-per-lane layout in a `u64`, which leaves room for the carry-less product of two
//! nibbles so eight lanes can be multiplied at once, and the dense wire layout with two
//! elements per byte, even index in the low nibble.

use crate::{Gf16, Truncate};

const LOW_NIBBLES: u64 = 0x0f0f_0f0f_0f0f_0f0f;
const HIGH_NIBBLES: u64 = 0xf0f0_f0f0_f0f0_f0f0;

/// Spread eight elements into the low nibbles of the bytes of a `u64`, lane `i` in byte `i`.
#[must_use]
pub fn pack_lanes(elems: &[Gf16; 8]) -> u64 {
    u64::from_le_bytes(elems.map(|x| u8::truncate(x.value())))
}

/// Inverse of [`pack_lanes`].  High nibbles are ignored.
#[must_use]
pub fn unpack_lanes(lanes: u64) -> [Gf16; 8] {
    lanes.to_le_bytes().map(|b| Gf16::new(u16::from(b)))
}

/// Multiply each of the eight lanes of `lanes` by `a`.
///
/// Lanes are laid out as by [`pack_lanes`]; bits outside the low nibbles are ignored.
#[must_use]
pub fn mul_lanes(a: Gf16, lanes: u64) -> u64 {
    let lanes = lanes & LOW_NIBBLES;
    let a = u64::from(a.value());

    // Products of two nibbles have degree at most 6 and stay inside their byte.
    let mut acc = 0;
    for i in 0..4 {
        acc ^= (lanes << i) & ((a >> i) & 1).wrapping_neg();
    }

    // x^4 = x + 1
    let top = acc & HIGH_NIBBLES;
    (acc ^ (top >> 4) ^ (top >> 3)) & LOW_NIBBLES
}

/// Pack `elems` two per byte into `out`, even index in the low nibble.
///
/// Writes `min(out.len(), elems.len().div_ceil(2))` bytes.  With an odd number of elements the
/// high nibble of the last byte is zero.
pub fn encode_nibbles(elems: &[Gf16], out: &mut [u8]) {
    for (byte, pair) in out.iter_mut().zip(elems.chunks(2)) {
        let lo = pair[0].value();
        let hi = pair.get(1).map_or(0, |x| x.value());
        *byte = u8::truncate(lo | (hi << 4));
    }
}

/// Unpack two elements per byte from `bytes` into `out`, even index from the low nibble.
///
/// Fills `min(out.len(), 2 * bytes.len())` elements.
pub fn decode_nibbles(bytes: &[u8], out: &mut [Gf16]) {
    for (pair, byte) in out.chunks_mut(2).zip(bytes) {
        pair[0] = Gf16::new(u16::from(byte & 0x0f));
        if let Some(hi) = pair.get_mut(1) {
            *hi = Gf16::new(u16::from(byte >> 4));
        }
    }
}
