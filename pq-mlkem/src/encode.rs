use hybrid_array::{Array, typenum::U256};

use crate::algebra::{BaseField, Elem, NttPolynomial, NttVector, Polynomial, Vector};
use crate::param::{ArraySize, EncodingSize};
use pq_field::Truncate;

/// The 256 coefficients of one polynomial
pub(crate) type Coefficients = Array<Elem, U256>;

/// Algorithm 5: `ByteEncode_d(F)`
///
/// Eight `d`-bit values fill exactly `d` bytes, so the packing works on groups of eight.
/// `out` must be `32·d` bytes long.
pub(crate) fn byte_encode<D: EncodingSize>(vals: &Coefficients, out: &mut [u8]) {
    debug_assert_eq!(out.len(), D::ENCODED_POLYNOMIAL_SIZE);

    for (v, b) in vals.chunks_exact(8).zip(out.chunks_exact_mut(D::USIZE)) {
        let mut x = 0u128;
        for (j, vj) in v.iter().enumerate() {
            x |= u128::from(vj.0) << (D::USIZE * j);
        }
        b.copy_from_slice(&x.to_le_bytes()[..D::USIZE]);
    }
}

/// Algorithm 6: `ByteDecode_d(B)`
///
/// Twelve-bit values are reduced mod q; narrower values are always below q.  `bytes` must be
/// `32·d` bytes long.
pub(crate) fn byte_decode<D: EncodingSize>(bytes: &[u8]) -> Coefficients {
    debug_assert_eq!(bytes.len(), D::ENCODED_POLYNOMIAL_SIZE);

    let mask = (1u128 << D::USIZE) - 1;
    let mut vals = Coefficients::default();

    for (v, b) in vals.chunks_exact_mut(8).zip(bytes.chunks_exact(D::USIZE)) {
        let mut xb = [0u8; 16];
        xb[..D::USIZE].copy_from_slice(b);
        let x = u128::from_le_bytes(xb);

        for (j, vj) in v.iter_mut().enumerate() {
            let raw = u16::truncate((x >> (D::USIZE * j)) & mask);
            *vj = Elem::new(BaseField::small_reduce(raw));
        }
    }

    vals
}

/// Fixed-width encoding of ring elements and vectors of them, `d` bits per coefficient
pub(crate) trait Encode<D: EncodingSize>: Sized {
    /// Length of the encoding
    const ENCODED_SIZE: usize;

    /// Write the encoding into `out`, which is [`Encode::ENCODED_SIZE`] bytes long.
    fn encode(&self, out: &mut [u8]);

    /// Read a value back from [`Encode::ENCODED_SIZE`] bytes.
    fn decode(bytes: &[u8]) -> Self;
}

impl<D: EncodingSize> Encode<D> for Polynomial {
    const ENCODED_SIZE: usize = D::ENCODED_POLYNOMIAL_SIZE;

    fn encode(&self, out: &mut [u8]) {
        byte_encode::<D>(&self.0, out);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self::new(byte_decode::<D>(bytes))
    }
}

impl<D: EncodingSize> Encode<D> for NttPolynomial {
    const ENCODED_SIZE: usize = D::ENCODED_POLYNOMIAL_SIZE;

    fn encode(&self, out: &mut [u8]) {
        byte_encode::<D>(&self.0, out);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self::new(byte_decode::<D>(bytes))
    }
}

impl<D: EncodingSize, K: ArraySize> Encode<D> for Vector<K> {
    const ENCODED_SIZE: usize = D::ENCODED_POLYNOMIAL_SIZE * K::USIZE;

    fn encode(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), <Self as Encode<D>>::ENCODED_SIZE);
        for (p, b) in self.0.iter().zip(out.chunks_exact_mut(D::ENCODED_POLYNOMIAL_SIZE)) {
            Encode::<D>::encode(p, b);
        }
    }

    fn decode(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), <Self as Encode<D>>::ENCODED_SIZE);
        let mut chunks = bytes.chunks_exact(D::ENCODED_POLYNOMIAL_SIZE);
        Self::new(Array::from_fn(|_| {
            chunks
                .next()
                .map(Encode::<D>::decode)
                .unwrap_or_default()
        }))
    }
}

impl<D: EncodingSize, K: ArraySize> Encode<D> for NttVector<K> {
    const ENCODED_SIZE: usize = D::ENCODED_POLYNOMIAL_SIZE * K::USIZE;

    fn encode(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), <Self as Encode<D>>::ENCODED_SIZE);
        for (p, b) in self.0.iter().zip(out.chunks_exact_mut(D::ENCODED_POLYNOMIAL_SIZE)) {
            Encode::<D>::encode(p, b);
        }
    }

    fn decode(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), <Self as Encode<D>>::ENCODED_SIZE);
        let mut chunks = bytes.chunks_exact(D::ENCODED_POLYNOMIAL_SIZE);
        Self::new(Array::from_fn(|_| {
            chunks
                .next()
                .map(Encode::<D>::decode)
                .unwrap_or_default()
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hybrid_array::typenum::{U1, U2, U4, U5, U10, U11, U12};
    use rand::Rng;

    #[allow(clippy::cast_possible_truncation)]
    fn ramp(modulus: usize) -> Coefficients {
        Array::from_fn(|i| Elem::new((i % modulus) as u16))
    }

    fn encoded<D: EncodingSize>(vals: &Coefficients) -> [u8; 384] {
        let mut out = [0u8; 384];
        byte_encode::<D>(vals, &mut out[..D::ENCODED_POLYNOMIAL_SIZE]);
        out
    }

    #[test]
    fn known_answers() {
        let ones = encoded::<U1>(&ramp(2));
        assert!(ones[..32].iter().all(|&b| b == 0b1010_1010));

        let nibbles = encoded::<U4>(&ramp(16));
        assert_eq!(nibbles[..4], [0x10, 0x32, 0x54, 0x76]);
        assert_eq!(nibbles[127], 0xfe);

        let twelve = encoded::<U12>(&ramp(256));
        assert_eq!(twelve[..6], [0x00, 0x10, 0x00, 0x02, 0x30, 0x00]);
    }

    #[test]
    fn decode_12_reduces() {
        let bytes = [0xffu8; 384];
        let vals = byte_decode::<U12>(&bytes);
        assert!(vals.iter().all(|x| *x == Elem::new(4095 - 3329)));

        // Re-encoding exposes the non-canonical input.
        assert_ne!(encoded::<U12>(&vals), bytes);
    }

    fn random_round_trip<D: EncodingSize>(rng: &mut impl Rng) {
        let bound = if D::USIZE == 12 { 3329 } else { 1 << D::USIZE };
        let vals: Coefficients = Array::from_fn(|_| Elem::new(rng.random_range(0..bound)));
        let bytes = encoded::<D>(&vals);
        assert_eq!(byte_decode::<D>(&bytes[..D::ENCODED_POLYNOMIAL_SIZE]), vals);
    }

    #[test]
    fn round_trip() {
        let mut rng = rand::rng();
        for _ in 0..16 {
            random_round_trip::<U1>(&mut rng);
            random_round_trip::<U4>(&mut rng);
            random_round_trip::<U5>(&mut rng);
            random_round_trip::<U10>(&mut rng);
            random_round_trip::<U11>(&mut rng);
            random_round_trip::<U12>(&mut rng);
        }
    }

    #[test]
    fn vector_is_concatenation() {
        let v: Vector<U2> = Vector::new(Array([
            Polynomial::new(ramp(1024)),
            Polynomial::new(ramp(7)),
        ]));
        let mut out = [0u8; 640];
        Encode::<U10>::encode(&v, &mut out);

        let mut first = [0u8; 320];
        Encode::<U10>::encode(&v.0[0], &mut first);
        assert_eq!(out[..320], first);
        assert_eq!(<Vector<U2> as Encode<U10>>::decode(&out), v);
        assert_eq!(<Vector<U2> as Encode<U10>>::ENCODED_SIZE, 640);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "assertion `left == right` failed")]
    fn vector_rejects_short_buffer() {
        let v: NttVector<U2> = NttVector::default();
        let mut out = [0u8; 767];
        Encode::<U12>::encode(&v, &mut out);
    }
}
