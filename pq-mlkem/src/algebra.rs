use core::ops::Mul;
use hybrid_array::Array;
use pq_field::{MultiplyNtt, Truncate};
use sha3::digest::XofReader;

use crate::B32;
use crate::crypto::{MAX_PRF_OUTPUT_SIZE, PRF, XOF};
use crate::encode::byte_decode;
use crate::param::{ArraySize, CbdSamplingSize};

pq_field::define_field!(BaseField, u16, u32, u64, 3329);

/// Integer representation of a field element
pub type Int = u16;

/// An element of `Z_q`
pub type Elem = pq_field::Elem<BaseField>;

/// An element of `R_q`
pub type Polynomial = pq_field::Polynomial<BaseField>;

/// A vector of `K` elements of `R_q`
pub type Vector<K> = pq_field::Vector<BaseField, K>;

/// An element of `T_q`, the NTT image of `R_q`
pub type NttPolynomial = pq_field::NttPolynomial<BaseField>;

/// A vector of `K` elements of `T_q`
pub type NttVector<K> = pq_field::NttVector<BaseField, K>;

/// SHAKE128 rate; the rejection sampler squeezes one block at a time.
const XOF_BLOCK_SIZE: usize = 168;

/// Algorithm 7: `SampleNTT(B)`
///
/// Three bytes yield two 12-bit candidates; candidates at or above `q` are skipped.  The number
/// of blocks read depends only on the public seed.
pub(crate) fn sample_ntt(xof: &mut impl XofReader) -> NttPolynomial {
    let mut out = NttPolynomial::default();
    let mut block = [0u8; XOF_BLOCK_SIZE];
    let mut pos = XOF_BLOCK_SIZE;
    let mut j = 0;

    while j < 256 {
        if pos == XOF_BLOCK_SIZE {
            xof.read(&mut block);
            pos = 0;
        }

        let b = &block[pos..pos + 3];
        pos += 3;

        let d1 = Int::from(b[0]) | ((Int::from(b[1]) & 0x0f) << 8);
        let d2 = (Int::from(b[1]) >> 4) | (Int::from(b[2]) << 4);

        if d1 < BaseField::Q {
            out.0[j] = Elem::new(d1);
            j += 1;
        }

        if d2 < BaseField::Q && j < 256 {
            out.0[j] = Elem::new(d2);
            j += 1;
        }
    }

    out
}

/// Algorithm 8: `SamplePolyCBD_η(B)`
///
/// `B` is read as 256 values of `2η` bits each.  The low `η` bits of a value are the `x` terms
/// of the sum and the high `η` bits the `y` terms, so each coefficient is a difference of two
/// population counts.
pub(crate) fn sample_poly_cbd<Eta: CbdSamplingSize>(bytes: &[u8]) -> Polynomial {
    let low_mask = (1 << Eta::USIZE) - 1;
    let vals = byte_decode::<Eta::SampleSize>(bytes);

    Polynomial::new(Array::from_fn(|i| {
        let v = vals[i].0;
        let x = Int::truncate((v & low_mask).count_ones());
        let y = Int::truncate((v >> Eta::USIZE).count_ones());
        Elem::new(x) - Elem::new(y)
    }))
}

/// Sample `K` noise polynomials from `PRF_η(σ, N)` for `N = start_n, start_n + 1, ...`
pub(crate) fn sample_poly_vec_cbd<Eta, K>(sigma: &B32, start_n: u8) -> Vector<K>
where
    Eta: CbdSamplingSize,
    K: ArraySize,
{
    let mut buf = [0u8; MAX_PRF_OUTPUT_SIZE];
    Vector::new(Array::from_fn(|i| {
        let n = start_n + u8::truncate(i);
        sample_poly_cbd::<Eta>(PRF::<Eta>(sigma, n, &mut buf))
    }))
}

/// Conversion into the NTT domain
pub(crate) trait Ntt {
    type Output;
    fn ntt(&self) -> Self::Output;
}

/// Algorithm 9: `NTT(f)`
impl Ntt for Polynomial {
    type Output = NttPolynomial;

    fn ntt(&self) -> NttPolynomial {
        let mut f = self.0.clone();
        let mut k = 1;

        for len in [128, 64, 32, 16, 8, 4, 2] {
            for start in (0..256).step_by(2 * len) {
                let zeta = ZETAS[k];
                k += 1;

                for j in start..start + len {
                    let t = zeta * f[j + len];
                    f[j + len] = f[j] - t;
                    f[j] = f[j] + t;
                }
            }
        }

        NttPolynomial::new(f)
    }
}

impl<K: ArraySize> Ntt for Vector<K> {
    type Output = NttVector<K>;

    fn ntt(&self) -> NttVector<K> {
        NttVector::new(Array::from_fn(|i| self.0[i].ntt()))
    }
}

/// Conversion out of the NTT domain
pub(crate) trait NttInverse {
    type Output;
    fn ntt_inverse(&self) -> Self::Output;
}

/// `128^-1 mod q`, the scale applied at the end of the inverse transform
const N_INV: Elem = Elem::new(3303);

/// Algorithm 10: `NTT^-1(f^)`
impl NttInverse for NttPolynomial {
    type Output = Polynomial;

    fn ntt_inverse(&self) -> Polynomial {
        let mut f = self.0.clone();
        let mut k = 127;

        for len in [2, 4, 8, 16, 32, 64, 128] {
            for start in (0..256).step_by(2 * len) {
                let zeta = ZETAS[k];
                k -= 1;

                for j in start..start + len {
                    let t = f[j];
                    f[j] = t + f[j + len];
                    f[j + len] = zeta * (f[j + len] - t);
                }
            }
        }

        N_INV * &Polynomial::new(f)
    }
}

impl<K: ArraySize> NttInverse for NttVector<K> {
    type Output = Vector<K>;

    fn ntt_inverse(&self) -> Vector<K> {
        Vector::new(Array::from_fn(|i| self.0[i].ntt_inverse()))
    }
}

/// Algorithm 11: `MultiplyNTTs(f^, g^)`
impl MultiplyNtt for BaseField {
    fn multiply_ntt(lhs: &NttPolynomial, rhs: &NttPolynomial) -> NttPolynomial {
        let mut out = NttPolynomial::default();

        for (i, gamma) in GAMMAS.iter().enumerate() {
            let (c0, c1) = base_case_multiply(
                [lhs.0[2 * i], lhs.0[2 * i + 1]],
                [rhs.0[2 * i], rhs.0[2 * i + 1]],
                *gamma,
            );
            out.0[2 * i] = c0;
            out.0[2 * i + 1] = c1;
        }

        out
    }
}

/// Algorithm 12: `BaseCaseMultiply(a0, a1, b0, b1, γ)`
///
/// Products are accumulated in `u32` so that each output coefficient costs one reduction.
#[inline]
fn base_case_multiply(a: [Elem; 2], b: [Elem; 2], gamma: Elem) -> (Elem, Elem) {
    let [a0, a1] = a.map(|x| u32::from(x.0));
    let [b0, b1] = b.map(|x| u32::from(x.0));
    let b1_gamma = u32::from(BaseField::barrett_reduce(b1 * u32::from(gamma.0)));

    let c0 = BaseField::barrett_reduce(a0 * b0 + a1 * b1_gamma);
    let c1 = BaseField::barrett_reduce(a0 * b1 + a1 * b0);
    (Elem::new(c0), Elem::new(c1))
}

/// `ζ = 17`, a primitive 256th root of unity mod q
const ZETA: u32 = 17;

#[allow(clippy::cast_possible_truncation)]
const fn bitrev7(i: usize) -> usize {
    ((i as u8).reverse_bits() >> 1) as usize
}

#[allow(clippy::integer_division_remainder_used, clippy::cast_possible_truncation)]
const fn zeta_pow(exp: usize) -> Elem {
    let mut acc = 1u32;
    let mut i = 0;
    while i < exp {
        acc = (acc * ZETA) % BaseField::QL;
        i += 1;
    }
    Elem::new(acc as Int)
}

/// `ZETAS[i] = ζ^BitRev7(i)`, the first table of FIPS 203 Appendix A
const ZETAS: [Elem; 128] = {
    let mut out = [Elem::new(0); 128];
    let mut i = 0;
    while i < 128 {
        out[i] = zeta_pow(bitrev7(i));
        i += 1;
    }
    out
};

/// `GAMMAS[i] = ζ^(2·BitRev7(i) + 1)`, the second table of FIPS 203 Appendix A
const GAMMAS: [Elem; 128] = {
    let mut out = [Elem::new(0); 128];
    let mut i = 0;
    while i < 128 {
        out[i] = zeta_pow(2 * bitrev7(i) + 1);
        i += 1;
    }
    out
};

/// A `K x K` matrix over `T_q`, stored as rows
#[derive(Clone)]
pub(crate) struct NttMatrix<K: ArraySize>(Array<NttVector<K>, K>);

impl<K: ArraySize> NttMatrix<K> {
    /// Expand `Â` (or its transpose) from the public seed `ρ`: entry `(i, j)` of `Â` is
    /// `SampleNTT(XOF(ρ, j, i))`.
    pub(crate) fn sample_uniform(rho: &B32, transpose: bool) -> Self {
        Self(Array::from_fn(|i| {
            NttVector::new(Array::from_fn(|j| {
                let (row, col) = if transpose { (j, i) } else { (i, j) };
                let mut xof = XOF(rho, u8::truncate(col), u8::truncate(row));
                sample_ntt(&mut xof)
            }))
        }))
    }
}

impl<K: ArraySize> Mul<&NttVector<K>> for &NttMatrix<K> {
    type Output = NttVector<K>;

    fn mul(self, rhs: &NttVector<K>) -> NttVector<K> {
        NttVector::new(Array::from_fn(|i| &self.0[i] * rhs))
    }
}
