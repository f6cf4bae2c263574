//! A binary field `GF(2^m)` is represented by polynomials over GF(2) of degree below `m`, stored
//! as the bits of a `u16` with bit `i` holding the coefficient of `z^i`.  Every value leaving
//! this module is fully reduced.
//!
//! Multiplication is a masked shift-and-xor product followed by a fold of the high half onto the
//! low half through the low-degree terms of the modulus.  For a modulus `z^m + t(z)` with
//! `deg t <= (m + 1) / 2`, two folds always suffice, which is checked when a field is
//! instantiated.

use core::fmt;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::Truncate;

/// Defining polynomial `z^BITS + TAIL(z)` of a binary field.
pub trait Modulus: Copy + Default + Eq + Send + Sync + 'static {
    /// Degree of the field extension
    const BITS: u32;

    /// Terms of the defining polynomial below `z^BITS`, bit `i` being the coefficient of `z^i`
    const TAIL: u32;

    /// Name of the field, used when formatting elements
    const NAME: &'static str;
}

/// `z^12 + z^3 + 1`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Poly4096;

impl Modulus for Poly4096 {
    const BITS: u32 = 12;
    const TAIL: u32 = 0b1001;
    const NAME: &'static str = "Gf4096";
}

/// `z^13 + z^4 + z^3 + z + 1`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Poly8192;

impl Modulus for Poly8192 {
    const BITS: u32 = 13;
    const TAIL: u32 = 0b1_1011;
    const NAME: &'static str = "Gf8192";
}

/// `x^4 + x + 1`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Poly16;

impl Modulus for Poly16 {
    const BITS: u32 = 4;
    const TAIL: u32 = 0b11;
    const NAME: &'static str = "Gf16";
}

/// GF(2^12), the field of the code-based KEMs
pub type Gf4096 = Gf<Poly4096>;

/// GF(2^13)
pub type Gf8192 = Gf<Poly8192>;

/// GF(16), the field of the multivariate signatures
pub type Gf16 = Gf<Poly16>;

/// An element of `GF(2^M::BITS)`.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Gf<M: Modulus> {
    value: u16,
    modulus: PhantomData<M>,
}

impl<M: Modulus> Gf<M> {
    const MASK: u32 = (1 << M::BITS) - 1;
    const TAIL_WIDTH: u32 = u32::BITS - M::TAIL.leading_zeros();

    const VALID: () = {
        assert!(M::BITS >= 2 && M::BITS <= 16, "field degree must lie in 2..=16");
        assert!(M::TAIL & 1 == 1, "modulus must have a constant term");
        assert!(M::TAIL >> M::BITS == 0, "modulus tail must lie below z^BITS");
        assert!(
            2 * (Self::TAIL_WIDTH - 1) <= M::BITS + 1,
            "modulus tail too wide for a two-fold reduction"
        );
    };

    /// The additive identity
    pub const ZERO: Self = Self::from_reduced(0);

    /// The multiplicative identity
    pub const ONE: Self = Self::from_reduced(1);

    const fn from_reduced(value: u16) -> Self {
        Self {
            value,
            modulus: PhantomData,
        }
    }

    /// Build an element from its bit representation.  Bits at or above `z^BITS` are dropped.
    #[must_use]
    pub fn new(value: u16) -> Self {
        let () = Self::VALID;
        Self::from_reduced(u16::truncate(u32::from(value) & Self::MASK))
    }

    /// The bit representation of this element, always below `2^BITS`
    #[must_use]
    pub const fn value(self) -> u16 {
        self.value
    }

    /// Carry-less product of `a` with the low `width` bits of `b`.  The bits of `b` only select
    /// masks, so the instruction trace does not depend on them.
    #[inline(always)]
    fn clmul(a: u32, b: u32, width: u32) -> u32 {
        let mut acc = 0;
        for i in 0..width {
            acc ^= (a << i) & ((b >> i) & 1).wrapping_neg();
        }
        acc
    }

    /// Reduce a polynomial of degree at most `2 * BITS - 2`.
    #[inline(always)]
    fn reduce(x: u32) -> Self {
        let () = Self::VALID;
        let x = (x & Self::MASK) ^ Self::clmul(x >> M::BITS, M::TAIL, Self::TAIL_WIDTH);
        let x = (x & Self::MASK) ^ Self::clmul(x >> M::BITS, M::TAIL, Self::TAIL_WIDTH);
        Self::from_reduced(u16::truncate(x))
    }

    /// `self^2`, computed by spreading the bits of `self` apart so that bit `i` lands on bit
    /// `2i`, then reducing.  Always equal to `self * self`.
    #[must_use]
    pub fn square(self) -> Self {
        let mut x = u32::from(self.value);
        x = (x | (x << 8)) & 0x00FF_00FF;
        x = (x | (x << 4)) & 0x0F0F_0F0F;
        x = (x | (x << 2)) & 0x3333_3333;
        x = (x | (x << 1)) & 0x5555_5555;
        Self::reduce(x)
    }

    /// `self^(2^k)`
    #[must_use]
    pub fn square_n(self, k: u32) -> Self {
        let mut x = self;
        for _ in 0..k {
            x = x.square();
        }
        x
    }

    /// Multiplicative inverse `self^(2^BITS - 2)`.
    ///
    /// The exponent is reached with an Itoh–Tsujii chain: `self^(2^k - 1)` is built up along the
    /// bits of `k = BITS - 1` (doubling `k` costs `k` squarings and one product, incrementing it
    /// costs one squaring and one product), and a final squaring yields `self^(2^BITS - 2)`.
    /// The chain depends only on `BITS`.
    ///
    /// Zero has no inverse; `Gf::ZERO.invert()` returns `Gf::ZERO`.
    #[must_use]
    pub fn invert(self) -> Self {
        let n = M::BITS - 1;
        let mut beta = self;
        let mut k = 1;
        for i in (0..n.ilog2()).rev() {
            beta = beta.square_n(k) * beta;
            k *= 2;
            if (n >> i) & 1 == 1 {
                beta = beta.square() * self;
                k += 1;
            }
        }
        debug_assert_eq!(k, n);
        beta.square()
    }
}

impl<M: Modulus> fmt::Debug for Gf<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#x})", M::NAME, self.value)
    }
}

impl<M: Modulus> From<Gf<M>> for u16 {
    fn from(x: Gf<M>) -> u16 {
        x.value
    }
}

impl<M: Modulus> Add for Gf<M> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_reduced(self.value ^ rhs.value)
    }
}

impl<M: Modulus> AddAssign for Gf<M> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

// Characteristic 2: subtraction and negation coincide with addition and identity.
#[allow(clippy::suspicious_arithmetic_impl)]
impl<M: Modulus> Sub for Gf<M> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + rhs
    }
}

impl<M: Modulus> SubAssign for Gf<M> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<M: Modulus> Neg for Gf<M> {
    type Output = Self;

    fn neg(self) -> Self {
        self
    }
}

impl<M: Modulus> Mul for Gf<M> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::reduce(Self::clmul(
            u32::from(self.value),
            u32::from(rhs.value),
            M::BITS,
        ))
    }
}

impl<M: Modulus> MulAssign for Gf<M> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// `a / b = a * b^-1`.  Division by zero yields zero.
#[allow(clippy::suspicious_arithmetic_impl)]
impl<M: Modulus> Div for Gf<M> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        rhs.invert() * self
    }
}

impl<M: Modulus> ConstantTimeEq for Gf<M> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.value.ct_eq(&other.value)
    }
}

impl<M: Modulus> ConditionallySelectable for Gf<M> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self::from_reduced(u16::conditional_select(&a.value, &b.value, choice))
    }
}

#[cfg(feature = "zeroize")]
impl<M: Modulus> zeroize::DefaultIsZeroes for Gf<M> {}

#[cfg(test)]
mod test {
    use super::*;

    /// Schoolbook multiplication followed by long division, as an independent reference.
    fn reference_mul<M: Modulus>(a: u16, b: u16) -> u16 {
        let mut product = 0u32;
        for i in 0..16 {
            if (b >> i) & 1 == 1 {
                product ^= u32::from(a) << i;
            }
        }

        let modulus = (1 << M::BITS) | M::TAIL;
        for deg in (M::BITS..32).rev() {
            if (product >> deg) & 1 == 1 {
                product ^= modulus << (deg - M::BITS);
            }
        }
        u16::truncate(product)
    }

    fn exhaustive_laws<M: Modulus>() {
        for a in 0..(1u16 << M::BITS) {
            let x = Gf::<M>::new(a);
            assert_eq!(x.square(), x * x, "{x:?}");
            assert_eq!(x + x, Gf::ZERO);
            assert_eq!(x + Gf::ZERO, x);
            assert_eq!(x * Gf::ONE, x);
            if a != 0 {
                assert_eq!(x * x.invert(), Gf::ONE, "{x:?}");
            }
        }
    }

    #[test]
    fn gf4096_laws() {
        exhaustive_laws::<Poly4096>();
    }

    #[test]
    fn gf8192_laws() {
        exhaustive_laws::<Poly8192>();
    }

    #[test]
    fn gf16_laws() {
        exhaustive_laws::<Poly16>();
    }

    #[test]
    fn gf16_matches_reference() {
        for a in 0..16 {
            for b in 0..16 {
                let (x, y) = (Gf16::new(a), Gf16::new(b));
                assert_eq!((x * y).value(), reference_mul::<Poly16>(a, b));
                if b != 0 {
                    assert_eq!((x / y) * y, x);
                }
            }
        }
    }

    #[test]
    fn random_products_match_reference() {
        use rand::Rng;

        let mut rng = rand::rng();
        for _ in 0..10_000 {
            let (a, b) = (rng.random::<u16>() & 0xfff, rng.random::<u16>() & 0xfff);
            assert_eq!(
                (Gf4096::new(a) * Gf4096::new(b)).value(),
                reference_mul::<Poly4096>(a, b)
            );

            let (a, b) = (rng.random::<u16>() & 0x1fff, rng.random::<u16>() & 0x1fff);
            let (x, y) = (Gf8192::new(a), Gf8192::new(b));
            assert_eq!((x * y).value(), reference_mul::<Poly8192>(a, b));
            if b != 0 {
                assert_eq!((x / y) * y, x);
            }
        }
    }

    #[test]
    fn zero_has_zero_inverse() {
        assert_eq!(Gf4096::ZERO.invert(), Gf4096::ZERO);
        assert_eq!(Gf8192::ZERO.invert(), Gf8192::ZERO);
        assert_eq!(Gf16::ZERO.invert(), Gf16::ZERO);
        assert_eq!(Gf4096::new(7) / Gf4096::ZERO, Gf4096::ZERO);
    }

    #[test]
    fn new_discards_high_bits() {
        assert_eq!(Gf4096::new(0xf805).value(), 0x805);
        assert_eq!(Gf16::new(0x13), Gf16::new(3));
    }

    #[test]
    fn constant_time_helpers() {
        let a = Gf4096::new(0x805);
        let b = Gf4096::new(0x123);
        assert!(bool::from(a.ct_eq(&a)));
        assert!(!bool::from(a.ct_eq(&b)));
        assert_eq!(Gf4096::conditional_select(&a, &b, Choice::from(0)), a);
        assert_eq!(Gf4096::conditional_select(&a, &b, Choice::from(1)), b);
    }
}
