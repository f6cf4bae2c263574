use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Neg, Sub};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// A prime-order field `Z_q`.  Implementations are generated with [`define_field!`].
pub trait Field: Copy + Default + Debug + PartialEq + Eq + Send + Sync + 'static {
    /// Integer type holding one reduced element
    type Int: Copy
        + Default
        + Debug
        + PartialEq
        + Eq
        + PartialOrd
        + From<u8>
        + Send
        + Sync
        + ConditionallySelectable
        + ConstantTimeEq;

    /// Integer type wide enough for the product of two elements
    type Long: Copy + Debug + From<Self::Int>;

    /// The modulus
    const Q: Self::Int;

    /// `q - 2`; raising a nonzero element to this power inverts it
    const INVERSION_EXPONENT: u64;

    /// Reduce `x < 2q` into `[0, q)`.
    fn small_reduce(x: Self::Int) -> Self::Int;

    /// Reduce any `x` into `[0, q)`.
    fn barrett_reduce(x: Self::Long) -> Self::Int;

    /// `a + b mod q` for reduced `a`, `b`
    fn add(a: Self::Int, b: Self::Int) -> Self::Int;

    /// `a - b mod q` for reduced `a`, `b`
    fn sub(a: Self::Int, b: Self::Int) -> Self::Int;

    /// `a * b mod q` for reduced `a`, `b`
    fn mul(a: Self::Int, b: Self::Int) -> Self::Int;
}

/// Define a prime-order field.
///
/// `define_field!(Name, Int, Long, LongLong, q)` declares a unit struct `Name` implementing
/// [`Field`] for the modulus `q`.  `Int` must hold `2q`, `Long` the product of two elements and
/// `LongLong` the product of a `Long` with `2^bits(Long) / q`.  Reductions are constant time.
#[macro_export]
macro_rules! define_field {
    ($field:ident, $int:ty, $long:ty, $longlong:ty, $q:literal) => {
        #[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
        pub struct $field;

        #[allow(dead_code)]
        impl $field {
            /// The modulus
            pub const Q: $int = $q;
            /// The modulus, as a `Long`
            pub const QL: $long = $q;
            /// The modulus, as a `LongLong`
            pub const QLL: $longlong = $q;

            const BARRETT_SHIFT: u32 = <$long>::BITS;
            #[allow(clippy::integer_division_remainder_used)]
            const BARRETT_MULTIPLIER: $longlong = (1 << Self::BARRETT_SHIFT) / Self::QLL;

            /// Reduce `x < 2q` into `[0, q)`.
            #[must_use]
            pub fn small_reduce(x: $int) -> $int {
                let diff = x.wrapping_sub(Self::Q);
                // All ones when the subtraction wrapped, i.e. when `x < q`.
                let borrow = (diff >> (<$int>::BITS - 1)).wrapping_neg();
                diff.wrapping_add(Self::Q & borrow)
            }

            /// Reduce any `x` into `[0, q)`.
            #[must_use]
            pub fn barrett_reduce(x: $long) -> $int {
                let x = <$longlong>::from(x);
                let quotient = (x * Self::BARRETT_MULTIPLIER) >> Self::BARRETT_SHIFT;
                let remainder = x - quotient * Self::QLL;
                Self::small_reduce(<$int as $crate::Truncate<$longlong>>::truncate(remainder))
            }
        }

        impl $crate::Field for $field {
            type Int = $int;
            type Long = $long;

            const Q: $int = $q;
            const INVERSION_EXPONENT: u64 = $q - 2;

            fn small_reduce(x: $int) -> $int {
                $field::small_reduce(x)
            }

            fn barrett_reduce(x: $long) -> $int {
                $field::barrett_reduce(x)
            }

            fn add(a: $int, b: $int) -> $int {
                $field::small_reduce(a + b)
            }

            fn sub(a: $int, b: $int) -> $int {
                $field::small_reduce(a + $field::Q - b)
            }

            fn mul(a: $int, b: $int) -> $int {
                $field::barrett_reduce(<$long>::from(a) * <$long>::from(b))
            }
        }
    };
}

/// An element of `Z_q`, always in `[0, q)`
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Elem<F: Field>(pub F::Int);

impl<F: Field> Elem<F> {
    /// Wrap an already reduced integer.
    pub const fn new(x: F::Int) -> Self {
        Self(x)
    }

    /// `self^exp`.  The exponent is public; the base is not inspected.
    #[must_use]
    pub fn pow(self, exp: u64) -> Self {
        let mut acc = Self(F::Int::from(1u8));
        for i in (0..u64::BITS - exp.leading_zeros()).rev() {
            acc = acc * acc;
            if (exp >> i) & 1 == 1 {
                acc = acc * self;
            }
        }
        acc
    }

    /// Multiplicative inverse by Fermat's little theorem.  Zero maps to zero.
    #[must_use]
    pub fn invert(self) -> Self {
        self.pow(F::INVERSION_EXPONENT)
    }
}

impl<F: Field> Add<Elem<F>> for Elem<F> {
    type Output = Elem<F>;

    fn add(self, rhs: Elem<F>) -> Elem<F> {
        Elem(F::add(self.0, rhs.0))
    }
}

impl<F: Field> Sub<Elem<F>> for Elem<F> {
    type Output = Elem<F>;

    fn sub(self, rhs: Elem<F>) -> Elem<F> {
        Elem(F::sub(self.0, rhs.0))
    }
}

impl<F: Field> Neg for Elem<F> {
    type Output = Elem<F>;

    fn neg(self) -> Elem<F> {
        Elem(F::sub(F::Int::default(), self.0))
    }
}

impl<F: Field> Mul<Elem<F>> for Elem<F> {
    type Output = Elem<F>;

    fn mul(self, rhs: Elem<F>) -> Elem<F> {
        Elem(F::mul(self.0, rhs.0))
    }
}

/// Division by zero yields zero.
#[allow(clippy::suspicious_arithmetic_impl)]
impl<F: Field> Div<Elem<F>> for Elem<F> {
    type Output = Elem<F>;

    fn div(self, rhs: Elem<F>) -> Elem<F> {
        self * rhs.invert()
    }
}

impl<F: Field> ConstantTimeEq for Elem<F> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl<F: Field> ConditionallySelectable for Elem<F> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Elem(F::Int::conditional_select(&a.0, &b.0, choice))
    }
}

#[cfg(feature = "zeroize")]
impl<F: Field> zeroize::DefaultIsZeroes for Elem<F> {}

#[cfg(test)]
mod test {
    use super::*;

    crate::define_field!(SmallField, u16, u32, u64, 3329);

    type E = Elem<SmallField>;

    #[test]
    fn arithmetic_wraps_mod_q() {
        assert_eq!(E::new(3000) + E::new(1000), E::new(671));
        assert_eq!(E::new(5) - E::new(7), E::new(3327));
        assert_eq!(-E::new(1), E::new(3328));
        assert_eq!(-E::new(0), E::new(0));
        assert_eq!(E::new(3328) * E::new(3328), E::new(1));
        assert_eq!(E::new(17).pow(128), E::new(3328));
    }

    #[test]
    fn inverse_and_division() {
        assert_eq!(E::new(128).invert(), E::new(3303));
        assert_eq!(E::new(0).invert(), E::new(0));
        for x in 1..SmallField::Q {
            let x = E::new(x);
            assert_eq!(x * x.invert(), E::new(1));
            assert_eq!((E::new(1234) / x) * x, E::new(1234));
        }
    }

    #[test]
    fn modulus_in_every_width() {
        assert_eq!(u32::from(SmallField::Q), SmallField::QL);
        assert_eq!(u64::from(SmallField::QL), SmallField::QLL);
        assert_eq!(<SmallField as Field>::Q, SmallField::Q);
    }

    #[test]
    #[allow(clippy::integer_division_remainder_used)]
    fn barrett_matches_remainder() {
        for x in [0, 1, 3328, 3329, 6657, 6658, 11_082_241, 22_164_480, u32::MAX] {
            assert_eq!(u32::from(SmallField::barrett_reduce(x)), x % 3329);
        }
    }
}
