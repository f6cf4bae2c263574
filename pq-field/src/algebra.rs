use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};
use hybrid_array::{Array, ArraySize, typenum::U256};

use crate::prime::{Elem, Field};

/// A polynomial of degree below 256 over `Z_q`, i.e. an element of `R_q = Z_q[X] / (X^256 + 1)`
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Polynomial<F: Field>(pub Array<Elem<F>, U256>);

impl<F: Field> Polynomial<F> {
    /// Wrap an array of coefficients, constant term first.
    pub const fn new(x: Array<Elem<F>, U256>) -> Self {
        Self(x)
    }
}

impl<F: Field> Add<&Polynomial<F>> for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn add(self, rhs: &Polynomial<F>) -> Polynomial<F> {
        Polynomial(Array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl<F: Field> Sub<&Polynomial<F>> for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn sub(self, rhs: &Polynomial<F>) -> Polynomial<F> {
        Polynomial(Array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl<F: Field> Neg for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn neg(self) -> Polynomial<F> {
        Polynomial(Array::from_fn(|i| -self.0[i]))
    }
}

impl<F: Field> Mul<&Polynomial<F>> for Elem<F> {
    type Output = Polynomial<F>;

    fn mul(self, rhs: &Polynomial<F>) -> Polynomial<F> {
        Polynomial(Array::from_fn(|i| self * rhs.0[i]))
    }
}

/// A vector of `K` polynomials
#[derive(Clone, Default)]
pub struct Vector<F: Field, K: ArraySize>(pub Array<Polynomial<F>, K>);

impl<F: Field, K: ArraySize> Vector<F, K> {
    /// Wrap an array of polynomials.
    pub const fn new(x: Array<Polynomial<F>, K>) -> Self {
        Self(x)
    }
}

// Not derived: a derive would bound `K: PartialEq + Debug`, which `ArraySize` lacks.
impl<F: Field, K: ArraySize> PartialEq for Vector<F, K> {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl<F: Field, K: ArraySize> Eq for Vector<F, K> {}

impl<F: Field, K: ArraySize> fmt::Debug for Vector<F, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vector").field(&self.0.as_slice()).finish()
    }
}

impl<F: Field, K: ArraySize> Add<&Vector<F, K>> for &Vector<F, K> {
    type Output = Vector<F, K>;

    fn add(self, rhs: &Vector<F, K>) -> Vector<F, K> {
        Vector(Array::from_fn(|i| &self.0[i] + &rhs.0[i]))
    }
}

/// A polynomial in the NTT domain: the evaluations of a polynomial in `R_q`, as used by the
/// NTT of the scheme that owns the field.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct NttPolynomial<F: Field>(pub Array<Elem<F>, U256>);

impl<F: Field> NttPolynomial<F> {
    /// Wrap an array of NTT-domain coefficients.
    pub const fn new(x: Array<Elem<F>, U256>) -> Self {
        Self(x)
    }
}

impl<F: Field> From<Array<Elem<F>, U256>> for NttPolynomial<F> {
    fn from(x: Array<Elem<F>, U256>) -> Self {
        Self(x)
    }
}

impl<F: Field> From<NttPolynomial<F>> for Array<Elem<F>, U256> {
    fn from(x: NttPolynomial<F>) -> Self {
        x.0
    }
}

impl<F: Field> Add<&NttPolynomial<F>> for &NttPolynomial<F> {
    type Output = NttPolynomial<F>;

    fn add(self, rhs: &NttPolynomial<F>) -> NttPolynomial<F> {
        NttPolynomial(Array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl<F: Field> Sub<&NttPolynomial<F>> for &NttPolynomial<F> {
    type Output = NttPolynomial<F>;

    fn sub(self, rhs: &NttPolynomial<F>) -> NttPolynomial<F> {
        NttPolynomial(Array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

/// Multiplication in the NTT domain depends on the shape of the transform, so each field that
/// supports it supplies its own.
pub trait MultiplyNtt: Field {
    /// The NTT-domain product of `lhs` and `rhs`
    fn multiply_ntt(lhs: &NttPolynomial<Self>, rhs: &NttPolynomial<Self>) -> NttPolynomial<Self>;
}

impl<F: MultiplyNtt> Mul<&NttPolynomial<F>> for &NttPolynomial<F> {
    type Output = NttPolynomial<F>;

    fn mul(self, rhs: &NttPolynomial<F>) -> NttPolynomial<F> {
        F::multiply_ntt(self, rhs)
    }
}

/// A vector of `K` NTT-domain polynomials
#[derive(Clone, Default)]
pub struct NttVector<F: Field, K: ArraySize>(pub Array<NttPolynomial<F>, K>);

impl<F: Field, K: ArraySize> NttVector<F, K> {
    /// Wrap an array of NTT-domain polynomials.
    pub const fn new(x: Array<NttPolynomial<F>, K>) -> Self {
        Self(x)
    }
}

impl<F: Field, K: ArraySize> PartialEq for NttVector<F, K> {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl<F: Field, K: ArraySize> Eq for NttVector<F, K> {}

impl<F: Field, K: ArraySize> fmt::Debug for NttVector<F, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NttVector").field(&self.0.as_slice()).finish()
    }
}

impl<F: Field, K: ArraySize> Add<&NttVector<F, K>> for &NttVector<F, K> {
    type Output = NttVector<F, K>;

    fn add(self, rhs: &NttVector<F, K>) -> NttVector<F, K> {
        NttVector(Array::from_fn(|i| &self.0[i] + &rhs.0[i]))
    }
}

/// Dot product
impl<F: MultiplyNtt, K: ArraySize> Mul<&NttVector<F, K>> for &NttVector<F, K> {
    type Output = NttPolynomial<F>;

    fn mul(self, rhs: &NttVector<F, K>) -> NttPolynomial<F> {
        self.0
            .iter()
            .zip(rhs.0.iter())
            .fold(NttPolynomial::default(), |acc, (x, y)| &acc + &(x * y))
    }
}

#[cfg(feature = "zeroize")]
mod zeroize_impls {
    use super::{ArraySize, Field, NttPolynomial, NttVector, Polynomial, Vector};
    use zeroize::Zeroize;

    impl<F: Field> Zeroize for Polynomial<F> {
        fn zeroize(&mut self) {
            self.0.iter_mut().for_each(Zeroize::zeroize);
        }
    }

    impl<F: Field> Zeroize for NttPolynomial<F> {
        fn zeroize(&mut self) {
            self.0.iter_mut().for_each(Zeroize::zeroize);
        }
    }

    impl<F: Field, K: ArraySize> Zeroize for Vector<F, K> {
        fn zeroize(&mut self) {
            self.0.iter_mut().for_each(Zeroize::zeroize);
        }
    }

    impl<F: Field, K: ArraySize> Zeroize for NttVector<F, K> {
        fn zeroize(&mut self) {
            self.0.iter_mut().for_each(Zeroize::zeroize);
        }
    }
}
