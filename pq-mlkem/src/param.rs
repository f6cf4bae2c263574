//! Compile-time description of the ML-KEM parameter sets.
//!
//! `ParameterSet` captures the parameters in the form FIPS 203 lists them.  `EncodingSize` and
//! `CbdSamplingSize` are "upstream" of it and describe single polynomials; `KemParams` is
//! "downstream" and derives the byte lengths of every encoded object, so that the rest of the
//! crate never recomputes a size by hand.

use core::fmt::Debug;
use hybrid_array::typenum::{U1, U2, U3, U4, U5, U6, U10, U11, U12, Unsigned};

pub use hybrid_array::ArraySize;

use crate::kem::MlKem;

/// A number of bits used to encode each coefficient of a polynomial
pub trait EncodingSize: Unsigned + Send + Sync + 'static {
    /// Length of one encoded polynomial
    const ENCODED_POLYNOMIAL_SIZE: usize = 32 * Self::USIZE;
}

impl EncodingSize for U1 {}
impl EncodingSize for U4 {}
impl EncodingSize for U5 {}
impl EncodingSize for U6 {}
impl EncodingSize for U10 {}
impl EncodingSize for U11 {}
impl EncodingSize for U12 {}

/// A parameter `η` of the centered binomial distribution
pub trait CbdSamplingSize: Unsigned + Send + Sync + 'static {
    /// Bits consumed per sampled coefficient, `2η`
    type SampleSize: EncodingSize;

    /// Length of the PRF output needed for one polynomial, `64η`
    const PRF_OUTPUT_SIZE: usize = 64 * Self::USIZE;
}

impl CbdSamplingSize for U2 {
    type SampleSize = U4;
}

impl CbdSamplingSize for U3 {
    type SampleSize = U6;
}

/// An ML-KEM parameter set
pub trait ParameterSet: Default + Clone + Debug + PartialEq + Eq + Send + Sync + 'static {
    /// The dimension of the module, `k`
    type K: ArraySize;

    /// Noise parameter for the secret and error vectors of key generation and the randomness
    /// vector of encryption, `η1`
    type Eta1: CbdSamplingSize;

    /// Noise parameter for the error terms of encryption, `η2`
    type Eta2: CbdSamplingSize;

    /// Compression bits for the vector part of the ciphertext, `d_u`
    type Du: EncodingSize;

    /// Compression bits for the scalar part of the ciphertext, `d_v`
    type Dv: EncodingSize;

    /// Name of the parameter set
    const NAME: &'static str;

    /// The scheme instance for this parameter set
    fn scheme() -> &'static MlKem<Self>;
}

/// Byte lengths derived from a [`ParameterSet`]
pub trait KemParams: ParameterSet {
    /// Length of an encoded vector of NTT polynomials with 12-bit coefficients
    const T_HAT_SIZE: usize = 384 * <Self::K as Unsigned>::USIZE;

    /// Length of a K-PKE decryption key
    const DECRYPTION_KEY_SIZE: usize = Self::T_HAT_SIZE;

    /// Length of an encapsulation (public) key
    const ENCAPSULATION_KEY_SIZE: usize = Self::T_HAT_SIZE + 32;

    /// Length of an expanded decapsulation (private) key
    const DECAPSULATION_KEY_SIZE: usize =
        Self::DECRYPTION_KEY_SIZE + Self::ENCAPSULATION_KEY_SIZE + 64;

    /// Length of the compressed vector `u` in a ciphertext
    const U_SIZE: usize = <Self::Du as EncodingSize>::ENCODED_POLYNOMIAL_SIZE
        * <Self::K as Unsigned>::USIZE;

    /// Length of a ciphertext
    const CIPHERTEXT_SIZE: usize =
        Self::U_SIZE + <Self::Dv as EncodingSize>::ENCODED_POLYNOMIAL_SIZE;
}

impl<P: ParameterSet> KemParams for P {}
