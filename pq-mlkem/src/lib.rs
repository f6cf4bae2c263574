#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![allow(non_snake_case)] // Allow notation matching FIPS 203
#![deny(missing_docs)] // Require all public interfaces to be documented
#![warn(clippy::pedantic)] // Be pedantic by default
#![warn(clippy::integer_division_remainder_used)] // Be judicious about using `/` and `%`

//! # Usage
//!
//! Every parameter set is available both as a typed API and as a [`pq_kem::Scheme`] trait
//! object.
//!
//! ```
//! use pq_mlkem::ml_kem_768::DecapsulationKey;
//!
//! let mut rng = rand::rng();
//! let dk = DecapsulationKey::generate(&mut rng)?;
//! let ek = dk.encapsulation_key();
//!
//! // Encapsulate a shared key to the holder of `dk`.
//! let (ct, k_send) = ek.encapsulate(&mut rng)?;
//!
//! // Decapsulate it again.
//! let k_recv = dk.decapsulate(&ct)?;
//! assert_eq!(k_send, k_recv);
//! # Ok::<(), pq_mlkem::Error>(())
//! ```
//!
//! ```
//! use pq_kem::Scheme;
//!
//! let scheme: &dyn Scheme = &pq_mlkem::ML_KEM_512;
//! let (pk, sk) = scheme.derive_key(&[0u8; 64])?;
//! let (ct, ss) = scheme.encapsulate_deterministically(pk.as_ref(), &[0u8; 32])?;
//! assert_eq!(ct.len(), scheme.ciphertext_size());
//! assert_eq!(scheme.decapsulate(sk.as_ref(), &ct)?, ss);
//! # Ok::<(), pq_mlkem::Error>(())
//! ```

extern crate alloc;

/// Section 4.3. The Number-Theoretic Transform, and the samplers of Section 4.2.2
mod algebra;

/// Section 4.1. Cryptographic Functions
mod crypto;

/// Section 4.2.1. Compression and decompression
mod compress;

/// Section 4.2.1. Encoding and decoding
mod encode;

/// Section 5. The K-PKE Component Scheme
mod pke;

/// Section 6. The ML-KEM Key-Encapsulation Mechanism
pub mod kem;

/// Section 8. Parameter Sets
mod param;

use hybrid_array::{
    Array,
    typenum::{U2, U3, U4, U5, U10, U11, U32},
};

pub use hybrid_array as array;
pub use kem::{ENCAPSULATION_SEED_SIZE, MlKem, SEED_SIZE, SHARED_KEY_SIZE, Seed, SharedKey};
pub use ml_kem_512::MlKem512Params;
pub use ml_kem_768::MlKem768Params;
pub use ml_kem_1024::MlKem1024Params;
pub use param::{ArraySize, CbdSamplingSize, EncodingSize, KemParams, ParameterSet};
pub use pq_kem::{Error, KemResult};

/// A 32-byte string: seeds, hashes, messages and shared keys
pub type B32 = Array<u8, U32>;

/// ML-KEM-512, security category 1
pub static ML_KEM_512: MlKem<MlKem512Params> = MlKem::new();

/// ML-KEM-768, security category 3
pub static ML_KEM_768: MlKem<MlKem768Params> = MlKem::new();

/// ML-KEM-1024, security category 5
pub static ML_KEM_1024: MlKem<MlKem1024Params> = MlKem::new();

/// ML-KEM-512 is the parameter set for security category 1, corresponding to key search on a
/// block cipher with a 128-bit key.
pub mod ml_kem_512 {
    use super::{ML_KEM_512, MlKem, ParameterSet, U2, U3, U4, U10, kem};

    /// Parameters of ML-KEM-512
    #[derive(Default, Clone, Debug, PartialEq, Eq)]
    pub struct MlKem512Params;

    impl ParameterSet for MlKem512Params {
        type K = U2;
        type Eta1 = U3;
        type Eta2 = U2;
        type Du = U10;
        type Dv = U4;

        const NAME: &'static str = "ML-KEM-512";

        fn scheme() -> &'static MlKem<Self> {
            &ML_KEM_512
        }
    }

    /// An ML-KEM-512 decapsulation key
    pub type DecapsulationKey = kem::DecapsulationKey<MlKem512Params>;

    /// An ML-KEM-512 encapsulation key
    pub type EncapsulationKey = kem::EncapsulationKey<MlKem512Params>;
}

/// ML-KEM-768 is the parameter set for security category 3, corresponding to key search on a
/// block cipher with a 192-bit key.
pub mod ml_kem_768 {
    use super::{ML_KEM_768, MlKem, ParameterSet, U2, U3, U4, U10, kem};

    /// Parameters of ML-KEM-768
    #[derive(Default, Clone, Debug, PartialEq, Eq)]
    pub struct MlKem768Params;

    impl ParameterSet for MlKem768Params {
        type K = U3;
        type Eta1 = U2;
        type Eta2 = U2;
        type Du = U10;
        type Dv = U4;

        const NAME: &'static str = "ML-KEM-768";

        fn scheme() -> &'static MlKem<Self> {
            &ML_KEM_768
        }
    }

    /// An ML-KEM-768 decapsulation key
    pub type DecapsulationKey = kem::DecapsulationKey<MlKem768Params>;

    /// An ML-KEM-768 encapsulation key
    pub type EncapsulationKey = kem::EncapsulationKey<MlKem768Params>;
}

/// ML-KEM-1024 is the parameter set for security category 5, corresponding to key search on a
/// block cipher with a 256-bit key.
pub mod ml_kem_1024 {
    use super::{ML_KEM_1024, MlKem, ParameterSet, U2, U4, U5, U11, kem};

    /// Parameters of ML-KEM-1024
    #[derive(Default, Clone, Debug, PartialEq, Eq)]
    pub struct MlKem1024Params;

    impl ParameterSet for MlKem1024Params {
        type K = U4;
        type Eta1 = U2;
        type Eta2 = U2;
        type Du = U11;
        type Dv = U5;

        const NAME: &'static str = "ML-KEM-1024";

        fn scheme() -> &'static MlKem<Self> {
            &ML_KEM_1024
        }
    }

    /// An ML-KEM-1024 decapsulation key
    pub type DecapsulationKey = kem::DecapsulationKey<MlKem1024Params>;

    /// An ML-KEM-1024 encapsulation key
    pub type EncapsulationKey = kem::EncapsulationKey<MlKem1024Params>;
}
