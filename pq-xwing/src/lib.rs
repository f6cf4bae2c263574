#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]

//! # Usage
//!
//! ```
//! use pq_xwing::DecapsulationKey;
//!
//! let mut rng = rand::rng();
//! let sk = DecapsulationKey::generate(&mut rng)?;
//! let pk = sk.encapsulation_key();
//!
//! let (ct, ss_sender) = pk.encapsulate(&mut rng)?;
//! let ss_receiver = sk.decapsulate(&ct)?;
//! assert_eq!(ss_sender, ss_receiver);
//! # Ok::<(), pq_xwing::Error>(())
//! ```

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt::{self, Debug};
use pq_kem::{Entropy, KeyPair, PrivateKey, PublicKey, Scheme};
use pq_mlkem::{B32, ml_kem_768};
use sha3::{
    Digest, Sha3_256, Shake256,
    digest::{ExtendableOutput, Update, XofReader},
};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

pub use pq_kem::{Error, KemResult};

const X_WING_LABEL: &[u8; 6] = br"\.//^\";

const ML_KEM_PUBLIC_KEY_SIZE: usize = 1184;
const ML_KEM_CIPHERTEXT_SIZE: usize = 1088;

/// Size in bytes of an encapsulation key, `pk_M ‖ pk_X`
pub const ENCAPSULATION_KEY_SIZE: usize = ML_KEM_PUBLIC_KEY_SIZE + 32;
/// Size in bytes of a decapsulation key, which is the seed it expands from
pub const DECAPSULATION_KEY_SIZE: usize = 32;
/// Size in bytes of a ciphertext, `ct_M ‖ ct_X`
pub const CIPHERTEXT_SIZE: usize = ML_KEM_CIPHERTEXT_SIZE + 32;
/// Size in bytes of a shared key
pub const SHARED_KEY_SIZE: usize = 32;
/// Number of random bytes consumed by encapsulation: 32 for ML-KEM, then 32 for X25519
pub const ENCAPSULATION_RANDOMNESS_SIZE: usize = 64;

/// Shared secret key
pub type SharedKey = B32;

// Variable names follow the draft.
// ss -> shared secret, ct -> ciphertext, ek -> ephemeral key, pk -> public key, sk -> secret key
// Postfixes: _m -> ML-KEM-768, _x -> X25519

fn check_length(expected: usize, actual: usize, err: fn(usize, usize) -> Error) -> KemResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(err(expected, actual))
    }
}

/// X-Wing encapsulation (public) key
#[derive(Clone, PartialEq)]
pub struct EncapsulationKey {
    pk_m: ml_kem_768::EncapsulationKey,
    pk_x: X25519PublicKey,
}

impl EncapsulationKey {
    /// Parse `pk_M ‖ pk_X`.
    ///
    /// # Errors
    /// - [`Error::BadKeyLength`] unless `bytes` is [`ENCAPSULATION_KEY_SIZE`] long
    /// - [`Error::InvalidPublicKey`] if the ML-KEM part fails its modulus check
    pub fn from_bytes(bytes: &[u8]) -> KemResult<Self> {
        check_length(ENCAPSULATION_KEY_SIZE, bytes.len(), |expected, actual| {
            Error::BadKeyLength { expected, actual }
        })?;

        let (m_bytes, x_bytes) = bytes.split_at(ML_KEM_PUBLIC_KEY_SIZE);
        let pk_m = ml_kem_768::EncapsulationKey::from_bytes(m_bytes)?;
        let pk_x = X25519PublicKey::from(read_32(x_bytes));
        Ok(Self { pk_m, pk_x })
    }

    /// The encoding `pk_M ‖ pk_X`
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.pk_m.to_bytes();
        out.extend_from_slice(self.pk_x.as_bytes());
        out
    }

    /// Encapsulate with the given randomness: the first 32 bytes for ML-KEM, the last 32 bytes as
    /// the ephemeral X25519 secret.
    ///
    /// Reusing randomness across calls is catastrophic; this exists for known-answer tests and
    /// for callers that manage their own entropy.
    #[must_use]
    pub fn encapsulate_deterministic(
        &self,
        randomness: &[u8; ENCAPSULATION_RANDOMNESS_SIZE],
    ) -> (Vec<u8>, SharedKey) {
        let (rand_m, rand_x) = randomness.split_at(32);

        let mut m = B32::default();
        m.copy_from_slice(rand_m);
        let (mut ct, ss_m) = self.pk_m.encapsulate_deterministic(&m);

        let ek_x = StaticSecret::from(read_32(rand_x));
        // ct_x = x25519(ek_x, base point)
        let ct_x = X25519PublicKey::from(&ek_x);
        // ss_x = x25519(ek_x, pk_x)
        let ss_x = ek_x.diffie_hellman(&self.pk_x);

        let ss = combiner(&ss_m, ss_x.as_bytes(), ct_x.as_bytes(), &self.pk_x);
        ct.extend_from_slice(ct_x.as_bytes());
        (ct, ss)
    }

    /// Encapsulate a fresh shared key, drawing [`ENCAPSULATION_RANDOMNESS_SIZE`] bytes from
    /// `rng`.
    ///
    /// # Errors
    /// [`Error::EntropyUnavailable`] if `rng` fails.
    pub fn encapsulate(
        &self,
        rng: &mut (impl Entropy + ?Sized),
    ) -> KemResult<(Vec<u8>, SharedKey)> {
        let mut randomness = [0u8; ENCAPSULATION_RANDOMNESS_SIZE];
        rng.try_fill(&mut randomness)?;
        let res = self.encapsulate_deterministic(&randomness);

        #[cfg(feature = "zeroize")]
        zeroize::Zeroize::zeroize(&mut randomness);

        Ok(res)
    }
}

impl Debug for EncapsulationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncapsulationKey")
            .field("scheme", &XWing::NAME)
            .field("len", &ENCAPSULATION_KEY_SIZE)
            .finish()
    }
}

/// X-Wing decapsulation (private) key.  It is stored as its 32-byte seed together with the
/// expanded component keys.
#[derive(Clone)]
pub struct DecapsulationKey {
    sk: [u8; DECAPSULATION_KEY_SIZE],
    sk_m: ml_kem_768::DecapsulationKey,
    sk_x: StaticSecret,
    ek: EncapsulationKey,
}

impl DecapsulationKey {
    /// Expand a 32-byte seed: `SHAKE256(sk, 96)` yields the ML-KEM-768 seed followed by the
    /// X25519 secret.
    ///
    /// # Errors
    /// [`Error::BadSeedLength`] unless `sk` is [`DECAPSULATION_KEY_SIZE`] bytes.
    pub fn from_seed(sk: &[u8]) -> KemResult<Self> {
        check_length(DECAPSULATION_KEY_SIZE, sk.len(), |expected, actual| {
            Error::BadSeedLength { expected, actual }
        })?;

        let mut shaker = Shake256::default();
        shaker.update(sk);
        let mut expanded = shaker.finalize_xof();

        let mut seed_m = [0u8; 64];
        expanded.read(&mut seed_m);
        let sk_m = ml_kem_768::DecapsulationKey::from_seed(&seed_m)?;

        let mut seed_x = [0u8; 32];
        expanded.read(&mut seed_x);
        let sk_x = StaticSecret::from(seed_x);

        #[cfg(feature = "zeroize")]
        {
            zeroize::Zeroize::zeroize(&mut seed_m);
            zeroize::Zeroize::zeroize(&mut seed_x);
        }

        let ek = EncapsulationKey {
            pk_m: sk_m.encapsulation_key().clone(),
            pk_x: X25519PublicKey::from(&sk_x),
        };

        Ok(Self {
            sk: read_32(sk),
            sk_m,
            sk_x,
            ek,
        })
    }

    /// Generate a key from [`DECAPSULATION_KEY_SIZE`] bytes of `rng`.
    ///
    /// # Errors
    /// [`Error::EntropyUnavailable`] if `rng` fails.
    pub fn generate(rng: &mut (impl Entropy + ?Sized)) -> KemResult<Self> {
        let mut sk = [0u8; DECAPSULATION_KEY_SIZE];
        rng.try_fill(&mut sk)?;
        let dk = Self::from_seed(&sk);

        #[cfg(feature = "zeroize")]
        zeroize::Zeroize::zeroize(&mut sk);

        dk
    }

    /// Private key as bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; DECAPSULATION_KEY_SIZE] {
        &self.sk
    }

    /// The matching encapsulation key
    #[must_use]
    pub fn encapsulation_key(&self) -> &EncapsulationKey {
        &self.ek
    }

    /// Recover the shared key from `ct_M ‖ ct_X`.  A tampered ML-KEM part is implicitly
    /// rejected, so any ciphertext of the right length yields a key.
    ///
    /// # Errors
    /// [`Error::BadCiphertextLength`] unless `ct` is [`CIPHERTEXT_SIZE`] bytes.
    #[allow(clippy::similar_names)] // So we can use the names as in the draft
    pub fn decapsulate(&self, ct: &[u8]) -> KemResult<SharedKey> {
        check_length(CIPHERTEXT_SIZE, ct.len(), |expected, actual| {
            Error::BadCiphertextLength { expected, actual }
        })?;

        let (ct_m, ct_x) = ct.split_at(ML_KEM_CIPHERTEXT_SIZE);
        let ss_m = self.sk_m.decapsulate(ct_m)?;

        let ct_x = X25519PublicKey::from(read_32(ct_x));
        // ss_x = x25519(sk_x, ct_x)
        let ss_x = self.sk_x.diffie_hellman(&ct_x);

        Ok(combiner(&ss_m, ss_x.as_bytes(), ct_x.as_bytes(), &self.ek.pk_x))
    }
}

impl Debug for DecapsulationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecapsulationKey")
            .field("scheme", &XWing::NAME)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "zeroize")]
impl Drop for DecapsulationKey {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.sk);
    }
}

#[cfg(feature = "zeroize")]
impl zeroize::ZeroizeOnDrop for DecapsulationKey {}

fn combiner(ss_m: &B32, ss_x: &[u8; 32], ct_x: &[u8; 32], pk_x: &X25519PublicKey) -> SharedKey {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, ss_m);
    Digest::update(&mut hasher, ss_x);
    Digest::update(&mut hasher, ct_x);
    Digest::update(&mut hasher, pk_x.as_bytes());
    Digest::update(&mut hasher, X_WING_LABEL);

    let mut ss = SharedKey::default();
    ss.copy_from_slice(&hasher.finalize());
    ss
}

/// Copy a slice the caller has already checked to be 32 bytes long.
fn read_32(bytes: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(bytes);
    out
}

/// X-Wing as a [`Scheme`]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct XWing;

/// The X-Wing scheme
pub static X_WING: XWing = XWing;

impl XWing {
    /// Registry name of the scheme
    pub const NAME: &'static str = "X-Wing";
}

impl Scheme for XWing {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn public_key_size(&self) -> usize {
        ENCAPSULATION_KEY_SIZE
    }

    fn private_key_size(&self) -> usize {
        DECAPSULATION_KEY_SIZE
    }

    fn ciphertext_size(&self) -> usize {
        CIPHERTEXT_SIZE
    }

    fn shared_key_size(&self) -> usize {
        SHARED_KEY_SIZE
    }

    fn seed_size(&self) -> usize {
        DECAPSULATION_KEY_SIZE
    }

    fn encapsulation_seed_size(&self) -> usize {
        ENCAPSULATION_RANDOMNESS_SIZE
    }

    fn derive_key(&self, seed: &[u8]) -> KemResult<KeyPair> {
        let sk = DecapsulationKey::from_seed(seed)?;
        Ok((Box::new(sk.ek.clone()), Box::new(sk)))
    }

    fn encapsulate_deterministically(
        &self,
        pk: &dyn PublicKey,
        seed: &[u8],
    ) -> KemResult<(Vec<u8>, Vec<u8>)> {
        let randomness: &[u8; ENCAPSULATION_RANDOMNESS_SIZE] =
            seed.try_into().map_err(|_| Error::BadSeedLength {
                expected: ENCAPSULATION_RANDOMNESS_SIZE,
                actual: seed.len(),
            })?;
        let pk = pk.downcast_ref::<EncapsulationKey>()?;

        let (ct, ss) = pk.encapsulate_deterministic(randomness);
        Ok((ct, ss.to_vec()))
    }

    fn decapsulate(&self, sk: &dyn PrivateKey, ct: &[u8]) -> KemResult<Vec<u8>> {
        check_length(CIPHERTEXT_SIZE, ct.len(), |expected, actual| {
            Error::BadCiphertextLength { expected, actual }
        })?;
        let sk = sk.downcast_ref::<DecapsulationKey>()?;
        Ok(sk.decapsulate(ct)?.to_vec())
    }

    fn unmarshal_binary_public_key(&self, bytes: &[u8]) -> KemResult<Box<dyn PublicKey>> {
        Ok(Box::new(EncapsulationKey::from_bytes(bytes)?))
    }

    fn unmarshal_binary_private_key(&self, bytes: &[u8]) -> KemResult<Box<dyn PrivateKey>> {
        check_length(DECAPSULATION_KEY_SIZE, bytes.len(), |expected, actual| {
            Error::BadKeyLength { expected, actual }
        })?;
        Ok(Box::new(DecapsulationKey::from_seed(bytes)?))
    }
}

impl PublicKey for EncapsulationKey {
    fn scheme(&self) -> &'static dyn Scheme {
        &X_WING
    }

    fn marshal_binary(&self) -> Vec<u8> {
        self.to_bytes()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl PrivateKey for DecapsulationKey {
    fn scheme(&self) -> &'static dyn Scheme {
        &X_WING
    }

    fn marshal_binary(&self) -> Vec<u8> {
        self.sk.to_vec()
    }

    fn public_key(&self) -> Box<dyn PublicKey> {
        Box::new(self.ek.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let sk = DecapsulationKey::generate(&mut rng).unwrap();
        let pk = sk.encapsulation_key();

        let (ct, ss) = pk.encapsulate(&mut rng).unwrap();
        assert_eq!(ct.len(), CIPHERTEXT_SIZE);
        assert_eq!(sk.decapsulate(&ct).unwrap(), ss);

        let pk_b = EncapsulationKey::from_bytes(&pk.to_bytes()).unwrap();
        assert!(pk_b == *pk);

        let sk_b = DecapsulationKey::from_seed(sk.as_bytes()).unwrap();
        assert_eq!(sk_b.decapsulate(&ct).unwrap(), ss);
    }

    #[test]
    fn tampering_changes_the_key() {
        let sk = DecapsulationKey::from_seed(&[7u8; 32]).unwrap();
        let (ct, ss) = sk.encapsulation_key().encapsulate_deterministic(&[9u8; 64]);

        // ML-KEM part: implicit rejection.
        let mut bad = ct.clone();
        bad[0] ^= 1;
        assert_ne!(sk.decapsulate(&bad).unwrap(), ss);

        // X25519 part: the combiner binds ct_X.
        let mut bad = ct;
        bad[CIPHERTEXT_SIZE - 1] ^= 1;
        assert_ne!(sk.decapsulate(&bad).unwrap(), ss);
    }

    #[test]
    fn length_checks() {
        assert_eq!(
            DecapsulationKey::from_seed(&[0u8; 31]).unwrap_err(),
            Error::BadSeedLength {
                expected: 32,
                actual: 31
            }
        );
        assert_eq!(
            EncapsulationKey::from_bytes(&[0u8; 1184]).unwrap_err(),
            Error::BadKeyLength {
                expected: 1216,
                actual: 1184
            }
        );

        let sk = DecapsulationKey::from_seed(&[0u8; 32]).unwrap();
        assert_eq!(
            sk.decapsulate(&[0u8; 1088]).unwrap_err(),
            Error::BadCiphertextLength {
                expected: 1120,
                actual: 1088
            }
        );
        assert_eq!(
            X_WING
                .unmarshal_binary_private_key(&[0u8; 64])
                .unwrap_err(),
            Error::BadKeyLength {
                expected: 32,
                actual: 64
            }
        );
    }

    #[test]
    fn invalid_ml_kem_part() {
        let sk = DecapsulationKey::from_seed(&[0u8; 32]).unwrap();
        let mut pk = sk.encapsulation_key().to_bytes();
        pk[0] = 0xff;
        pk[1] |= 0x0f;
        assert_eq!(
            EncapsulationKey::from_bytes(&pk).unwrap_err(),
            Error::InvalidPublicKey
        );
    }

    #[test]
    fn debug_redacts_the_seed() {
        let sk = DecapsulationKey::from_seed(&[0u8; 32]).unwrap();
        assert_eq!(
            alloc::format!("{sk:?}"),
            "DecapsulationKey { scheme: \"X-Wing\", .. }"
        );
    }
}
