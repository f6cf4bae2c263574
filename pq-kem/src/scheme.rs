use alloc::{boxed::Box, vec, vec::Vec};
use core::any::Any;
use core::fmt::{self, Debug};
use subtle::ConstantTimeEq;

use crate::{Entropy, Error, KemResult};

/// A freshly derived public/private key pair
pub type KeyPair = (Box<dyn PublicKey>, Box<dyn PrivateKey>);

/// A key encapsulation mechanism with fixed parameters.
///
/// Implementations are stateless, so one instance (normally a `static`) serves any number of
/// keys from any number of threads.  Every byte string a scheme consumes or produces has a fixed
/// length given by the size accessors; inputs of any other length are rejected before they are
/// parsed.
pub trait Scheme: Send + Sync + 'static {
    /// Stable name of the scheme, used as its registry key
    fn name(&self) -> &'static str;

    /// Length of an encoded public key
    fn public_key_size(&self) -> usize;

    /// Length of an encoded private key
    fn private_key_size(&self) -> usize;

    /// Length of a ciphertext
    fn ciphertext_size(&self) -> usize;

    /// Length of a shared key
    fn shared_key_size(&self) -> usize;

    /// Length of the seed consumed by [`Scheme::derive_key`]
    fn seed_size(&self) -> usize;

    /// Length of the seed consumed by [`Scheme::encapsulate_deterministically`]
    fn encapsulation_seed_size(&self) -> usize;

    /// Deterministically derive a key pair from `seed`.
    ///
    /// # Errors
    /// [`Error::BadSeedLength`] unless `seed` is exactly [`Scheme::seed_size`] bytes.
    fn derive_key(&self, seed: &[u8]) -> KemResult<KeyPair>;

    /// Generate a key pair by drawing [`Scheme::seed_size`] bytes from `rng` and passing them to
    /// [`Scheme::derive_key`].
    ///
    /// # Errors
    /// [`Error::EntropyUnavailable`] if `rng` fails.
    fn generate_key(&self, rng: &mut dyn Entropy) -> KemResult<KeyPair> {
        let mut seed = vec![0u8; self.seed_size()];
        rng.try_fill(&mut seed)?;
        let pair = self.derive_key(&seed);
        #[cfg(feature = "zeroize")]
        zeroize::Zeroize::zeroize(&mut seed);
        pair
    }

    /// Encapsulate a fresh shared key to `pk` using `seed` as the only randomness, returning the
    /// ciphertext and the shared key.
    ///
    /// # Errors
    /// - [`Error::BadSeedLength`] unless `seed` is [`Scheme::encapsulation_seed_size`] bytes
    /// - [`Error::TypeMismatch`] if `pk` belongs to another scheme
    fn encapsulate_deterministically(
        &self,
        pk: &dyn PublicKey,
        seed: &[u8],
    ) -> KemResult<(Vec<u8>, Vec<u8>)>;

    /// Encapsulate a fresh shared key to `pk`, drawing [`Scheme::encapsulation_seed_size`] bytes
    /// from `rng`.
    ///
    /// # Errors
    /// - [`Error::EntropyUnavailable`] if `rng` fails
    /// - [`Error::TypeMismatch`] if `pk` belongs to another scheme
    fn encapsulate(
        &self,
        pk: &dyn PublicKey,
        rng: &mut dyn Entropy,
    ) -> KemResult<(Vec<u8>, Vec<u8>)> {
        let mut seed = vec![0u8; self.encapsulation_seed_size()];
        rng.try_fill(&mut seed)?;
        let out = self.encapsulate_deterministically(pk, &seed);
        #[cfg(feature = "zeroize")]
        zeroize::Zeroize::zeroize(&mut seed);
        out
    }

    /// Recover the shared key carried by `ct`.
    ///
    /// A ciphertext of the right length that was not produced for this key still yields a
    /// shared key, pseudorandom and unrelated to the encapsulated one, in the same amount of
    /// time.
    ///
    /// # Errors
    /// - [`Error::BadCiphertextLength`] unless `ct` is [`Scheme::ciphertext_size`] bytes
    /// - [`Error::TypeMismatch`] if `sk` belongs to another scheme
    fn decapsulate(&self, sk: &dyn PrivateKey, ct: &[u8]) -> KemResult<Vec<u8>>;

    /// Parse a public key from its canonical encoding.
    ///
    /// # Errors
    /// - [`Error::BadKeyLength`] unless `bytes` is [`Scheme::public_key_size`] bytes
    /// - [`Error::InvalidPublicKey`] if the encoding is malformed
    fn unmarshal_binary_public_key(&self, bytes: &[u8]) -> KemResult<Box<dyn PublicKey>>;

    /// Parse a private key from its canonical encoding.
    ///
    /// # Errors
    /// - [`Error::BadKeyLength`] unless `bytes` is [`Scheme::private_key_size`] bytes
    /// - [`Error::InvalidPrivateKey`] if the encoding is malformed or inconsistent
    fn unmarshal_binary_private_key(&self, bytes: &[u8]) -> KemResult<Box<dyn PrivateKey>>;
}

impl Debug for dyn Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scheme").field(&self.name()).finish()
    }
}

/// A public key, tagged with the scheme it belongs to.
///
/// Two public keys are equal when they belong to the same scheme and have the same encoding.
pub trait PublicKey: Debug + Send + Sync + Any + 'static {
    /// The scheme this key belongs to
    fn scheme(&self) -> &'static dyn Scheme;

    /// Canonical encoding, [`Scheme::public_key_size`] bytes long
    fn marshal_binary(&self) -> Vec<u8>;

    /// The concrete key, for downcasting
    fn as_any(&self) -> &dyn Any;
}

impl dyn PublicKey {
    /// Borrow the concrete key type `T`.
    ///
    /// # Errors
    /// [`Error::TypeMismatch`] if this key is not a `T`.
    pub fn downcast_ref<T: PublicKey>(&self) -> KemResult<&T> {
        self.as_any().downcast_ref::<T>().ok_or(Error::TypeMismatch)
    }
}

impl PartialEq for dyn PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.scheme().name() == other.scheme().name()
            && self.marshal_binary() == other.marshal_binary()
    }
}

impl Eq for dyn PublicKey {}

/// A private key, tagged with the scheme it belongs to.
///
/// Two private keys are equal when they belong to the same scheme and have the same encoding;
/// the encodings are compared in constant time.
pub trait PrivateKey: Debug + Send + Sync + Any + 'static {
    /// The scheme this key belongs to
    fn scheme(&self) -> &'static dyn Scheme;

    /// Canonical encoding, [`Scheme::private_key_size`] bytes long
    fn marshal_binary(&self) -> Vec<u8>;

    /// The matching public key
    fn public_key(&self) -> Box<dyn PublicKey>;

    /// The concrete key, for downcasting
    fn as_any(&self) -> &dyn Any;
}

impl dyn PrivateKey {
    /// Borrow the concrete key type `T`.
    ///
    /// # Errors
    /// [`Error::TypeMismatch`] if this key is not a `T`.
    pub fn downcast_ref<T: PrivateKey>(&self) -> KemResult<&T> {
        self.as_any().downcast_ref::<T>().ok_or(Error::TypeMismatch)
    }
}

impl PartialEq for dyn PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        let lhs = self.marshal_binary();
        let rhs = other.marshal_binary();
        self.scheme().name() == other.scheme().name()
            && bool::from(lhs.as_slice().ct_eq(rhs.as_slice()))
    }
}

impl Eq for dyn PrivateKey {}
