use alloc::{boxed::Box, vec, vec::Vec};
use core::any::Any;
use core::fmt::{self, Debug};
use subtle::ConstantTimeEq;

use crate::{Entropy, Error, SignResult};

/// A freshly derived public/private key pair
pub type KeyPair = (Box<dyn PublicKey>, Box<dyn PrivateKey>);

/// Options for a single [`Scheme::sign`] or [`Scheme::verify`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignatureOpts<'a> {
    /// Domain-separation string bound into the signature.  Empty unless
    /// [`Scheme::supports_context`].
    pub context: &'a [u8],
}

impl<'a> SignatureOpts<'a> {
    /// Options carrying `context`
    #[must_use]
    pub fn with_context(context: &'a [u8]) -> Self {
        Self { context }
    }
}

/// A signature scheme with fixed parameters.
///
/// Like the KEM schemes, implementations are stateless and every byte string a scheme consumes
/// or produces has a fixed length given by the size accessors.
pub trait Scheme: Send + Sync + 'static {
    /// Stable name of the scheme, used as its registry key
    fn name(&self) -> &'static str;

    /// Length of an encoded public key
    fn public_key_size(&self) -> usize;

    /// Length of an encoded private key
    fn private_key_size(&self) -> usize;

    /// Length of a signature
    fn signature_size(&self) -> usize;

    /// Length of the seed consumed by [`Scheme::derive_key`]
    fn seed_size(&self) -> usize;

    /// Whether [`SignatureOpts::context`] may be non-empty
    fn supports_context(&self) -> bool {
        false
    }

    /// Deterministically derive a key pair from `seed`.
    ///
    /// # Errors
    /// [`Error::BadSeedLength`] unless `seed` is exactly [`Scheme::seed_size`] bytes.
    fn derive_key(&self, seed: &[u8]) -> SignResult<KeyPair>;

    /// Generate a key pair by drawing [`Scheme::seed_size`] bytes from `rng` and passing them to
    /// [`Scheme::derive_key`].
    ///
    /// # Errors
    /// [`Error::EntropyUnavailable`] if `rng` fails.
    fn generate_key(&self, rng: &mut dyn Entropy) -> SignResult<KeyPair> {
        let mut seed = vec![0u8; self.seed_size()];
        rng.try_fill(&mut seed)
            .map_err(|_| Error::EntropyUnavailable)?;
        let pair = self.derive_key(&seed);
        #[cfg(feature = "zeroize")]
        zeroize::Zeroize::zeroize(&mut seed);
        pair
    }

    /// Sign `msg` with `sk`, returning a [`Scheme::signature_size`] byte signature.
    ///
    /// # Errors
    /// - [`Error::ContextNotSupported`] if `opts` carries a context the scheme cannot bind
    /// - [`Error::TypeMismatch`] if `sk` belongs to another scheme
    fn sign(
        &self,
        sk: &dyn PrivateKey,
        msg: &[u8],
        opts: &SignatureOpts<'_>,
    ) -> SignResult<Vec<u8>>;

    /// Check that `sig` is a signature on `msg` under `pk`.
    ///
    /// # Errors
    /// - [`Error::ContextNotSupported`] if `opts` carries a context the scheme cannot bind
    /// - [`Error::TypeMismatch`] if `pk` belongs to another scheme
    /// - [`Error::InvalidSignature`] if `sig` has the wrong length or does not verify
    fn verify(
        &self,
        pk: &dyn PublicKey,
        msg: &[u8],
        sig: &[u8],
        opts: &SignatureOpts<'_>,
    ) -> SignResult<()>;

    /// Parse a public key from its canonical encoding.
    ///
    /// # Errors
    /// - [`Error::BadKeyLength`] unless `bytes` is [`Scheme::public_key_size`] bytes
    /// - [`Error::InvalidPublicKey`] if the encoding is malformed
    fn unmarshal_binary_public_key(&self, bytes: &[u8]) -> SignResult<Box<dyn PublicKey>>;

    /// Parse a private key from its canonical encoding.
    ///
    /// # Errors
    /// - [`Error::BadKeyLength`] unless `bytes` is [`Scheme::private_key_size`] bytes
    /// - [`Error::InvalidPrivateKey`] if the encoding is malformed or inconsistent
    fn unmarshal_binary_private_key(&self, bytes: &[u8]) -> SignResult<Box<dyn PrivateKey>>;
}

impl Debug for dyn Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scheme").field(&self.name()).finish()
    }
}

/// A verification key, tagged with the scheme it belongs to.
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
    pub fn downcast_ref<T: PublicKey>(&self) -> SignResult<&T> {
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

/// A signing key, tagged with the scheme it belongs to.
///
/// Encodings are compared in constant time.
pub trait PrivateKey: Debug + Send + Sync + Any + 'static {
    /// The scheme this key belongs to
    fn scheme(&self) -> &'static dyn Scheme;

    /// Canonical encoding, [`Scheme::private_key_size`] bytes long
    fn marshal_binary(&self) -> Vec<u8>;

    /// The matching verification key
    fn public_key(&self) -> Box<dyn PublicKey>;

    /// The concrete key, for downcasting
    fn as_any(&self) -> &dyn Any;
}

impl dyn PrivateKey {
    /// Borrow the concrete key type `T`.
    ///
    /// # Errors
    /// [`Error::TypeMismatch`] if this key is not a `T`.
    pub fn downcast_ref<T: PrivateKey>(&self) -> SignResult<&T> {
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
