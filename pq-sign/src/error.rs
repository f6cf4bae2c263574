use thiserror::Error;

/// The errors a signature operation can report
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The seed passed to [`Scheme::derive_key`](crate::Scheme::derive_key) has the wrong length
    #[error("Invalid seed length: expected {expected}, got {actual}")]
    BadSeedLength {
        /// Length the scheme requires
        expected: usize,
        /// Length supplied
        actual: usize,
    },
    /// An encoded key has the wrong length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    BadKeyLength {
        /// Length the scheme requires
        expected: usize,
        /// Length supplied
        actual: usize,
    },
    /// A key belongs to a different scheme
    #[error("Key does not belong to this scheme")]
    TypeMismatch,
    /// An encoded public key has the right length but is malformed
    #[error("Invalid public key")]
    InvalidPublicKey,
    /// An encoded private key has the right length but is malformed or inconsistent
    #[error("Invalid private key")]
    InvalidPrivateKey,
    /// A non-empty context was passed to a scheme that does not take one
    #[error("Scheme does not support a context string")]
    ContextNotSupported,
    /// The signature does not verify under the key, message and context
    #[error("Invalid signature")]
    InvalidSignature,
    /// The randomness source failed to produce bytes
    #[error("Entropy source failed")]
    EntropyUnavailable,
    /// Two schemes were registered under the same name
    #[error("Scheme registered twice: {name}")]
    DuplicateScheme {
        /// The name registered twice
        name: &'static str,
    },
}

/// The result type for signature operations
pub type SignResult<T> = Result<T, Error>;
