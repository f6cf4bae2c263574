use thiserror::Error;

/// The errors a KEM operation can report
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The seed passed to a deterministic operation has the wrong length
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
    /// A ciphertext has the wrong length
    #[error("Invalid ciphertext length: expected {expected}, got {actual}")]
    BadCiphertextLength {
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

/// The result type for KEM operations
pub type KemResult<T> = Result<T, Error>;
