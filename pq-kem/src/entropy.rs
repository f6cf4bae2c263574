use rand_core::TryCryptoRng;

use crate::{Error, KemResult};

/// A source of cryptographically secure random bytes.
///
/// Schemes never manage a generator themselves; callers lend one for the duration of a call.
/// Every [`TryCryptoRng`] is an `Entropy`, so `OsRng`, `rand::rng()` and seeded generators can be
/// passed directly.
pub trait Entropy {
    /// Fill all of `dest`, or fail with [`Error::EntropyUnavailable`].
    ///
    /// # Errors
    /// The underlying source could not produce bytes.
    fn try_fill(&mut self, dest: &mut [u8]) -> KemResult<()>;
}

impl<R: TryCryptoRng + ?Sized> Entropy for R {
    fn try_fill(&mut self, dest: &mut [u8]) -> KemResult<()> {
        self.try_fill_bytes(dest)
            .map_err(|_| Error::EntropyUnavailable)
    }
}
