use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt::{self, Debug};
use core::marker::PhantomData;
use hybrid_array::{Array, typenum::U64};
use pq_kem::{Entropy, Error, KemResult, KeyPair, PrivateKey, PublicKey, Scheme};
use subtle::{ConditionallySelectable, ConstantTimeEq};

use crate::B32;
use crate::crypto::{G, H, J};
use crate::param::KemParams;
use crate::pke::{DecryptionKey, EncryptionKey};

/// The 64-byte seed `d ‖ z` a key pair is derived from
pub type Seed = Array<u8, U64>;

/// A shared key
pub type SharedKey = B32;

/// Length of a shared key
pub const SHARED_KEY_SIZE: usize = 32;

/// Length of a key generation seed
pub const SEED_SIZE: usize = 64;

/// Length of the randomness consumed by encapsulation, `m`
pub const ENCAPSULATION_SEED_SIZE: usize = 32;

fn check_length(expected: usize, actual: usize, err: fn(usize, usize) -> Error) -> KemResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(err(expected, actual))
    }
}

fn bad_seed(expected: usize, actual: usize) -> Error {
    Error::BadSeedLength { expected, actual }
}

fn bad_key(expected: usize, actual: usize) -> Error {
    Error::BadKeyLength { expected, actual }
}

fn bad_ciphertext(expected: usize, actual: usize) -> Error {
    Error::BadCiphertextLength { expected, actual }
}

/// An ML-KEM encapsulation (public) key
#[derive(Clone, PartialEq)]
pub struct EncapsulationKey<P: KemParams> {
    ek_pke: EncryptionKey<P>,
    h: B32,
}

impl<P: KemParams> EncapsulationKey<P> {
    fn new(ek_pke: EncryptionKey<P>) -> Self {
        let h = H(&ek_pke.to_bytes());
        Self { ek_pke, h }
    }

    /// Parse an encapsulation key, applying the modulus check of FIPS 203 §7.2.
    ///
    /// # Errors
    /// - [`Error::BadKeyLength`] if `enc` has the wrong length
    /// - [`Error::InvalidPublicKey`] if a coefficient of `t̂` is not reduced mod q
    pub fn from_bytes(enc: &[u8]) -> KemResult<Self> {
        check_length(P::ENCAPSULATION_KEY_SIZE, enc.len(), bad_key)?;

        let ek_pke = EncryptionKey::from_bytes(enc);
        let canonical = ek_pke.to_bytes();
        if canonical != enc {
            return Err(Error::InvalidPublicKey);
        }

        Ok(Self {
            ek_pke,
            h: H(&canonical),
        })
    }

    /// The encoding `ByteEncode_12(t̂) ‖ ρ`
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.ek_pke.to_bytes()
    }

    /// Algorithm 17: `ML-KEM.Encaps_internal(ek, m)`, returning the ciphertext and shared key.
    #[must_use]
    pub fn encapsulate_deterministic(&self, m: &B32) -> (Vec<u8>, SharedKey) {
        let (k, r) = G(&[m.as_slice(), self.h.as_slice()]);
        let ct = self.ek_pke.encrypt(m, &r);
        (ct, k)
    }

    /// Algorithm 20: `ML-KEM.Encaps(ek)`, drawing `m` from `rng`.
    ///
    /// # Errors
    /// [`Error::EntropyUnavailable`] if `rng` fails.
    pub fn encapsulate(
        &self,
        rng: &mut (impl Entropy + ?Sized),
    ) -> KemResult<(Vec<u8>, SharedKey)> {
        let mut m = B32::default();
        rng.try_fill(&mut m)?;
        Ok(self.encapsulate_deterministic(&m))
    }
}

impl<P: KemParams> Debug for EncapsulationKey<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncapsulationKey")
            .field("scheme", &P::NAME)
            .field("len", &P::ENCAPSULATION_KEY_SIZE)
            .finish()
    }
}

/// An ML-KEM decapsulation (private) key
#[derive(Clone)]
pub struct DecapsulationKey<P: KemParams> {
    dk_pke: DecryptionKey<P>,
    ek: EncapsulationKey<P>,
    z: B32,
    seed: Option<Seed>,
}

impl<P: KemParams> DecapsulationKey<P> {
    /// Algorithm 16: `ML-KEM.KeyGen_internal(d, z)`, with `seed = d ‖ z`.
    ///
    /// # Errors
    /// [`Error::BadSeedLength`] unless `seed` is [`SEED_SIZE`] bytes.
    pub fn from_seed(seed: &[u8]) -> KemResult<Self> {
        check_length(SEED_SIZE, seed.len(), bad_seed)?;

        let mut d = B32::default();
        let mut z = B32::default();
        d.copy_from_slice(&seed[..32]);
        z.copy_from_slice(&seed[32..]);

        let (dk_pke, ek_pke) = DecryptionKey::generate(&d);
        #[cfg(feature = "zeroize")]
        zeroize::Zeroize::zeroize(d.as_mut_slice());

        Ok(Self {
            dk_pke,
            ek: EncapsulationKey::new(ek_pke),
            z,
            seed: Some(Seed::from_fn(|i| seed[i])),
        })
    }

    /// Algorithm 19: `ML-KEM.KeyGen()`, drawing the seed from `rng`.
    ///
    /// # Errors
    /// [`Error::EntropyUnavailable`] if `rng` fails.
    pub fn generate(rng: &mut (impl Entropy + ?Sized)) -> KemResult<Self> {
        let mut seed = Seed::default();
        rng.try_fill(&mut seed)?;
        let dk = Self::from_seed(&seed);
        #[cfg(feature = "zeroize")]
        zeroize::Zeroize::zeroize(seed.as_mut_slice());
        dk
    }

    /// Parse an expanded key `dk_PKE ‖ ek ‖ H(ek) ‖ z`, applying the checks of FIPS 203 §7.3.
    /// A key parsed this way has no seed.
    ///
    /// # Errors
    /// - [`Error::BadKeyLength`] if `enc` has the wrong length
    /// - [`Error::InvalidPrivateKey`] if `ŝ` or `t̂` is not reduced mod q, or the embedded hash
    ///   does not match the embedded encapsulation key
    pub fn from_bytes(enc: &[u8]) -> KemResult<Self> {
        check_length(P::DECAPSULATION_KEY_SIZE, enc.len(), bad_key)?;

        let (dk_bytes, rest) = enc.split_at(P::DECRYPTION_KEY_SIZE);
        let (ek_bytes, rest) = rest.split_at(P::ENCAPSULATION_KEY_SIZE);
        let (h, z_bytes) = rest.split_at(32);

        let dk_pke = DecryptionKey::from_bytes(dk_bytes);
        let canonical_dk = bool::from(dk_pke.to_bytes().as_slice().ct_eq(dk_bytes));
        let ek =
            EncapsulationKey::from_bytes(ek_bytes).map_err(|_| Error::InvalidPrivateKey)?;

        if !canonical_dk || ek.h.as_slice() != h {
            return Err(Error::InvalidPrivateKey);
        }

        let mut z = B32::default();
        z.copy_from_slice(z_bytes);
        Ok(Self {
            dk_pke,
            ek,
            z,
            seed: None,
        })
    }

    /// The expanded encoding `dk_PKE ‖ ek ‖ H(ek) ‖ z`
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.dk_pke.to_bytes();
        out.reserve(P::ENCAPSULATION_KEY_SIZE + 64);
        out.extend_from_slice(&self.ek.to_bytes());
        out.extend_from_slice(&self.ek.h);
        out.extend_from_slice(&self.z);
        out
    }

    /// The seed this key was derived from, if it was not parsed from its expanded form
    #[must_use]
    pub fn to_seed(&self) -> Option<Seed> {
        self.seed.clone()
    }

    /// The matching encapsulation key
    #[must_use]
    pub fn encapsulation_key(&self) -> &EncapsulationKey<P> {
        &self.ek
    }

    /// Algorithm 18: `ML-KEM.Decaps_internal(dk, c)`.
    ///
    /// A well-formed ciphertext that fails re-encryption yields `J(z ‖ c)`; the choice is made
    /// in constant time.
    ///
    /// # Errors
    /// [`Error::BadCiphertextLength`] if `ct` has the wrong length.
    pub fn decapsulate(&self, ct: &[u8]) -> KemResult<SharedKey> {
        check_length(P::CIPHERTEXT_SIZE, ct.len(), bad_ciphertext)?;

        let m_prime = self.dk_pke.decrypt(ct);
        let (mut k_prime, r_prime) = G(&[m_prime.as_slice(), self.ek.h.as_slice()]);
        let k_bar = J(&[self.z.as_slice(), ct]);

        let ct_prime = self.ek.ek_pke.encrypt(&m_prime, &r_prime);
        let reject = !ct.ct_eq(ct_prime.as_slice());
        for (k, r) in k_prime.iter_mut().zip(k_bar.iter()) {
            k.conditional_assign(r, reject);
        }

        Ok(k_prime)
    }
}

impl<P: KemParams> Debug for DecapsulationKey<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecapsulationKey")
            .field("scheme", &P::NAME)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "zeroize")]
impl<P: KemParams> Drop for DecapsulationKey<P> {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.dk_pke.zeroize();
        self.z.as_mut_slice().zeroize();
        if let Some(seed) = self.seed.as_mut() {
            seed.as_mut_slice().zeroize();
        }
    }
}

#[cfg(feature = "zeroize")]
impl<P: KemParams> zeroize::ZeroizeOnDrop for DecapsulationKey<P> {}

/// ML-KEM with the parameter set `P`, as a [`Scheme`]
#[derive(Debug, Default)]
pub struct MlKem<P: KemParams>(PhantomData<P>);

impl<P: KemParams> MlKem<P> {
    /// The scheme; stateless, so any number of instances behave identically.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<P: KemParams> Scheme for MlKem<P> {
    fn name(&self) -> &'static str {
        P::NAME
    }

    fn public_key_size(&self) -> usize {
        P::ENCAPSULATION_KEY_SIZE
    }

    fn private_key_size(&self) -> usize {
        P::DECAPSULATION_KEY_SIZE
    }

    fn ciphertext_size(&self) -> usize {
        P::CIPHERTEXT_SIZE
    }

    fn shared_key_size(&self) -> usize {
        SHARED_KEY_SIZE
    }

    fn seed_size(&self) -> usize {
        SEED_SIZE
    }

    fn encapsulation_seed_size(&self) -> usize {
        ENCAPSULATION_SEED_SIZE
    }

    fn derive_key(&self, seed: &[u8]) -> KemResult<KeyPair> {
        let dk = DecapsulationKey::<P>::from_seed(seed)?;
        Ok((Box::new(dk.ek.clone()), Box::new(dk)))
    }

    fn encapsulate_deterministically(
        &self,
        pk: &dyn PublicKey,
        seed: &[u8],
    ) -> KemResult<(Vec<u8>, Vec<u8>)> {
        check_length(ENCAPSULATION_SEED_SIZE, seed.len(), bad_seed)?;
        let ek = pk.downcast_ref::<EncapsulationKey<P>>()?;

        let mut m = B32::default();
        m.copy_from_slice(seed);
        let (ct, k) = ek.encapsulate_deterministic(&m);
        Ok((ct, k.to_vec()))
    }

    fn decapsulate(&self, sk: &dyn PrivateKey, ct: &[u8]) -> KemResult<Vec<u8>> {
        check_length(P::CIPHERTEXT_SIZE, ct.len(), bad_ciphertext)?;
        let dk = sk.downcast_ref::<DecapsulationKey<P>>()?;
        Ok(dk.decapsulate(ct)?.to_vec())
    }

    fn unmarshal_binary_public_key(&self, bytes: &[u8]) -> KemResult<Box<dyn PublicKey>> {
        Ok(Box::new(EncapsulationKey::<P>::from_bytes(bytes)?))
    }

    fn unmarshal_binary_private_key(&self, bytes: &[u8]) -> KemResult<Box<dyn PrivateKey>> {
        Ok(Box::new(DecapsulationKey::<P>::from_bytes(bytes)?))
    }
}

impl<P: KemParams> PublicKey for EncapsulationKey<P> {
    fn scheme(&self) -> &'static dyn Scheme {
        P::scheme()
    }

    fn marshal_binary(&self) -> Vec<u8> {
        self.to_bytes()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<P: KemParams> PrivateKey for DecapsulationKey<P> {
    fn scheme(&self) -> &'static dyn Scheme {
        P::scheme()
    }

    fn marshal_binary(&self) -> Vec<u8> {
        self.to_bytes()
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
    use crate::{MlKem512Params, MlKem768Params, MlKem1024Params};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn round_trip<P: KemParams>() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let dk = DecapsulationKey::<P>::generate(&mut rng).unwrap();
        let ek = dk.encapsulation_key();

        let (ct, k_send) = ek.encapsulate(&mut rng).unwrap();
        assert_eq!(dk.decapsulate(&ct).unwrap(), k_send);

        // The expanded form round-trips but forgets the seed.
        let parsed = DecapsulationKey::<P>::from_bytes(&dk.to_bytes()).unwrap();
        assert_eq!(parsed.to_bytes(), dk.to_bytes());
        assert!(parsed.to_seed().is_none());
        assert_eq!(parsed.decapsulate(&ct).unwrap(), k_send);

        let reseeded = DecapsulationKey::<P>::from_seed(&dk.to_seed().unwrap()).unwrap();
        assert_eq!(reseeded.to_bytes(), dk.to_bytes());

        // Encapsulation keys compare by value for every parameter set.
        let ek_parsed = EncapsulationKey::<P>::from_bytes(&ek.to_bytes()).unwrap();
        assert!(ek_parsed == *ek);
        let other = DecapsulationKey::<P>::generate(&mut rng).unwrap();
        assert!(*other.encapsulation_key() != *ek);
    }

    #[test]
    fn round_trips() {
        round_trip::<MlKem512Params>();
        round_trip::<MlKem768Params>();
        round_trip::<MlKem1024Params>();
    }

    #[test]
    fn implicit_rejection() {
        let dk = DecapsulationKey::<MlKem768Params>::from_seed(&[1u8; 64]).unwrap();
        let (mut ct, k) = dk.encapsulation_key().encapsulate_deterministic(&B32::default());
        ct[0] ^= 1;

        let rejected = dk.decapsulate(&ct).unwrap();
        assert_ne!(rejected, k);
        assert_eq!(rejected, J(&[&[1u8; 32], ct.as_slice()]));
    }

    #[test]
    fn length_errors() {
        assert_eq!(
            DecapsulationKey::<MlKem512Params>::from_seed(&[0u8; 32]).unwrap_err(),
            Error::BadSeedLength {
                expected: 64,
                actual: 32
            }
        );
        assert_eq!(
            EncapsulationKey::<MlKem512Params>::from_bytes(&[0u8; 799]).unwrap_err(),
            Error::BadKeyLength {
                expected: 800,
                actual: 799
            }
        );

        let dk = DecapsulationKey::<MlKem512Params>::from_seed(&[0u8; 64]).unwrap();
        assert_eq!(
            dk.decapsulate(&[0u8; 769]).unwrap_err(),
            Error::BadCiphertextLength {
                expected: 768,
                actual: 769
            }
        );
    }

    #[test]
    fn modulus_check() {
        let dk = DecapsulationKey::<MlKem768Params>::from_seed(&[2u8; 64]).unwrap();
        let mut ek = dk.encapsulation_key().to_bytes();

        // Set the first coefficient of t̂ to 4095.
        ek[0] = 0xff;
        ek[1] |= 0x0f;
        assert_eq!(
            EncapsulationKey::<MlKem768Params>::from_bytes(&ek).unwrap_err(),
            Error::InvalidPublicKey
        );

        let mut sk = dk.to_bytes();
        sk[0] = 0xff;
        sk[1] |= 0x0f;
        assert_eq!(
            DecapsulationKey::<MlKem768Params>::from_bytes(&sk).unwrap_err(),
            Error::InvalidPrivateKey
        );

        let mut sk = dk.to_bytes();
        let h_offset = 1152 + 1184;
        sk[h_offset] ^= 1;
        assert_eq!(
            DecapsulationKey::<MlKem768Params>::from_bytes(&sk).unwrap_err(),
            Error::InvalidPrivateKey
        );
    }

    #[test]
    fn debug_hides_secrets() {
        let dk = DecapsulationKey::<MlKem512Params>::from_seed(&[0u8; 64]).unwrap();
        let text = alloc::format!("{dk:?}");
        assert_eq!(text, "DecapsulationKey { scheme: \"ML-KEM-512\", .. }");

        let text = alloc::format!("{:?}", dk.encapsulation_key());
        assert_eq!(text, "EncapsulationKey { scheme: \"ML-KEM-512\", len: 800 }");
    }
}
