use alloc::vec;
use alloc::vec::Vec;
use hybrid_array::typenum::{U1, U12, Unsigned};

use crate::B32;
use crate::algebra::{
    Ntt, NttInverse, NttMatrix, NttVector, Polynomial, Vector, sample_poly_cbd,
    sample_poly_vec_cbd,
};
use crate::compress::Compress;
use crate::crypto::{G, MAX_PRF_OUTPUT_SIZE, PRF};
use crate::encode::Encode;
use crate::param::KemParams;

/// The secret half of a K-PKE key pair, `ŝ`
#[derive(Clone, Default, PartialEq)]
pub(crate) struct DecryptionKey<P: KemParams> {
    s_hat: NttVector<P::K>,
}

#[cfg(feature = "zeroize")]
impl<P: KemParams> zeroize::Zeroize for DecryptionKey<P> {
    fn zeroize(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.s_hat);
    }
}

impl<P: KemParams> DecryptionKey<P> {
    /// Algorithm 13: `K-PKE.KeyGen(d)`
    pub(crate) fn generate(d: &B32) -> (Self, EncryptionKey<P>) {
        let k = P::K::U8;
        let (rho, sigma) = G(&[d.as_slice(), &[k]]);

        let a_hat = NttMatrix::<P::K>::sample_uniform(&rho, false);
        let s: Vector<P::K> = sample_poly_vec_cbd::<P::Eta1, P::K>(&sigma, 0);
        let e: Vector<P::K> = sample_poly_vec_cbd::<P::Eta1, P::K>(&sigma, k);

        let s_hat = s.ntt();
        let t_hat = &(&a_hat * &s_hat) + &e.ntt();

        (Self { s_hat }, EncryptionKey { t_hat, rho })
    }

    /// Algorithm 15: `K-PKE.Decrypt(dk, c)`.  `ct` is a full ciphertext of this parameter set.
    pub(crate) fn decrypt(&self, ct: &[u8]) -> B32 {
        let (c1, c2) = ct.split_at(P::U_SIZE);

        let mut u: Vector<P::K> = Encode::<P::Du>::decode(c1);
        u.decompress::<P::Du>();

        let mut v: Polynomial = Encode::<P::Dv>::decode(c2);
        v.decompress::<P::Dv>();

        let s_u = (&self.s_hat * &u.ntt()).ntt_inverse();
        let mut w = &v - &s_u;
        w.compress::<U1>();

        let mut m = B32::default();
        Encode::<U1>::encode(&w, &mut m);
        m
    }

    /// `ByteEncode_12(ŝ)`
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; P::DECRYPTION_KEY_SIZE];
        Encode::<U12>::encode(&self.s_hat, &mut out);
        out
    }

    /// `ByteDecode_12(ŝ)`; coefficients are reduced, so a non-canonical encoding decodes to a
    /// key whose [`DecryptionKey::to_bytes`] differs from the input.
    pub(crate) fn from_bytes(enc: &[u8]) -> Self {
        Self {
            s_hat: Encode::<U12>::decode(enc),
        }
    }
}

/// The public half of a K-PKE key pair, `(t̂, ρ)`
#[derive(Clone, Default, Debug)]
pub(crate) struct EncryptionKey<P: KemParams> {
    t_hat: NttVector<P::K>,
    rho: B32,
}

impl<P: KemParams> PartialEq for EncryptionKey<P> {
    fn eq(&self, other: &Self) -> bool {
        self.t_hat == other.t_hat && self.rho == other.rho
    }
}

impl<P: KemParams> EncryptionKey<P> {
    /// Algorithm 14: `K-PKE.Encrypt(ek, m, r)`
    pub(crate) fn encrypt(&self, message: &B32, randomness: &B32) -> Vec<u8> {
        let k = P::K::U8;
        let r: Vector<P::K> = sample_poly_vec_cbd::<P::Eta1, P::K>(randomness, 0);
        let e1: Vector<P::K> = sample_poly_vec_cbd::<P::Eta2, P::K>(randomness, k);

        let mut buf = [0u8; MAX_PRF_OUTPUT_SIZE];
        let e2 = sample_poly_cbd::<P::Eta2>(PRF::<P::Eta2>(randomness, 2 * k, &mut buf));

        let a_hat_t = NttMatrix::<P::K>::sample_uniform(&self.rho, true);
        let r_hat = r.ntt();
        let mut u = &(&a_hat_t * &r_hat).ntt_inverse() + &e1;

        let mut mu: Polynomial = Encode::<U1>::decode(message);
        mu.decompress::<U1>();

        let t_r = (&self.t_hat * &r_hat).ntt_inverse();
        let mut v = &(&t_r + &e2) + &mu;

        let mut ct = vec![0u8; P::CIPHERTEXT_SIZE];
        let (c1, c2) = ct.split_at_mut(P::U_SIZE);
        u.compress::<P::Du>();
        Encode::<P::Du>::encode(&u, c1);
        v.compress::<P::Dv>();
        Encode::<P::Dv>::encode(&v, c2);
        ct
    }

    /// `ByteEncode_12(t̂) ‖ ρ`
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; P::ENCAPSULATION_KEY_SIZE];
        let (t_hat, rho) = out.split_at_mut(P::T_HAT_SIZE);
        Encode::<U12>::encode(&self.t_hat, t_hat);
        rho.copy_from_slice(&self.rho);
        out
    }

    /// Decode `t̂ ‖ ρ`.  `enc` must be [`KemParams::ENCAPSULATION_KEY_SIZE`] bytes.
    /// Coefficients are reduced; callers compare [`EncryptionKey::to_bytes`] against the input to reject
    /// non-canonical keys.
    pub(crate) fn from_bytes(enc: &[u8]) -> Self {
        let (t_hat, rho) = enc.split_at(P::T_HAT_SIZE);
        let mut out = Self {
            t_hat: Encode::<U12>::decode(t_hat),
            rho: B32::default(),
        };
        out.rho.copy_from_slice(rho);
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{MlKem512Params, MlKem768Params, MlKem1024Params};

    fn round_trip<P: KemParams>() {
        let d = B32::from_fn(|i| u8::try_from(i).unwrap());
        let (dk, ek) = DecryptionKey::<P>::generate(&d);

        let message = B32::from_fn(|i| u8::try_from(3 * i + 1).unwrap());
        let randomness = B32::from_fn(|i| u8::try_from(255 - i).unwrap());
        let ct = ek.encrypt(&message, &randomness);
        assert_eq!(ct.len(), P::CIPHERTEXT_SIZE);
        assert_eq!(dk.decrypt(&ct), message);

        // Encryption is a function of its inputs.
        assert_eq!(ek.encrypt(&message, &randomness), ct);

        let ek_bytes = ek.to_bytes();
        assert_eq!(ek_bytes.len(), P::ENCAPSULATION_KEY_SIZE);
        assert_eq!(EncryptionKey::<P>::from_bytes(&ek_bytes).to_bytes(), ek_bytes);

        let dk_bytes = dk.to_bytes();
        assert_eq!(dk_bytes.len(), P::DECRYPTION_KEY_SIZE);
        assert_eq!(DecryptionKey::<P>::from_bytes(&dk_bytes).to_bytes(), dk_bytes);
    }

    #[test]
    fn encrypt_decrypt() {
        round_trip::<MlKem512Params>();
        round_trip::<MlKem768Params>();
        round_trip::<MlKem1024Params>();
    }
}
