//! Known-answer test against an independent X-Wing implementation.
//!
//! Key pair from the all-zero seed, encapsulation randomness is the bytes `0..64`.

use hex_literal::hex;
use pq_kem::{Error, Scheme};
use pq_xwing::{CIPHERTEXT_SIZE, DecapsulationKey, ENCAPSULATION_KEY_SIZE, X_WING};
use rstest::rstest;
use sha3::{Digest, Sha3_256};

const PK_DIGEST: [u8; 32] = hex!("11da78b4461862f89e2c545304ac972ac55ff353c82fc0a63e980212caf65e8e");
const PK_X: [u8; 32] = hex!("f63601b7f85accfeea2d17964c66b5194b0f08e18519faaee194e3c102823062");
const CT_DIGEST: [u8; 32] = hex!("2f9e33a26af0827833fc8e7683c8578f26831b7f7a1a35f6de7962cb7c9eafdc");
const SS: [u8; 32] = hex!("8c4099544cc5c22005cdb04311c70e33b471b8f05e290f32f05fb1b089ee5294");

fn digest(bytes: &[u8]) -> [u8; 32] {
    Sha3_256::digest(bytes).into()
}

fn randomness() -> [u8; 64] {
    core::array::from_fn(|i| u8::try_from(i).unwrap())
}

#[test]
fn typed_vector() {
    let sk = DecapsulationKey::from_seed(&[0u8; 32]).unwrap();
    let pk = sk.encapsulation_key().to_bytes();
    assert_eq!(pk.len(), ENCAPSULATION_KEY_SIZE);
    assert_eq!(digest(&pk), PK_DIGEST);
    assert_eq!(pk[1184..], PK_X);

    let (ct, ss) = sk.encapsulation_key().encapsulate_deterministic(&randomness());
    assert_eq!(ct.len(), CIPHERTEXT_SIZE);
    assert_eq!(digest(&ct), CT_DIGEST);
    assert_eq!(ss.as_slice(), SS);
    assert_eq!(sk.decapsulate(&ct).unwrap().as_slice(), SS);
}

#[test]
fn scheme_vector() {
    let scheme: &dyn Scheme = &X_WING;
    let (pk, sk) = scheme.derive_key(&[0u8; 32]).unwrap();
    assert_eq!(digest(&pk.marshal_binary()), PK_DIGEST);
    assert_eq!(sk.marshal_binary(), [0u8; 32]);

    let (ct, ss) = scheme
        .encapsulate_deterministically(pk.as_ref(), &randomness())
        .unwrap();
    assert_eq!(digest(&ct), CT_DIGEST);
    assert_eq!(ss, SS);
    assert_eq!(scheme.decapsulate(sk.as_ref(), &ct).unwrap(), SS);

    let pk2 = scheme.unmarshal_binary_public_key(&pk.marshal_binary()).unwrap();
    let sk2 = scheme.unmarshal_binary_private_key(&sk.marshal_binary()).unwrap();
    assert!(*pk2 == *pk);
    assert!(*sk2 == *sk);
    assert!(*sk2.public_key() == *pk);
}

#[test]
fn sizes() {
    assert_eq!(X_WING.name(), "X-Wing");
    assert_eq!(X_WING.public_key_size(), 1216);
    assert_eq!(X_WING.private_key_size(), 32);
    assert_eq!(X_WING.ciphertext_size(), 1120);
    assert_eq!(X_WING.shared_key_size(), 32);
    assert_eq!(X_WING.seed_size(), 32);
    assert_eq!(X_WING.encapsulation_seed_size(), 64);
}

#[rstest]
#[case::short(63)]
#[case::long(65)]
#[case::empty(0)]
fn encapsulation_seed_length(#[case] len: usize) {
    let (pk, _) = X_WING.derive_key(&[0u8; 32]).unwrap();
    assert_eq!(
        X_WING
            .encapsulate_deterministically(pk.as_ref(), &vec![0u8; len])
            .unwrap_err(),
        Error::BadSeedLength {
            expected: 64,
            actual: len
        }
    );
}

#[test]
fn foreign_keys_are_rejected() {
    let (pk, sk) = pq_mlkem::ML_KEM_768.derive_key(&[0u8; 64]).unwrap();
    assert_eq!(
        X_WING
            .encapsulate_deterministically(pk.as_ref(), &randomness())
            .unwrap_err(),
        Error::TypeMismatch
    );
    assert_eq!(
        X_WING
            .decapsulate(sk.as_ref(), &[0u8; CIPHERTEXT_SIZE])
            .unwrap_err(),
        Error::TypeMismatch
    );
}
