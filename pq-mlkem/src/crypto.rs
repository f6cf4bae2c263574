use sha3::{
    Digest, Sha3_256, Sha3_512, Shake128, Shake256,
    digest::{ExtendableOutput, Update, XofReader},
};

use crate::B32;
use crate::param::CbdSamplingSize;

/// Largest PRF output, for `η = 3`
pub(crate) const MAX_PRF_OUTPUT_SIZE: usize = 192;

/// `G(c) = SHA3-512(c)`, split into two 32-byte halves
pub(crate) fn G(inputs: &[&[u8]]) -> (B32, B32) {
    let mut h = Sha3_512::new();
    for x in inputs {
        Digest::update(&mut h, x);
    }
    let out = h.finalize();

    let mut a = B32::default();
    let mut b = B32::default();
    a.copy_from_slice(&out[..32]);
    b.copy_from_slice(&out[32..]);
    (a, b)
}

/// `H(s) = SHA3-256(s)`
pub(crate) fn H(x: &[u8]) -> B32 {
    let mut out = B32::default();
    out.copy_from_slice(&Sha3_256::digest(x));
    out
}

/// `J(s) = SHAKE256(s, 32)`
pub(crate) fn J(inputs: &[&[u8]]) -> B32 {
    let mut h = Shake256::default();
    for x in inputs {
        h.update(x);
    }

    let mut out = B32::default();
    h.finalize_xof().read(&mut out);
    out
}

/// `PRF_η(s, b) = SHAKE256(s || b, 64η)`, written to the front of `out`.
pub(crate) fn PRF<'a, Eta: CbdSamplingSize>(
    s: &B32,
    b: u8,
    out: &'a mut [u8; MAX_PRF_OUTPUT_SIZE],
) -> &'a [u8] {
    let mut h = Shake256::default();
    h.update(s);
    h.update(&[b]);

    let out = &mut out[..Eta::PRF_OUTPUT_SIZE];
    h.finalize_xof().read(out);
    out
}

/// `XOF(ρ, i, j) = SHAKE128(ρ || i || j)`, as a reader the samplers pull from
pub(crate) fn XOF(rho: &B32, i: u8, j: u8) -> impl XofReader + use<> {
    let mut h = Shake128::default();
    h.update(rho);
    h.update(&[i, j]);
    h.finalize_xof()
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;
    use hybrid_array::typenum::{U2, U3};

    fn b32(s: &str) -> B32 {
        let mut out = B32::default();
        out.copy_from_slice(s.as_bytes());
        out
    }

    #[test]
    fn g() {
        let (a, b) = G(&[b"Input to ", b"an invocation of G"]);
        assert_eq!(
            a,
            hex!("07dfced2a3a3feb3277cee1709818828ea6d2f42800152e9c312e848122231c2")
        );
        assert_eq!(
            b,
            hex!("272969098a1bbd5a0a9844e2f89f206d8f7f4599e36aecaa4793af400fd880d8")
        );
    }

    #[test]
    fn h() {
        assert_eq!(
            H(b"Input to an invocation of H"),
            hex!("0ee3ce94213d7dd0069b24b8b15cdd0bcf8eb1c6b3c21c441dc6a19e979cc7eb")
        );
    }

    #[test]
    fn j() {
        assert_eq!(
            J(&[b"Input to ", b"an invocation of J"]),
            hex!("a5292293d70c8eca049cbb475c48fabd625ed2b20785a18248504d3741196b52")
        );
    }

    #[test]
    fn prf() {
        let mut buf = [0u8; MAX_PRF_OUTPUT_SIZE];
        let out = PRF::<U2>(&b32("Input s to an invocation of PRF2"), b'b', &mut buf);
        assert_eq!(out.len(), 128);
        assert_eq!(
            out[..32],
            hex!("54c002415c2219b564d5c17b0df0c82f83ddf3fdecc7d814ed5d85457c06c2c3")
        );

        let out = PRF::<U3>(&b32("Input s to an invocation of PRF3"), b'b', &mut buf);
        assert_eq!(out.len(), 192);
        assert_eq!(
            out[160..],
            hex!("b4a12deb1de8b9dad026b4e323e03973ffbe25dd511eed5460d22a9851cfc220")
        );
    }

    #[test]
    fn xof() {
        let mut reader = XOF(&b32("Input rho, to an XOF invocation!"), b'i', b'j');
        let mut actual = [0u8; 32];
        reader.read(&mut actual);
        assert_eq!(
            actual,
            hex!("0d2c3e65f754d074cb366cf1b099ae105cc40f018342509f15f1ba8a1a4144cb")
        );
    }
}
