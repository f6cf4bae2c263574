use pq_field::Truncate;

use crate::algebra::{BaseField, Elem, Polynomial, Vector};
use crate::param::{ArraySize, EncodingSize};

/// `Compress_d` and `Decompress_d`, applied in place
pub(crate) trait Compress {
    fn compress<D: EncodingSize>(&mut self) -> &Self;
    fn decompress<D: EncodingSize>(&mut self) -> &Self;
}

// For x < q and d <= 11, `((x << d) + (q + 1) / 2) * DIV_MUL >> DIV_SHIFT` is the rounded quotient
// `⌈2^d x / q⌋` without a division.
const DIV_SHIFT: usize = 34;
#[allow(clippy::integer_division_remainder_used)]
const DIV_MUL: u64 = (1 << DIV_SHIFT) / BaseField::QLL;
const Q_HALF: u64 = (BaseField::QLL + 1) >> 1;

impl Compress for Elem {
    fn compress<D: EncodingSize>(&mut self) -> &Self {
        let mask = (1u64 << D::USIZE) - 1;
        let x = u64::from(self.0);
        let y = (((x << D::USIZE) + Q_HALF) * DIV_MUL) >> DIV_SHIFT;
        self.0 = u16::truncate(y & mask);
        self
    }

    fn decompress<D: EncodingSize>(&mut self) -> &Self {
        let y = u32::from(self.0);
        let x = (y * BaseField::QL + (1 << (D::USIZE - 1))) >> D::USIZE;
        self.0 = u16::truncate(x);
        self
    }
}

impl Compress for Polynomial {
    fn compress<D: EncodingSize>(&mut self) -> &Self {
        for x in &mut self.0 {
            x.compress::<D>();
        }
        self
    }

    fn decompress<D: EncodingSize>(&mut self) -> &Self {
        for x in &mut self.0 {
            x.decompress::<D>();
        }
        self
    }
}

impl<K: ArraySize> Compress for Vector<K> {
    fn compress<D: EncodingSize>(&mut self) -> &Self {
        for p in &mut self.0 {
            p.compress::<D>();
        }
        self
    }

    fn decompress<D: EncodingSize>(&mut self) -> &Self {
        for p in &mut self.0 {
            p.decompress::<D>();
        }
        self
    }
}
