/// Narrow an unsigned integer, keeping only the low bits that fit in `Self`
pub trait Truncate<T> {
    /// Keep the low `Self::BITS` bits of `x`.
    fn truncate(x: T) -> Self;
}

macro_rules! impl_truncate {
    ($($from:ty => $to:ty),* $(,)?) => {
        $(
            impl Truncate<$from> for $to {
                // The mask makes the narrowing explicit; the cast cannot lose set bits.
                #[allow(clippy::cast_possible_truncation)]
                #[inline]
                fn truncate(x: $from) -> $to {
                    (x & <$from>::from(<$to>::MAX)) as $to
                }
            }
        )*
    };
}

impl_truncate!(
    u16 => u8,
    u32 => u8,
    u32 => u16,
    u64 => u16,
    u64 => u32,
    u128 => u16,
    u128 => u32,
    u128 => u64,
    usize => u8,
    usize => u16,
);
