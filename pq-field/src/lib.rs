#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)] // Be pedantic by default
#![warn(clippy::integer_division_remainder_used)] // Be judicious about using `/` and `%`

/// Binary extension fields GF(2^m) with `m <= 16`
pub mod binary;

/// GF(16) helpers for packed vectors of nibbles
pub mod gf16;

/// Prime-order fields and the `define_field!` macro
pub mod prime;

/// Degree-256 polynomials over a prime-order field, vectors of such polynomials, and their
/// NTT-domain counterparts
pub mod algebra;

/// Explicit integer narrowing
mod truncate;

pub use algebra::{MultiplyNtt, NttPolynomial, NttVector, Polynomial, Vector};
pub use binary::{Gf, Gf16, Gf4096, Gf8192, Modulus};
pub use prime::{Elem, Field};
pub use truncate::Truncate;

pub use hybrid_array as array;
pub use subtle;
