#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)] // Be pedantic by default

extern crate alloc;

mod error;
mod registry;
mod scheme;

pub use error::{Error, SignResult};
pub use registry::{Registry, RegistryBuilder};
pub use scheme::{KeyPair, PrivateKey, PublicKey, Scheme, SignatureOpts};

pub use pq_kem::{Entropy, rand_core};
