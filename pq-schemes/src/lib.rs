#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]

use std::sync::LazyLock;

pub use pq_kem::{Error, KemResult, KeyPair, PrivateKey, PublicKey, Registry, Scheme};

static REGISTRY: LazyLock<Registry> = LazyLock::new(build_registry);

/// The schemes compiled in, in registration order
fn compiled_in() -> Vec<&'static dyn Scheme> {
    let mut schemes: Vec<&'static dyn Scheme> = Vec::new();
    #[cfg(feature = "ml-kem")]
    {
        let ml_kem: [&'static dyn Scheme; 3] = [
            &pq_mlkem::ML_KEM_512,
            &pq_mlkem::ML_KEM_768,
            &pq_mlkem::ML_KEM_1024,
        ];
        schemes.extend(ml_kem);
    }
    #[cfg(feature = "x-wing")]
    schemes.push(&pq_xwing::X_WING);
    schemes
}

/// Build a fresh registry holding every compiled-in scheme.
///
/// # Panics
/// If two compiled-in schemes share a name.  That is a defect of this crate, not of its input.
#[must_use]
pub fn build_registry() -> Registry {
    let builder = compiled_in()
        .into_iter()
        .try_fold(Registry::builder(), |builder, scheme| builder.register(scheme));

    match builder {
        Ok(builder) => builder.build(),
        Err(err) => panic!("scheme table is inconsistent: {err}"),
    }
}

/// The process-wide registry, built on first use
#[must_use]
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// The scheme registered as `name`, ignoring ASCII case
#[must_use]
pub fn by_name(name: &str) -> Option<&'static dyn Scheme> {
    REGISTRY.lookup(name)
}

/// Every compiled-in scheme, in registration order
pub fn all() -> impl Iterator<Item = &'static dyn Scheme> {
    REGISTRY.iter()
}
