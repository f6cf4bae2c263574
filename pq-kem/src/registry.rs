use alloc::{collections::BTreeMap, string::String, vec::Vec};
use alloc::collections::btree_map::Entry;

use crate::{Error, KemResult, Scheme};

/// Collects schemes before a [`Registry`] is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    schemes: Vec<&'static dyn Scheme>,
    index: BTreeMap<String, usize>,
}

impl RegistryBuilder {
    /// An empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `scheme` under its name.  Names are compared ignoring ASCII case.
    ///
    /// # Errors
    /// [`Error::DuplicateScheme`] if a scheme with the same name is already registered.
    pub fn register(mut self, scheme: &'static dyn Scheme) -> KemResult<Self> {
        match self.index.entry(scheme.name().to_ascii_lowercase()) {
            Entry::Occupied(_) => Err(Error::DuplicateScheme {
                name: scheme.name(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(self.schemes.len());
                self.schemes.push(scheme);
                Ok(self)
            }
        }
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            schemes: self.schemes,
            index: self.index,
        }
    }
}

/// An immutable map from scheme names to schemes.
///
/// Lookups ignore ASCII case.  Iteration follows registration order.
#[derive(Debug, Default)]
pub struct Registry {
    schemes: Vec<&'static dyn Scheme>,
    index: BTreeMap<String, usize>,
}

impl Registry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The scheme registered as `name`, if any
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&'static dyn Scheme> {
        self.index
            .get(name.to_ascii_lowercase().as_str())
            .map(|&i| self.schemes[i])
    }

    /// All registered schemes, in registration order
    pub fn iter(&self) -> impl Iterator<Item = &'static dyn Scheme> + '_ {
        self.schemes.iter().copied()
    }

    /// Names of all registered schemes, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.iter().map(|scheme| scheme.name())
    }

    /// Number of registered schemes
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    /// Whether no scheme is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}
