//! Extension composition
//!
//! Extensions let third-party modules build derived, namespaced
//! functionality on top of the client's primitives without the client
//! depending on their implementations. An extension is described by a key
//! and a factory; at construction time the client runs every factory with
//! its bound operation set ([`PinOperations`]) and stores the produced
//! capability object in a registry under the key. Extensions live as long
//! as the client and are never re-instantiated or torn down.

use crate::client::PinOperations;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// An instantiated extension, stored type-erased in the registry
pub type Capability = Box<dyn Any + Send + Sync>;

type Factory = Box<dyn FnOnce(PinOperations) -> Capability + Send>;

/// Describes an extension to instantiate at client construction
///
/// The factory receives the client's bound operation set, so everything the
/// extension does goes through the same authenticated requests as the
/// client's own methods.
pub struct ExtensionDescriptor {
    key: String,
    factory: Factory,
}

impl ExtensionDescriptor {
    /// Describe an extension producing a `T` under `key`
    pub fn new<T, F>(key: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: FnOnce(PinOperations) -> T + Send + 'static,
    {
        Self {
            key: key.into(),
            factory: Box::new(move |ops| Box::new(factory(ops)) as Capability),
        }
    }

    /// The namespace key this extension is stored under
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn into_parts(self) -> (String, Factory) {
        (self.key, self.factory)
    }
}

impl fmt::Debug for ExtensionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionDescriptor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Fixed-key mapping of instantiated extensions
///
/// Built once during client construction. A duplicate key silently
/// overwrites the earlier instance.
#[derive(Default)]
pub struct ExtensionRegistry {
    entries: HashMap<String, Capability>,
}

impl ExtensionRegistry {
    pub(crate) fn insert(&mut self, key: String, capability: Capability) -> Option<Capability> {
        self.entries.insert(key, capability)
    }

    /// Look up an extension by key, downcast to its concrete type
    ///
    /// Returns `None` if the key is absent or the stored instance is not a
    /// `T`.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref::<T>()
    }

    /// Whether an extension is registered under `key`
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys of every registered extension
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered extensions
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
