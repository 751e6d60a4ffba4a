//! The custom configuration store.
//!
//! Drivers and pipeline steps are developed independently of the core, so
//! their settings cannot be fields of [`HardwareGenerationConfig`]. Each
//! module instead owns a key in this store and a serde type for its value.
//! Values read from `kiln.toml` arrive as raw TOML and are converted to the
//! owner's type on first typed access.
//!
//! [`HardwareGenerationConfig`]: crate::HardwareGenerationConfig

use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// A stored value: either still raw TOML or already converted.
enum Entry {
    Raw(toml::Value),
    Typed(Box<dyn Any + Send + Sync>),
}

/// Named, typed settings shared between independently developed modules.
#[derive(Default)]
pub struct CustomConfigStore {
    entries: BTreeMap<String, Entry>,
}

impl CustomConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding raw TOML values, as read from `[custom.*]` tables.
    pub fn from_raw(values: BTreeMap<String, toml::Value>) -> Self {
        Self {
            entries: values
                .into_iter()
                .map(|(key, value)| (key, Entry::Raw(value)))
                .collect(),
        }
    }

    /// Stores a raw TOML value, replacing any existing entry.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: toml::Value) {
        self.entries.insert(key.into(), Entry::Raw(value));
    }

    /// Stores a typed value, replacing any existing entry.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Entry::Typed(Box::new(value)));
    }

    /// Returns `true` if an entry exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over the stored keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value under `key` as `T`, creating it if needed.
    ///
    /// A value already stored as `T` is returned as-is. A raw TOML value is
    /// deserialized into `T` and stored in typed form. A missing entry is
    /// created from `T::default()`, stored, and returned, so later calls see
    /// the same value.
    ///
    /// # Errors
    ///
    /// Fails if a raw value does not deserialize into `T`, or if the entry
    /// already holds a value of a different type.
    pub fn get_or_create<T>(&mut self, key: &str) -> Result<&mut T, ConfigError>
    where
        T: DeserializeOwned + Default + Send + Sync + 'static,
    {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Typed(Box::new(T::default())));

        let raw = match entry {
            Entry::Raw(value) => Some(value.clone()),
            Entry::Typed(_) => None,
        };
        if let Some(value) = raw {
            *entry = Entry::Typed(Box::new(deserialize_raw::<T>(key, value)?));
        }

        match entry {
            Entry::Typed(boxed) => boxed.downcast_mut::<T>().ok_or_else(|| mismatch::<T>(key)),
            Entry::Raw(_) => Err(mismatch::<T>(key)),
        }
    }

    /// Reads the value under `key` as `T` without modifying the store.
    ///
    /// Returns `Ok(None)` when no entry exists. Raw values are deserialized
    /// into a fresh `T`; typed values are cloned.
    ///
    /// # Errors
    ///
    /// Same conditions as [`get_or_create`](Self::get_or_create).
    pub fn get<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Entry::Raw(value)) => deserialize_raw(key, value.clone()).map(Some),
            Some(Entry::Typed(boxed)) => boxed
                .downcast_ref::<T>()
                .cloned()
                .map(Some)
                .ok_or_else(|| mismatch::<T>(key)),
        }
    }
}

fn deserialize_raw<T: DeserializeOwned>(key: &str, value: toml::Value) -> Result<T, ConfigError> {
    value.try_into().map_err(|e: toml::de::Error| ConfigError::CustomValue {
        key: key.to_string(),
        reason: e.message().to_string(),
    })
}

fn mismatch<T>(key: &str) -> ConfigError {
    ConfigError::CustomTypeMismatch {
        key: key.to_string(),
        expected: type_name::<T>(),
    }
}

impl fmt::Debug for CustomConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, entry) in &self.entries {
            match entry {
                Entry::Raw(value) => map.entry(key, value),
                Entry::Typed(_) => map.entry(key, &"<typed>"),
            };
        }
        map.finish()
    }
}
