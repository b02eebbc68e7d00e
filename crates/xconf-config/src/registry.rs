//! Protocol registries and the polymorphic settings loader.
//!
//! A [`Registry`] maps a protocol name to a loader that decodes a raw
//! settings payload into one variant of a closed settings enum. The set of
//! protocols is fixed when [`Registries::standard`] runs; afterwards the
//! registries are only read, so one instance can be shared across threads
//! and compilation passes.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::ConfigError;
use crate::protocols::{self, InboundSettings, OutboundSettings};

/// Produce the runtime form of a document type.
pub trait Buildable {
    type Output;

    fn build(&self) -> Result<Self::Output, ConfigError>;
}

/// Decodes a settings payload into a registry's settings type.
pub type Loader<S> = fn(Value) -> Result<S, serde_json::Error>;

pub struct Registry<S> {
    direction: &'static str,
    protocol_key: &'static str,
    settings_key: &'static str,
    loaders: BTreeMap<&'static str, Loader<S>>,
}

impl<S> Registry<S> {
    pub fn new(
        direction: &'static str,
        protocol_key: &'static str,
        settings_key: &'static str,
    ) -> Self {
        Self {
            direction,
            protocol_key,
            settings_key,
            loaders: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, loader: Loader<S>) -> &mut Self {
        self.loaders.insert(name, loader);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaders.contains_key(name.to_ascii_lowercase().as_str())
    }

    pub fn protocols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.loaders.keys().copied()
    }

    /// Decode `payload` as the settings of protocol `name` (case-insensitive).
    pub fn load(&self, payload: &Value, name: &str) -> Result<S, ConfigError> {
        let id = name.to_ascii_lowercase();
        let loader = self
            .loaders
            .get(id.as_str())
            .ok_or_else(|| ConfigError::UnknownProtocol {
                direction: self.direction,
                field: self.protocol_key,
                name: name.to_string(),
            })?;
        loader(payload.clone()).map_err(|source| ConfigError::Decode {
            protocol: id,
            field: self.settings_key,
            source,
        })
    }

    /// Read protocol name and payload out of a whole entry object.
    ///
    /// A missing payload decodes as `{}`.
    pub fn load_entry(&self, entry: &Value) -> Result<S, ConfigError> {
        let name = entry
            .get(self.protocol_key)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ConfigError::Validation(format!("\"{}\" not found", self.protocol_key))
            })?;
        let empty = Value::Object(Default::default());
        let payload = entry.get(self.settings_key).unwrap_or(&empty);
        self.load(payload, name)
    }
}

impl<S> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("direction", &self.direction)
            .field("protocols", &self.loaders.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The inbound and outbound registries used by one or more compilations.
#[derive(Debug)]
pub struct Registries {
    pub inbound: Registry<InboundSettings>,
    pub outbound: Registry<OutboundSettings>,
}

impl Registries {
    /// Registries holding every built-in protocol.
    pub fn standard() -> Self {
        Self {
            inbound: protocols::inbound_registry(),
            outbound: protocols::outbound_registry(),
        }
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::standard()
    }
}
