use crate::decode::{self, DefaultDecoder};
use crate::encode::{self, DefaultEncoder};
use crate::item::Item;
use crate::registry::Registry;
use crate::value::Value;
use std::any::Any;

/// Convenience facade bundling an extension registry with the default
/// encoder/decoder pair.
#[derive(Default)]
pub struct Codec {
    registry: Registry,
}

impl Codec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// See [`Registry::register`].
    pub fn register<T, S, D>(&mut self, tag: u64, serialize: S, deserialize: D)
    where
        T: Any,
        S: Fn(&T, &encode::Chain) -> Result<Item, encode::Error> + Send + Sync + 'static,
        D: Fn(&Item, &decode::Chain) -> Result<Value, decode::Error> + Send + Sync + 'static,
    {
        self.registry.register::<T, S, D>(tag, serialize, deserialize)
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, encode::Error> {
        encode::encode(value, &[&self.registry, &DefaultEncoder])
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Value, decode::Error> {
        decode::decode(bytes, &[&self.registry, &DefaultDecoder])
    }
}
