use crate::decode;
use crate::encode;
use crate::item::Item;
use crate::value::{Opaque, Value};
use std::any::{Any, TypeId};
use std::collections::HashMap;

type SerializeFn =
    Box<dyn Fn(&dyn Opaque, &encode::Chain) -> Result<Option<Item>, encode::Error> + Send + Sync>;
type DeserializeFn =
    Box<dyn Fn(&Item, &decode::Chain) -> Result<Value, decode::Error> + Send + Sync>;

/// Associates host types with tag numbers and serialize/deserialize
/// closures.
///
/// Composes into exactly one encoder entry (claims [`Value::Other`] values
/// whose concrete type is registered, wrapping the serialized payload in
/// the registered tag) and one decoder entry (claims tags with a
/// registered number, bypassing the generic
/// [`Tagged`](crate::value::Tagged) wrapper).
///
/// Registration takes `&mut self`; build the registry up front and treat it
/// as read-only afterwards.
#[derive(Default)]
pub struct Registry {
    serializers: HashMap<TypeId, (u64, SerializeFn)>,
    deserializers: HashMap<u64, DeserializeFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `T` to `tag` with a serialize/deserialize closure pair.
    ///
    /// `serialize` produces the tag's payload item; `deserialize` receives
    /// the payload item back. Registering a duplicate tag or a duplicate
    /// type replaces the previous binding: the last registration wins.
    pub fn register<T, S, D>(&mut self, tag: u64, serialize: S, deserialize: D)
    where
        T: Any,
        S: Fn(&T, &encode::Chain) -> Result<Item, encode::Error> + Send + Sync + 'static,
        D: Fn(&Item, &decode::Chain) -> Result<Value, decode::Error> + Send + Sync + 'static,
    {
        self.serializers.insert(
            TypeId::of::<T>(),
            (
                tag,
                Box::new(move |value, chain| match value.as_any().downcast_ref::<T>() {
                    Some(value) => serialize(value, chain).map(Some),
                    None => Ok(None),
                }),
            ),
        );
        self.deserializers.insert(tag, Box::new(deserialize));
    }
}

impl encode::Encode for Registry {
    fn other(
        &self,
        value: &dyn Opaque,
        chain: &encode::Chain,
    ) -> Result<Option<Item>, encode::Error> {
        let Some((tag, serialize)) = self.serializers.get(&value.as_any().type_id()) else {
            return Ok(None);
        };
        match serialize(value, chain)? {
            Some(payload) => Ok(Some(Item::Tag(*tag, Box::new(payload)))),
            None => Ok(None),
        }
    }
}

impl decode::Decode for Registry {
    fn tag(
        &self,
        tag: u64,
        item: &Item,
        chain: &decode::Chain,
    ) -> Result<Option<Value>, decode::Error> {
        match self.deserializers.get(&tag) {
            Some(deserialize) => deserialize(item, chain).map(Some),
            None => Ok(None),
        }
    }
}
