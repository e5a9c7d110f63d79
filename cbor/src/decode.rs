use crate::item::Item;
use crate::read;
use crate::value::{Simple, Tagged, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Read(#[from] read::Error),

    /// A handler-raised failure.
    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Custom(err.into())
    }
}

/// One entry in a decoder chain, keyed by item variant.
///
/// Mirror image of [`Encode`](crate::encode::Encode): default bodies
/// decline, `Ok(Some(value))` ends the walk, and `chain.decode` restarts
/// the whole chain for a child item.
#[allow(unused_variables)]
pub trait Decode {
    fn int(&self, value: i128, chain: &Chain) -> Result<Option<Value>, Error> {
        Ok(None)
    }

    fn bytes(&self, value: &[u8], chain: &Chain) -> Result<Option<Value>, Error> {
        Ok(None)
    }

    fn text(&self, value: &str, chain: &Chain) -> Result<Option<Value>, Error> {
        Ok(None)
    }

    fn array(&self, items: &[Item], chain: &Chain) -> Result<Option<Value>, Error> {
        Ok(None)
    }

    fn map(&self, entries: &[(Item, Item)], chain: &Chain) -> Result<Option<Value>, Error> {
        Ok(None)
    }

    fn tag(&self, tag: u64, item: &Item, chain: &Chain) -> Result<Option<Value>, Error> {
        Ok(None)
    }

    fn simple(&self, value: u8, chain: &Chain) -> Result<Option<Value>, Error> {
        Ok(None)
    }

    fn float(&self, value: f64, chain: &Chain) -> Result<Option<Value>, Error> {
        Ok(None)
    }
}

/// Walks an ordered decoder chain, one item at a time.
pub struct Chain<'a> {
    decoders: &'a [&'a dyn Decode],
}

impl Chain<'_> {
    /// Map `item` to a value, restarting from the first entry.
    ///
    /// Fail-open: if the chain is exhausted, the item itself is the result.
    pub fn decode(&self, item: &Item) -> Result<Value, Error> {
        for decoder in self.decoders {
            if let Some(value) = self.dispatch(*decoder, item)? {
                return Ok(value);
            }
        }
        Ok(Value::Item(item.clone()))
    }

    fn dispatch(&self, decoder: &dyn Decode, item: &Item) -> Result<Option<Value>, Error> {
        match item {
            Item::Int(v) => decoder.int(*v, self),
            Item::Bytes(v) => decoder.bytes(v, self),
            Item::Text(v) => decoder.text(v, self),
            Item::Array(v) => decoder.array(v, self),
            Item::Map(v) => decoder.map(v, self),
            Item::Tag(tag, item) => decoder.tag(*tag, item, self),
            Item::Simple(v) => decoder.simple(*v, self),
            Item::Float(v) => decoder.float(*v, self),
        }
    }
}

/// Parse `bytes` and map the resulting item through the decoder chain.
///
/// Only malformed wire data and handler-raised failures error; semantic
/// gaps degrade to the raw [`Value::Item`].
pub fn decode(bytes: &[u8], decoders: &[&dyn Decode]) -> Result<Value, Error> {
    let (item, _) = read::read(bytes)?;
    Chain { decoders }.decode(&item)
}

/// Decode one item from `item` directly, without parsing bytes.
pub fn decode_item(item: &Item, decoders: &[&dyn Decode]) -> Result<Value, Error> {
    Chain { decoders }.decode(item)
}

/// Baseline decoder implementing the standard item mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDecoder;

impl Decode for DefaultDecoder {
    fn int(&self, value: i128, _: &Chain) -> Result<Option<Value>, Error> {
        Ok(Some(Value::Int(value)))
    }

    fn bytes(&self, value: &[u8], _: &Chain) -> Result<Option<Value>, Error> {
        Ok(Some(Value::Bytes(value.to_vec())))
    }

    fn text(&self, value: &str, _: &Chain) -> Result<Option<Value>, Error> {
        Ok(Some(Value::Text(value.to_owned())))
    }

    fn array(&self, items: &[Item], chain: &Chain) -> Result<Option<Value>, Error> {
        let values = items
            .iter()
            .map(|item| chain.decode(item))
            .collect::<Result<_, _>>()?;
        Ok(Some(Value::Array(values)))
    }

    /// Keeps text-keyed entries only; anything else is dropped unless an
    /// earlier entry (e.g. [`MapDecoder`](crate::map_mode::MapDecoder))
    /// claims the map first.
    fn map(&self, entries: &[(Item, Item)], chain: &Chain) -> Result<Option<Value>, Error> {
        let entries = entries
            .iter()
            .filter(|(key, _)| matches!(key, Item::Text(_)))
            .map(|(key, value)| Ok((chain.decode(key)?, chain.decode(value)?)))
            .collect::<Result<_, Error>>()?;
        Ok(Some(Value::Map(entries)))
    }

    fn tag(&self, tag: u64, item: &Item, chain: &Chain) -> Result<Option<Value>, Error> {
        Ok(Some(Value::Tagged(Tagged::new(tag, chain.decode(item)?))))
    }

    fn simple(&self, value: u8, _: &Chain) -> Result<Option<Value>, Error> {
        Ok(Some(match value {
            20 => Value::Bool(false),
            21 => Value::Bool(true),
            22 => Value::Null,
            23 => Value::Undefined,
            value => Value::Simple(Simple::from(value)),
        }))
    }

    fn float(&self, value: f64, _: &Chain) -> Result<Option<Value>, Error> {
        Ok(Some(Value::Float(value)))
    }
}
