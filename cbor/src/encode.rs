use crate::buffer::Buffer;
use crate::item::Item;
use crate::value::{Opaque, Simple, Tagged, Value};
use crate::write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The chain was exhausted without any handler producing an item.
    /// Carries the offending value.
    #[error("No encoder for value {0:?}")]
    NoEncoder(Value),

    #[error(transparent)]
    Write(#[from] write::Error),

    /// A handler-raised failure.
    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Custom(err.into())
    }
}

/// One entry in an encoder chain.
///
/// Every method is a partial handler for one category of host value. The
/// default bodies decline, handing the value to the next entry in the
/// chain; returning `Ok(Some(item))` ends the walk for this value.
/// `chain.encode` restarts the whole chain from its first entry for a
/// nested value.
#[allow(unused_variables)]
pub trait Encode {
    fn null(&self, chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn undefined(&self, chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn bool(&self, value: bool, chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn int(&self, value: i128, chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn float(&self, value: f64, chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn text(&self, value: &str, chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn bytes(&self, value: &[u8], chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn array(&self, value: &[Value], chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn map(&self, entries: &[(Value, Value)], chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn tagged(&self, value: &Tagged, chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn simple(&self, value: Simple, chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn item(&self, value: &Item, chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }

    fn other(&self, value: &dyn Opaque, chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(None)
    }
}

/// Walks an ordered encoder chain, one value at a time.
pub struct Chain<'a> {
    encoders: &'a [&'a dyn Encode],
}

impl Chain<'_> {
    /// Map `value` to an item, restarting from the first entry.
    ///
    /// Fail-closed: exhausting the chain is an error.
    pub fn encode(&self, value: &Value) -> Result<Item, Error> {
        for encoder in self.encoders {
            if let Some(item) = self.dispatch(*encoder, value)? {
                return Ok(item);
            }
        }
        Err(Error::NoEncoder(value.clone()))
    }

    fn dispatch(&self, encoder: &dyn Encode, value: &Value) -> Result<Option<Item>, Error> {
        match value {
            Value::Null => encoder.null(self),
            Value::Undefined => encoder.undefined(self),
            Value::Bool(v) => encoder.bool(*v, self),
            Value::Int(v) => encoder.int(*v, self),
            Value::Float(v) => encoder.float(*v, self),
            Value::Text(v) => encoder.text(v, self),
            Value::Bytes(v) => encoder.bytes(v, self),
            Value::Array(v) => encoder.array(v, self),
            Value::Map(v) => encoder.map(v, self),
            Value::Tagged(v) => encoder.tagged(v, self),
            Value::Simple(v) => encoder.simple(*v, self),
            Value::Item(v) => encoder.item(v, self),
            Value::Other(v) => encoder.other(v.as_ref(), self),
        }
    }
}

/// Map `value` through the encoder chain and serialize the result.
///
/// The item tree is fully built before any bytes are written, so a failed
/// encode writes nothing.
pub fn encode(value: &Value, encoders: &[&dyn Encode]) -> Result<Vec<u8>, Error> {
    let item = Chain { encoders }.encode(value)?;
    let mut buffer = Buffer::new();
    write::write(&item, &mut buffer)?;
    Ok(buffer.into_vec())
}

/// As [`encode`], appending to an existing buffer.
pub fn encode_into(value: &Value, encoders: &[&dyn Encode], buffer: &mut Buffer) -> Result<(), Error> {
    let item = Chain { encoders }.encode(value)?;
    write::write(&item, buffer)?;
    Ok(())
}

/// Baseline encoder implementing the standard primitive mapping.
///
/// Handles every closed value category and declines `Other`, so it is
/// usable as the last entry of any chain: anything it declines that no
/// later entry claims fails the encode.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultEncoder;

impl Encode for DefaultEncoder {
    fn null(&self, _: &Chain) -> Result<Option<Item>, Error> {
        Ok(Some(Item::Simple(22)))
    }

    fn undefined(&self, _: &Chain) -> Result<Option<Item>, Error> {
        Ok(Some(Item::Simple(23)))
    }

    fn bool(&self, value: bool, _: &Chain) -> Result<Option<Item>, Error> {
        Ok(Some(Item::Simple(if value { 21 } else { 20 })))
    }

    fn int(&self, value: i128, _: &Chain) -> Result<Option<Item>, Error> {
        Ok(Some(Item::Int(value)))
    }

    fn float(&self, value: f64, _: &Chain) -> Result<Option<Item>, Error> {
        Ok(Some(Item::Float(value)))
    }

    fn text(&self, value: &str, _: &Chain) -> Result<Option<Item>, Error> {
        Ok(Some(Item::Text(value.to_owned())))
    }

    fn bytes(&self, value: &[u8], _: &Chain) -> Result<Option<Item>, Error> {
        Ok(Some(Item::Bytes(value.to_vec())))
    }

    fn array(&self, value: &[Value], chain: &Chain) -> Result<Option<Item>, Error> {
        let items = value
            .iter()
            .map(|v| chain.encode(v))
            .collect::<Result<_, _>>()?;
        Ok(Some(Item::Array(items)))
    }

    fn map(&self, entries: &[(Value, Value)], chain: &Chain) -> Result<Option<Item>, Error> {
        let entries = entries
            .iter()
            .map(|(key, value)| Ok((chain.encode(key)?, chain.encode(value)?)))
            .collect::<Result<_, Error>>()?;
        Ok(Some(Item::Map(entries)))
    }

    fn tagged(&self, value: &Tagged, chain: &Chain) -> Result<Option<Item>, Error> {
        Ok(Some(Item::Tag(
            value.tag,
            Box::new(chain.encode(&value.value)?),
        )))
    }

    fn simple(&self, value: Simple, _: &Chain) -> Result<Option<Item>, Error> {
        Ok(Some(Item::Simple(value.value())))
    }

    fn item(&self, value: &Item, _: &Chain) -> Result<Option<Item>, Error> {
        Ok(Some(value.clone()))
    }
}
