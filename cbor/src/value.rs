use crate::item::Item;
use core::any::Any;
use core::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Simple value {0} is outside 0..=255")]
    SimpleOutOfRange(i128),
}

/// An opaque simple-value code (major type 7).
///
/// Part of the default vocabulary: the decode pipeline surfaces any simple
/// value outside the reserved false/true/null/undefined range as one of
/// these, and the encode pipeline writes it back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simple(u8);

impl Simple {
    pub const FALSE: Simple = Simple(20);
    pub const TRUE: Simple = Simple(21);
    pub const NULL: Simple = Simple(22);
    pub const UNDEFINED: Simple = Simple(23);

    pub fn new(value: i128) -> Result<Self, Error> {
        u8::try_from(value)
            .map(Simple)
            .map_err(|_| Error::SimpleOutOfRange(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for Simple {
    fn from(value: u8) -> Self {
        Simple(value)
    }
}

/// A tag number with a wrapped value that has no richer host mapping.
///
/// Produced by the default decoder for tags no registered extension claims;
/// the default encoder round-trips it back to a wire tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub tag: u64,
    pub value: Box<Value>,
}

impl Tagged {
    pub fn new(tag: u64, value: Value) -> Self {
        Self {
            tag,
            value: Box::new(value),
        }
    }
}

/// A type-erased host value, the injection point for registry extensions.
///
/// Blanket-implemented for every `Any + Debug + Clone` type.
pub trait Opaque: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn clone_box(&self) -> Box<dyn Opaque>;
}

impl<T: Any + fmt::Debug + Clone> Opaque for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn Opaque> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Opaque> {
    fn clone(&self) -> Self {
        self.as_ref().clone_box()
    }
}

/// A host value: the input of [`encode`](crate::encode::encode) and the
/// output of [`decode`](crate::decode::decode).
///
/// The variants are the runtime categories the pipelines dispatch on.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Int(i128),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    /// Order-preserving entry list; keys are full values and go through the
    /// pipeline like everything else.
    Map(Vec<(Value, Value)>),
    Tagged(Tagged),
    Simple(Simple),
    /// A raw wire item that no decoder in the chain claimed.
    Item(Item),
    /// A foreign host value, claimed by registry extensions during encode.
    Other(Box<dyn Opaque>),
}

impl Value {
    pub fn other(value: impl Opaque) -> Self {
        Value::Other(Box::new(value))
    }

    /// Borrow the concrete type inside a [`Value::Other`].
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Other(value) => value.as_any().downcast_ref(),
            _ => None,
        }
    }
}

/// `Other` values never compare equal; downcast to compare them.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Tagged(a), Value::Tagged(b)) => a == b,
            (Value::Simple(a), Value::Simple(b)) => a == b,
            (Value::Item(a), Value::Item(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i128)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value as i128)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Int(value as i128)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}
