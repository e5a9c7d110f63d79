use crate::decode::{Chain, Decode, Error};
use crate::item::Item;
use crate::value::Value;

/// When the associative-container decoder claims a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Claim every map.
    Always,
    /// Claim only maps containing at least one non-text key.
    #[default]
    IfNeeded,
}

/// Decoder entry switching map decoding to associative-container mode:
/// every entry is kept, whatever its key type.
///
/// Install it ahead of the default decoder to stop the default's silent
/// dropping of non-text-keyed entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapDecoder {
    mode: Mode,
}

impl MapDecoder {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }
}

impl Decode for MapDecoder {
    fn map(&self, entries: &[(Item, Item)], chain: &Chain) -> Result<Option<Value>, Error> {
        if self.mode == Mode::IfNeeded
            && entries.iter().all(|(key, _)| matches!(key, Item::Text(_)))
        {
            return Ok(None);
        }

        let entries = entries
            .iter()
            .map(|(key, value)| Ok((chain.decode(key)?, chain.decode(value)?)))
            .collect::<Result<_, Error>>()?;
        Ok(Some(Value::Map(entries)))
    }
}
