use crate::decode;
use crate::encode;
use crate::item::Item;
use crate::registry::Registry;
use crate::value::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Register tag 0 (standard date/time string) for [`OffsetDateTime`]:
/// RFC 3339 text on the wire.
pub fn register_text_datetime(registry: &mut Registry) {
    registry.register::<OffsetDateTime, _, _>(
        0,
        |value, _| {
            value
                .format(&Rfc3339)
                .map(Item::Text)
                .map_err(encode::Error::custom)
        },
        |item, _| match item {
            Item::Text(text) => OffsetDateTime::parse(text, &Rfc3339)
                .map(Value::other)
                .map_err(decode::Error::custom),
            _ => Err(decode::Error::custom("tag 0 payload is not a text string")),
        },
    );
}

/// Register tag 1 (epoch-based date/time) for [`OffsetDateTime`]: integer
/// seconds when the timestamp is whole, float seconds otherwise.
pub fn register_epoch_datetime(registry: &mut Registry) {
    registry.register::<OffsetDateTime, _, _>(
        1,
        |value, _| {
            let nanos = value.unix_timestamp_nanos();
            if nanos % 1_000_000_000 == 0 {
                Ok(Item::Int(value.unix_timestamp() as i128))
            } else {
                Ok(Item::Float(nanos as f64 / 1e9))
            }
        },
        |item, _| match item {
            Item::Int(seconds) => i64::try_from(*seconds)
                .map_err(decode::Error::custom)
                .and_then(|s| {
                    OffsetDateTime::from_unix_timestamp(s).map_err(decode::Error::custom)
                })
                .map(Value::other),
            Item::Float(seconds) => {
                OffsetDateTime::from_unix_timestamp_nanos((seconds * 1e9) as i128)
                    .map(Value::other)
                    .map_err(decode::Error::custom)
            }
            _ => Err(decode::Error::custom("tag 1 payload is not a number")),
        },
    );
}
