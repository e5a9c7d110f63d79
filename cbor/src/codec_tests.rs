use super::codec::Codec;
use super::date::{register_epoch_datetime, register_text_datetime};
use super::decode;
use super::encode;
use super::item::Item;
use super::value::{Simple, Tagged, Value};
use hex_literal::hex;
use time::OffsetDateTime;
use time::macros::datetime;

#[test]
fn round_trip() {
    let codec = Codec::new();

    let value = Value::Map(vec![
        (
            Value::Text("ints".into()),
            Value::Array(vec![
                Value::Int(0),
                Value::Int(24),
                Value::Int(-256),
                Value::Int(18446744073709551615),
                Value::Int(-18446744073709551616),
            ]),
        ),
        (
            Value::Text("floats".into()),
            Value::Array(vec![Value::Float(1.5), Value::Float(1.33)]),
        ),
        (Value::Text("text".into()), Value::Text("\u{6c34}".into())),
        (Value::Text("bytes".into()), Value::Bytes(vec![0, 255])),
        (Value::Text("bool".into()), Value::Bool(true)),
        (Value::Text("null".into()), Value::Null),
        (Value::Text("undefined".into()), Value::Undefined),
        (
            Value::Text("tagged".into()),
            Value::Tagged(Tagged::new(55799, Value::Int(1))),
        ),
        (
            Value::Text("simple".into()),
            Value::Simple(Simple::from(99)),
        ),
    ]);

    let bytes = codec.encode(&value).unwrap();
    assert_eq!(codec.decode(&bytes).unwrap(), value);
}

#[test]
fn text_datetime_round_trip() {
    let mut codec = Codec::new();
    register_text_datetime(codec.registry_mut());

    let date = datetime!(2013-03-21 20:04:00 UTC);
    let bytes = codec.encode(&Value::other(date)).unwrap();
    assert_eq!(bytes, hex!("c074323031332d30332d32315432303a30343a30305a"));

    let decoded = codec.decode(&bytes).unwrap();
    assert_eq!(decoded.downcast_ref::<OffsetDateTime>(), Some(&date));
}

#[test]
fn epoch_datetime_round_trip() {
    let mut codec = Codec::new();
    register_epoch_datetime(codec.registry_mut());

    let date = datetime!(2013-03-21 20:04:00 UTC);
    let bytes = codec.encode(&Value::other(date)).unwrap();
    assert_eq!(bytes, hex!("c11a514b67b0"));

    let decoded = codec.decode(&bytes).unwrap();
    assert_eq!(decoded.downcast_ref::<OffsetDateTime>(), Some(&date));

    // fractional timestamps take the float form
    let date = datetime!(2013-03-21 20:04:00.5 UTC);
    let bytes = codec.encode(&Value::other(date)).unwrap();
    assert_eq!(bytes, hex!("c1fb41d452d9ec200000"));

    let decoded = codec.decode(&bytes).unwrap();
    let decoded = decoded.downcast_ref::<OffsetDateTime>().unwrap();
    assert_eq!(decoded.unix_timestamp(), 1363896240);
}

#[test]
fn unregistered_tags_still_wrap() {
    let mut codec = Codec::new();
    register_text_datetime(codec.registry_mut());

    assert_eq!(
        codec.decode(&hex!("c11a514b67b0")).unwrap(),
        Value::Tagged(Tagged::new(1, Value::Int(1363896240)))
    );
}

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i64,
    y: i64,
}

fn register_point(codec: &mut Codec, tag: u64) {
    codec.register::<Point, _, _>(
        tag,
        |point, chain| {
            chain.encode(&Value::Array(vec![
                Value::Int(point.x as i128),
                Value::Int(point.y as i128),
            ]))
        },
        |item, chain| match chain.decode(item)? {
            Value::Array(fields) => match fields.as_slice() {
                [Value::Int(x), Value::Int(y)] => Ok(Value::other(Point {
                    x: *x as i64,
                    y: *y as i64,
                })),
                _ => Err(decode::Error::custom("point payload has wrong shape")),
            },
            _ => Err(decode::Error::custom("point payload is not an array")),
        },
    );
}

#[test]
fn custom_extension_round_trip() {
    let mut codec = Codec::new();
    register_point(&mut codec, 4242);

    let point = Point { x: 3, y: -4 };
    let bytes = codec.encode(&Value::other(point.clone())).unwrap();
    assert_eq!(bytes, hex!("d9109282 03 23"));

    let decoded = codec.decode(&bytes).unwrap();
    assert_eq!(decoded.downcast_ref::<Point>(), Some(&point));

    // nested inside plain values
    let value = Value::Array(vec![Value::Int(1), Value::other(point.clone())]);
    let bytes = codec.encode(&value).unwrap();
    let decoded = codec.decode(&bytes).unwrap();
    match decoded {
        Value::Array(values) => {
            assert_eq!(values[0], Value::Int(1));
            assert_eq!(values[1].downcast_ref::<Point>(), Some(&point));
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn last_registration_wins() {
    let mut codec = Codec::new();
    register_point(&mut codec, 4242);
    register_point(&mut codec, 4300);

    let bytes = codec.encode(&Value::other(Point { x: 0, y: 0 })).unwrap();
    // 4300 = 0x10cc
    assert_eq!(bytes, hex!("d910cc82 00 00"));

    // the superseded deserializer stays reachable through its tag
    let decoded = codec.decode(&hex!("d9109282 01 02")).unwrap();
    assert_eq!(
        decoded.downcast_ref::<Point>(),
        Some(&Point { x: 1, y: 2 })
    );
}

#[test]
fn unregistered_values_fail_closed() {
    let codec = Codec::new();
    assert!(matches!(
        codec.encode(&Value::other(Point { x: 0, y: 0 })),
        Err(encode::Error::NoEncoder(_))
    ));
}

#[test]
fn codec_raw_item_passthrough() {
    let codec = Codec::new();
    let bytes = codec
        .encode(&Value::Item(Item::tag(2, Item::Bytes(vec![1]))))
        .unwrap();
    assert_eq!(bytes, hex!("c24101"));
}
