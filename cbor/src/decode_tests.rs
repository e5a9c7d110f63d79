use super::decode::*;
use super::item::Item;
use super::map_mode::{MapDecoder, Mode};
use super::read;
use super::value::{Simple, Tagged, Value};
use hex_literal::hex;

fn dec(bytes: &[u8]) -> Value {
    decode(bytes, &[&DefaultDecoder]).unwrap()
}

#[test]
fn primitives() {
    assert_eq!(dec(&hex!("00")), Value::Int(0));
    assert_eq!(dec(&hex!("1818")), Value::Int(24));
    assert_eq!(dec(&hex!("20")), Value::Int(-1));
    assert_eq!(dec(&hex!("38ff")), Value::Int(-256));
    assert_eq!(dec(&hex!("f93e00")), Value::Float(1.5));
    assert_eq!(dec(&hex!("fb3ff199999999999a")), Value::Float(1.1));
    assert_eq!(dec(&hex!("6161")), Value::Text("a".into()));
    assert_eq!(dec(&hex!("4401020304")), Value::Bytes(vec![1, 2, 3, 4]));
}

#[test]
fn simples() {
    assert_eq!(dec(&hex!("f4")), Value::Bool(false));
    assert_eq!(dec(&hex!("f5")), Value::Bool(true));
    assert_eq!(dec(&hex!("f6")), Value::Null);
    assert_eq!(dec(&hex!("f7")), Value::Undefined);
    assert_eq!(dec(&hex!("f0")), Value::Simple(Simple::from(16)));
    assert_eq!(dec(&hex!("f8ff")), Value::Simple(Simple::from(255)));
}

#[test]
fn arrays() {
    assert_eq!(dec(&hex!("80")), Value::Array(vec![]));
    assert_eq!(
        dec(&hex!("83010203")),
        Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
    assert_eq!(
        dec(&hex!("8301820203820405")),
        Value::Array(vec![
            Value::Int(1),
            Value::Array(vec![Value::Int(2), Value::Int(3)]),
            Value::Array(vec![Value::Int(4), Value::Int(5)]),
        ])
    );
}

#[test]
fn maps_keep_text_keys() {
    assert_eq!(dec(&hex!("a0")), Value::Map(vec![]));
    assert_eq!(
        dec(&hex!("a26161016162820203")),
        Value::Map(vec![
            (Value::Text("a".into()), Value::Int(1)),
            (
                Value::Text("b".into()),
                Value::Array(vec![Value::Int(2), Value::Int(3)])
            ),
        ])
    );
}

#[test]
fn maps_drop_non_text_keys() {
    // integer-keyed entries disappear under the default decoder
    assert_eq!(dec(&hex!("a201020304")), Value::Map(vec![]));

    // mixed keys keep only the text-keyed entry
    assert_eq!(
        dec(&hex!("a36161010203820405f4")),
        Value::Map(vec![(Value::Text("a".into()), Value::Int(1))])
    );
}

#[test]
fn map_mode_preserves_entries() {
    let always = MapDecoder::new(Mode::Always);
    let if_needed = MapDecoder::new(Mode::IfNeeded);

    let entries = Value::Map(vec![
        (Value::Int(1), Value::Int(2)),
        (Value::Int(3), Value::Int(4)),
    ]);

    assert_eq!(
        decode(&hex!("a201020304"), &[&always, &DefaultDecoder]).unwrap(),
        entries
    );
    assert_eq!(
        decode(&hex!("a201020304"), &[&if_needed, &DefaultDecoder]).unwrap(),
        entries
    );

    // all-text maps defer to the default under IfNeeded
    assert_eq!(
        decode(&hex!("a1616101"), &[&if_needed, &DefaultDecoder]).unwrap(),
        Value::Map(vec![(Value::Text("a".into()), Value::Int(1))])
    );

    // keys recurse through the chain in container mode
    assert_eq!(
        decode(&hex!("a18101f5"), &[&always, &DefaultDecoder]).unwrap(),
        Value::Map(vec![(
            Value::Array(vec![Value::Int(1)]),
            Value::Bool(true)
        )])
    );
}

#[test]
fn tags_wrap() {
    assert_eq!(
        dec(&hex!("c11a514b67b0")),
        Value::Tagged(Tagged::new(1, Value::Int(1363896240)))
    );
    assert_eq!(
        dec(&hex!("d82076687474703a2f2f7777772e6578616d706c652e636f6d")),
        Value::Tagged(Tagged::new(
            32,
            Value::Text("http://www.example.com".into())
        ))
    );
}

#[test]
fn indefinite_text() {
    assert_eq!(dec(&hex!("7f61616162ff")), Value::Text("ab".into()));
    assert_eq!(
        dec(&hex!("5f42010243030405ff")),
        Value::Bytes(vec![1, 2, 3, 4, 5])
    );
}

#[test]
fn empty_chain_falls_open() {
    assert_eq!(decode(&hex!("00"), &[]).unwrap(), Value::Item(Item::Int(0)));
    assert_eq!(
        decode(&hex!("83010203"), &[]).unwrap(),
        Value::Item(Item::Array(vec![
            Item::Int(1),
            Item::Int(2),
            Item::Int(3)
        ]))
    );
}

/// Handles ints only; everything else stays unclaimed.
struct IntsOnly;

impl Decode for IntsOnly {
    fn int(&self, value: i128, _: &Chain) -> Result<Option<Value>, Error> {
        Ok(Some(Value::Int(value + 1)))
    }
}

#[test]
fn partial_chain_falls_open() {
    assert_eq!(decode(&hex!("00"), &[&IntsOnly]).unwrap(), Value::Int(1));
    assert_eq!(
        decode(&hex!("6161"), &[&IntsOnly]).unwrap(),
        Value::Item(Item::Text("a".into()))
    );
}

#[test]
fn chain_order() {
    // an earlier entry wins over the default
    assert_eq!(
        decode(&hex!("07"), &[&IntsOnly, &DefaultDecoder]).unwrap(),
        Value::Int(8)
    );
    // nested items restart the chain from the first entry
    assert_eq!(
        decode(&hex!("8107"), &[&IntsOnly, &DefaultDecoder]).unwrap(),
        Value::Array(vec![Value::Int(8)])
    );
}

#[test]
fn decode_item_directly() {
    assert_eq!(
        decode_item(&Item::tag(99, Item::Int(1)), &[&DefaultDecoder]).unwrap(),
        Value::Tagged(Tagged::new(99, Value::Int(1)))
    );
}

#[test]
fn wire_errors_are_fatal() {
    assert!(matches!(
        decode(&hex!("bf01ff"), &[&DefaultDecoder]),
        Err(Error::Read(read::Error::OddMapLength))
    ));
    assert!(matches!(
        decode(&hex!("62 61"), &[&DefaultDecoder]),
        Err(Error::Read(read::Error::NotEnoughData))
    ));
    assert!(matches!(
        decode(&hex!("ff"), &[&DefaultDecoder]),
        Err(Error::Read(read::Error::UnexpectedBreak))
    ));
}
