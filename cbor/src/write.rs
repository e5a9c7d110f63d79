use crate::buffer::Buffer;
use crate::item::Item;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Integer {0} is outside the encodable range")]
    IntOutOfRange(i128),
}

/// Serialize one item, appending to `buffer`.
///
/// Byte-exact and minimal: every count uses the shortest legal header
/// encoding and every float the shortest width that round-trips to the
/// exact input value. Never emits indefinite-length output.
pub fn write(item: &Item, buffer: &mut Buffer) -> Result<(), Error> {
    match item {
        Item::Int(value) => write_int(*value, buffer),
        Item::Bytes(value) => {
            write_count(2, value.len() as u64, buffer);
            buffer.push(value);
            Ok(())
        }
        Item::Text(value) => {
            write_count(3, value.len() as u64, buffer);
            buffer.push(value.as_bytes());
            Ok(())
        }
        Item::Array(items) => {
            write_count(4, items.len() as u64, buffer);
            for item in items {
                write(item, buffer)?;
            }
            Ok(())
        }
        Item::Map(entries) => {
            write_count(5, entries.len() as u64, buffer);
            for (key, value) in entries {
                write(key, buffer)?;
                write(value, buffer)?;
            }
            Ok(())
        }
        Item::Tag(tag, item) => {
            write_count(6, *tag, buffer);
            write(item, buffer)
        }
        Item::Simple(value) => {
            write_simple(*value, buffer);
            Ok(())
        }
        Item::Float(value) => {
            write_float(*value, buffer);
            Ok(())
        }
    }
}

/// Serialize one item into a fresh contiguous buffer.
pub fn to_bytes(item: &Item) -> Result<Vec<u8>, Error> {
    let mut buffer = Buffer::new();
    write(item, &mut buffer)?;
    Ok(buffer.into_vec())
}

/// Minimal header-with-count encoding shared by int magnitudes, string
/// lengths, container counts and tag numbers.
fn write_count(major: u8, value: u64, buffer: &mut Buffer) {
    if value < 24 {
        buffer.push_byte((major << 5) | (value as u8));
    } else if value <= u8::MAX as u64 {
        buffer.push_byte((major << 5) | 24);
        buffer.push_byte(value as u8);
    } else if value <= u16::MAX as u64 {
        buffer.push_byte((major << 5) | 25);
        buffer.push(&(value as u16).to_be_bytes());
    } else if value <= u32::MAX as u64 {
        buffer.push_byte((major << 5) | 26);
        buffer.push(&(value as u32).to_be_bytes());
    } else {
        buffer.push_byte((major << 5) | 27);
        buffer.push(&value.to_be_bytes());
    }
}

fn write_int(value: i128, buffer: &mut Buffer) -> Result<(), Error> {
    let (major, magnitude) = if value >= 0 {
        (0, value)
    } else {
        (1, -value - 1)
    };
    let magnitude = u64::try_from(magnitude).map_err(|_| Error::IntOutOfRange(value))?;
    write_count(major, magnitude, buffer);
    Ok(())
}

fn write_simple(value: u8, buffer: &mut Buffer) {
    if value < 24 {
        buffer.push_byte((7 << 5) | value);
    } else {
        buffer.push_byte((7 << 5) | 24);
        buffer.push_byte(value);
    }
}

fn lossless_float_coerce<T>(value: f64) -> Option<T>
where
    T: num_traits::FromPrimitive + Into<f64> + Copy,
{
    match <T as num_traits::FromPrimitive>::from_f64(value) {
        Some(f) if <T as Into<f64>>::into(f) == value => Some(f),
        _ => None,
    }
}

fn write_float(value: f64, buffer: &mut Buffer) {
    if let Some(f) = lossless_float_coerce::<half::f16>(value) {
        buffer.push_byte((7 << 5) | 25);
        buffer.push(&f.to_be_bytes());
    } else if let Some(f) = lossless_float_coerce::<f32>(value) {
        buffer.push_byte((7 << 5) | 26);
        buffer.push(&f.to_be_bytes());
    } else {
        buffer.push_byte((7 << 5) | 27);
        buffer.push(&value.to_be_bytes());
    }
}

/// Begin an indefinite-length byte string. The producer emits definite
/// chunks and terminates with [`write_break`].
pub fn write_indefinite_bytes_header(buffer: &mut Buffer) {
    buffer.push_byte((2 << 5) | 31);
}

/// Begin an indefinite-length text string. See
/// [`write_indefinite_bytes_header`].
pub fn write_indefinite_text_header(buffer: &mut Buffer) {
    buffer.push_byte((3 << 5) | 31);
}

/// Array header; `None` begins an indefinite-length array.
pub fn write_array_header(count: Option<u64>, buffer: &mut Buffer) {
    match count {
        Some(count) => write_count(4, count, buffer),
        None => buffer.push_byte((4 << 5) | 31),
    }
}

/// Map header counted in key/value pairs; `None` begins an indefinite-length
/// map.
pub fn write_map_header(count: Option<u64>, buffer: &mut Buffer) {
    match count {
        Some(count) => write_count(5, count, buffer),
        None => buffer.push_byte((5 << 5) | 31),
    }
}

/// The break marker terminating an indefinite-length item.
pub fn write_break(buffer: &mut Buffer) {
    buffer.push_byte((7 << 5) | 31);
}
