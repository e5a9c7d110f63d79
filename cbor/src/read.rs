use crate::item::Item;
use thiserror::Error;

/// Items nested deeper than this fail with [`Error::TooDeep`].
pub const MAX_NESTING: usize = 512;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Not enough data for encoded value")]
    NotEnoughData,

    #[error("Invalid minor-type value {0}")]
    InvalidMinorValue(u8),

    #[error("Indefinite length is not legal for this major type")]
    IndefiniteLength,

    #[error("Chunked string contains an invalid chunk")]
    InvalidChunk,

    #[error("Indefinite-length map has an odd number of items")]
    OddMapLength,

    #[error("Invalid two-byte simple value {0}")]
    InvalidSimple(u8),

    #[error("Text is not valid UTF-8")]
    InvalidUtf8(#[from] core::str::Utf8Error),

    #[error("Break marker outside an indefinite-length item")]
    UnexpectedBreak,

    #[error("Nesting deeper than {MAX_NESTING} items")]
    TooDeep,
}

/// One decoded item header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub major: u8,
    pub short_count: u8,
    pub extended: Option<u64>,
    pub header_len: usize,
    /// Count, length or inline value carried by the header. `None` exactly
    /// when the item is indefinite-length.
    pub item_len: Option<u64>,
}

fn read_be<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], Error> {
    let end = offset.checked_add(N).ok_or(Error::NotEnoughData)?;
    data.get(offset..end)
        .and_then(|s| s.try_into().ok())
        .ok_or(Error::NotEnoughData)
}

/// Parse the header of the item starting at `offset`.
pub fn read_header(data: &[u8], offset: usize) -> Result<Header, Error> {
    let byte = *data.get(offset).ok_or(Error::NotEnoughData)?;
    let major = byte >> 5;
    let short_count = byte & 0x1F;

    if major == 7 {
        return read_special_header(data, offset, short_count);
    }

    match short_count {
        0..=23 => Ok(Header {
            major,
            short_count,
            extended: None,
            header_len: 1,
            item_len: Some(short_count as u64),
        }),
        24 => {
            let v = read_be::<1>(data, offset + 1)?[0] as u64;
            Ok(Header {
                major,
                short_count,
                extended: Some(v),
                header_len: 2,
                item_len: Some(v),
            })
        }
        25 => {
            let v = u16::from_be_bytes(read_be(data, offset + 1)?) as u64;
            Ok(Header {
                major,
                short_count,
                extended: Some(v),
                header_len: 3,
                item_len: Some(v),
            })
        }
        26 => {
            let v = u32::from_be_bytes(read_be(data, offset + 1)?) as u64;
            Ok(Header {
                major,
                short_count,
                extended: Some(v),
                header_len: 5,
                item_len: Some(v),
            })
        }
        27 => {
            let v = u64::from_be_bytes(read_be(data, offset + 1)?);
            Ok(Header {
                major,
                short_count,
                extended: Some(v),
                header_len: 9,
                item_len: Some(v),
            })
        }
        31 => Ok(Header {
            major,
            short_count,
            extended: None,
            header_len: 1,
            item_len: None,
        }),
        _ => Err(Error::InvalidMinorValue(short_count)),
    }
}

/// Major 7 overloads short counts 24..=27: 24 carries a simple value in one
/// extra byte, 25/26/27 announce a half/single/double float payload.
fn read_special_header(data: &[u8], offset: usize, short_count: u8) -> Result<Header, Error> {
    match short_count {
        0..=23 => Ok(Header {
            major: 7,
            short_count,
            extended: None,
            header_len: 1,
            item_len: Some(short_count as u64),
        }),
        24 => {
            let v = read_be::<1>(data, offset + 1)?[0];
            if v < 24 {
                return Err(Error::InvalidSimple(v));
            }
            Ok(Header {
                major: 7,
                short_count,
                extended: Some(v as u64),
                header_len: 2,
                item_len: Some(v as u64),
            })
        }
        25 => Ok(Header {
            major: 7,
            short_count,
            extended: None,
            header_len: 1,
            item_len: Some(2),
        }),
        26 => Ok(Header {
            major: 7,
            short_count,
            extended: None,
            header_len: 1,
            item_len: Some(4),
        }),
        27 => Ok(Header {
            major: 7,
            short_count,
            extended: None,
            header_len: 1,
            item_len: Some(8),
        }),
        31 => Ok(Header {
            major: 7,
            short_count,
            extended: None,
            header_len: 1,
            item_len: Some(0),
        }),
        _ => Err(Error::InvalidMinorValue(short_count)),
    }
}

/// Parse a single item from the start of `data`, returning the item and the
/// exact number of bytes consumed.
pub fn read(data: &[u8]) -> Result<(Item, usize), Error> {
    read_at(data, 0)
}

/// Parse a single item starting at `offset`. The returned length counts from
/// `offset`, so back-to-back items can be parsed without re-scanning.
pub fn read_at(data: &[u8], offset: usize) -> Result<(Item, usize), Error> {
    read_item(data, offset, 0)
}

fn read_item(data: &[u8], offset: usize, depth: usize) -> Result<(Item, usize), Error> {
    if depth >= MAX_NESTING {
        return Err(Error::TooDeep);
    }

    let header = read_header(data, offset)?;
    match header.major {
        0 | 1 => read_int(&header),
        2 | 3 => read_string(&header, data, offset),
        4 => read_array(&header, data, offset, depth),
        5 => read_map(&header, data, offset, depth),
        6 => read_tag(&header, data, offset, depth),
        _ => read_special(&header, data, offset),
    }
}

fn read_int(header: &Header) -> Result<(Item, usize), Error> {
    let Some(n) = header.item_len else {
        return Err(Error::IndefiniteLength);
    };
    let value = if header.major == 0 {
        n as i128
    } else {
        -(n as i128) - 1
    };
    Ok((Item::Int(value), header.header_len))
}

/// Bounds-check a declared payload length against the remaining buffer
/// before slicing.
fn slice_payload(data: &[u8], start: usize, declared: u64) -> Result<(&[u8], usize), Error> {
    let len = usize::try_from(declared).map_err(|_| Error::NotEnoughData)?;
    let end = start.checked_add(len).ok_or(Error::NotEnoughData)?;
    let slice = data.get(start..end).ok_or(Error::NotEnoughData)?;
    Ok((slice, len))
}

fn read_string(header: &Header, data: &[u8], offset: usize) -> Result<(Item, usize), Error> {
    let start = offset + header.header_len;

    let Some(n) = header.item_len else {
        return read_chunked(header.major, data, start, header.header_len);
    };

    let (slice, len) = slice_payload(data, start, n)?;
    let item = if header.major == 3 {
        Item::Text(core::str::from_utf8(slice)?.to_owned())
    } else {
        Item::Bytes(slice.to_vec())
    };
    Ok((item, header.header_len + len))
}

/// Indefinite-length string body: definite chunks of the same major type,
/// terminated by a break marker.
fn read_chunked(
    major: u8,
    data: &[u8],
    start: usize,
    header_len: usize,
) -> Result<(Item, usize), Error> {
    let mut bytes = Vec::new();
    let mut text = String::new();
    let mut offset = start;

    loop {
        let header = read_header(data, offset)?;
        if header.major == 7 && header.short_count == 31 {
            offset += header.header_len;
            break;
        }
        if header.major != major {
            return Err(Error::InvalidChunk);
        }
        let Some(n) = header.item_len else {
            // nested indefinite chunk
            return Err(Error::InvalidChunk);
        };
        let (slice, len) = slice_payload(data, offset + header.header_len, n)?;
        if major == 3 {
            text.push_str(core::str::from_utf8(slice)?);
        } else {
            bytes.extend_from_slice(slice);
        }
        offset += header.header_len + len;
    }

    let item = if major == 3 {
        Item::Text(text)
    } else {
        Item::Bytes(bytes)
    };
    Ok((item, offset - start + header_len))
}

/// Items until a break marker, for indefinite-length arrays and maps.
fn read_until_break(data: &[u8], start: usize, depth: usize) -> Result<(Vec<Item>, usize), Error> {
    let mut items = Vec::new();
    let mut len = 0;

    loop {
        let header = read_header(data, start + len)?;
        if header.major == 7 && header.short_count == 31 {
            len += header.header_len;
            return Ok((items, len));
        }
        let (item, item_len) = read_item(data, start + len, depth + 1)?;
        items.push(item);
        len += item_len;
    }
}

fn read_array(
    header: &Header,
    data: &[u8],
    offset: usize,
    depth: usize,
) -> Result<(Item, usize), Error> {
    let start = offset + header.header_len;

    let Some(count) = header.item_len else {
        let (items, len) = read_until_break(data, start, depth)?;
        return Ok((Item::Array(items), header.header_len + len));
    };

    let mut items = Vec::new();
    let mut len = 0;
    for _ in 0..count {
        let (item, item_len) = read_item(data, start + len, depth + 1)?;
        items.push(item);
        len += item_len;
    }
    Ok((Item::Array(items), header.header_len + len))
}

fn read_map(
    header: &Header,
    data: &[u8],
    offset: usize,
    depth: usize,
) -> Result<(Item, usize), Error> {
    let start = offset + header.header_len;

    let Some(count) = header.item_len else {
        let (items, len) = read_until_break(data, start, depth)?;
        if items.len() % 2 != 0 {
            return Err(Error::OddMapLength);
        }
        let mut entries = Vec::with_capacity(items.len() / 2);
        let mut items = items.into_iter();
        while let (Some(key), Some(value)) = (items.next(), items.next()) {
            entries.push((key, value));
        }
        return Ok((Item::Map(entries), header.header_len + len));
    };

    let mut entries = Vec::new();
    let mut len = 0;
    for _ in 0..count {
        let (key, key_len) = read_item(data, start + len, depth + 1)?;
        len += key_len;
        let (value, value_len) = read_item(data, start + len, depth + 1)?;
        len += value_len;
        entries.push((key, value));
    }
    Ok((Item::Map(entries), header.header_len + len))
}

fn read_tag(
    header: &Header,
    data: &[u8],
    offset: usize,
    depth: usize,
) -> Result<(Item, usize), Error> {
    let Some(tag) = header.item_len else {
        return Err(Error::IndefiniteLength);
    };
    let (item, len) = read_item(data, offset + header.header_len, depth + 1)?;
    Ok((Item::Tag(tag, Box::new(item)), header.header_len + len))
}

fn read_special(header: &Header, data: &[u8], offset: usize) -> Result<(Item, usize), Error> {
    let start = offset + header.header_len;

    match header.short_count {
        0..=23 => Ok((Item::Simple(header.short_count), header.header_len)),
        24 => match header.extended {
            Some(v) => Ok((Item::Simple(v as u8), header.header_len)),
            None => Err(Error::NotEnoughData),
        },
        25 => {
            let v = half::f16::from_be_bytes(read_be(data, start)?);
            Ok((Item::Float(v.into()), header.header_len + 2))
        }
        26 => {
            let v = f32::from_be_bytes(read_be(data, start)?);
            Ok((Item::Float(v.into()), header.header_len + 4))
        }
        27 => {
            let v = f64::from_be_bytes(read_be(data, start)?);
            Ok((Item::Float(v), header.header_len + 8))
        }
        31 => Err(Error::UnexpectedBreak),
        _ => Err(Error::InvalidMinorValue(header.short_count)),
    }
}
