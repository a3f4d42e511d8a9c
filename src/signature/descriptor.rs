//! Method descriptor parser
//!
//! Grammar: `(` field* `)` (field | `V`), where a field is one of
//! `Z C S B I J F D`, `L` name `;`, or `[` field.

use super::SigEntry;
use crate::error::SignatureError;
use crate::interop::BasicType;

pub(super) fn parse(descriptor: &str) -> Result<(Vec<SigEntry>, SigEntry), SignatureError> {
    let bytes = descriptor.as_bytes();
    if bytes.first() != Some(&b'(') {
        return Err(SignatureError::MissingOpenParen);
    }

    let mut params = Vec::new();
    let mut pos = 1;
    loop {
        match bytes.get(pos) {
            None => return Err(SignatureError::UnexpectedEnd { offset: pos }),
            Some(b')') => break,
            Some(_) => {
                let (entry, next) = parse_field(descriptor, pos, false)?;
                params.push(entry);
                pos = next;
            }
        }
    }

    let (ret, end) = parse_field(descriptor, pos + 1, true)?;
    if end != bytes.len() {
        return Err(SignatureError::TrailingCharacters { offset: end });
    }
    Ok((params, ret))
}

/// Parse one field starting at `start`, returning it and the offset after it
fn parse_field(
    descriptor: &str,
    start: usize,
    allow_void: bool,
) -> Result<(SigEntry, usize), SignatureError> {
    let bytes = descriptor.as_bytes();
    let Some(&tag) = bytes.get(start) else {
        return Err(SignatureError::UnexpectedEnd { offset: start });
    };

    let primitive = match tag {
        b'Z' => Some(BasicType::Boolean),
        b'C' => Some(BasicType::Char),
        b'S' => Some(BasicType::Short),
        b'B' => Some(BasicType::Byte),
        b'I' => Some(BasicType::Int),
        b'J' => Some(BasicType::Long),
        b'F' => Some(BasicType::Float),
        b'D' => Some(BasicType::Double),
        _ => None,
    };
    if let Some(ty) = primitive {
        return Ok((SigEntry::new(ty), start + 1));
    }

    match tag {
        b'V' if allow_void => Ok((SigEntry::new(BasicType::Void), start + 1)),
        b'V' => Err(SignatureError::VoidParameter { offset: start }),
        b'L' => {
            let end = class_name_end(bytes, start)?;
            Ok((SigEntry::ranged(BasicType::Object, start..end), end))
        }
        b'[' => {
            let mut element = start;
            while bytes.get(element) == Some(&b'[') {
                element += 1;
            }
            let (_, end) = parse_field(descriptor, element, false)?;
            Ok((SigEntry::ranged(BasicType::Array, start..end), end))
        }
        _ => Err(SignatureError::UnknownTag {
            tag: descriptor
                .get(start..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER),
            offset: start,
        }),
    }
}

/// Offset just past the `;` closing the class name that starts at `start`
fn class_name_end(bytes: &[u8], start: usize) -> Result<usize, SignatureError> {
    let name_start = start + 1;
    let Some(len) = bytes[name_start..].iter().position(|&b| b == b';') else {
        return Err(SignatureError::UnterminatedClassName { offset: start });
    };
    if len == 0 {
        return Err(SignatureError::EmptyClassName { offset: start });
    }
    Ok(name_start + len + 1)
}
