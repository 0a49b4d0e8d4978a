// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/decoder.rs - TLV decoder for EMV QR payment payloads.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `decoder` Module
 *
 * Decodes the tag-length-value payload of an EMV QR code into a [Document].
 *
 * Every field is a two-digit tag, a two-digit decimal length, and a value of
 * that many bytes. Values of template tags (see
 * [Profile::container_tags]) are themselves TLV and are decoded
 * recursively.
 *
 * ## Usage Example
 *
 * ```
 * use emvqr::decoder::decode;
 *
 * let document = decode("00020152045812").unwrap();
 * let mcc = document.get("52").unwrap();
 * assert_eq!(mcc.name, "Merchant Category Code");
 * assert_eq!(mcc.as_str(), Some("5812"));
 * ```
 */

use std::sync::LazyLock;

use log::{debug, trace, warn};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::error::{DecodeError, Malformed};
use crate::profile::Profile;

static DEFAULT_PROFILE: LazyLock<Profile> = LazyLock::new(Profile::emv_mpm);

/// The value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// The raw value of a plain field.
    Text(String),
    /// The decoded contents of a template.
    Template(Document),
}

/// A single decoded field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlvField {
    /// The two-digit tag.
    pub tag: String,
    /// The name of the tag, or [crate::profile::UNKNOWN_NAME].
    pub name: String,
    /// The declared length of the value, in bytes.
    pub length: usize,
    /// The raw value, or the decoded contents of a template.
    pub value: Value,
}

impl TlvField {
    /// The raw value, if this is not a template.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::Text(s) => Some(s),
            Value::Template(_) => None,
        }
    }

    /// The decoded contents, if this is a template.
    pub fn as_document(&self) -> Option<&Document> {
        match &self.value {
            Value::Text(_) => None,
            Value::Template(d) => Some(d),
        }
    }
}

/// The fields of one TLV level, in the order they appear in the payload.
///
/// Tags are unique within a document. Inserting a tag that is already
/// present replaces the old field in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    fields: Vec<TlvField>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `field`, returning the field it replaced, if any.
    pub fn insert(&mut self, field: TlvField) -> Option<TlvField> {
        match self.fields.iter_mut().find(|f| f.tag == field.tag) {
            Some(existing) => Some(std::mem::replace(existing, field)),
            None => {
                self.fields.push(field);
                None
            }
        }
    }

    pub fn get(&self, tag: &str) -> Option<&TlvField> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TlvField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encodes the document back into a TLV payload.
    ///
    /// Lengths are taken from the encoded values, so a template's length
    /// reflects its children as they are now. For a document produced by
    /// [decode] from a payload with no repeated tags, this returns the
    /// original payload.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut String) {
        for field in &self.fields {
            let value = match &field.value {
                Value::Text(s) => s.clone(),
                Value::Template(d) => d.encode(),
            };
            out.push_str(&field.tag);
            out.push_str(&format!("{:02}", value.len()));
            out.push_str(&value);
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a TlvField;
    type IntoIter = std::slice::Iter<'a, TlvField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.tag, field)?;
        }
        map.end()
    }
}

/// Decodes `input` using the merchant-presented mode profile.
pub fn decode(input: &str) -> Result<Document, DecodeError> {
    decode_with(input, &DEFAULT_PROFILE)
}

/// Decodes `input` using `profile`.
///
/// Either the whole input is decoded or an error is returned; no partial
/// result is ever produced.
pub fn decode_with(input: &str, profile: &Profile) -> Result<Document, DecodeError> {
    if let Some(max) = profile.max_input_len {
        if input.len() > max {
            return Err(DecodeError::MalformedPayload {
                reason: Malformed::PayloadTooLong,
                offset: 0,
            });
        }
    }

    decode_level(input, 0, None, 0, profile)
}

fn decode_level(
    input: &str,
    base: usize,
    parent: Option<&str>,
    depth: usize,
    profile: &Profile,
) -> Result<Document, DecodeError> {
    let bytes = input.as_bytes();
    let mut document = Document::new();
    let mut i = 0;

    while i < bytes.len() {
        let fail = |reason| DecodeError::MalformedPayload {
            reason,
            offset: base + i,
        };
        let remaining = bytes.len() - i;

        if remaining < 2 {
            return Err(fail(Malformed::TruncatedTag));
        }
        if !bytes[i..i + 2].iter().all(u8::is_ascii_digit) {
            return Err(fail(Malformed::NonNumericTag));
        }
        // Both bytes are ASCII, so this cannot split a character.
        let tag = &input[i..i + 2];

        if remaining < 4 {
            return Err(fail(Malformed::TruncatedLength));
        }
        let length =
            parse_length(&bytes[i + 2..i + 4]).ok_or(fail(Malformed::NonNumericLength))?;

        let start = i + 4;
        let end = start + length;
        if end > bytes.len() {
            return Err(fail(Malformed::ValueExceedsBounds));
        }
        let raw = input
            .get(start..end)
            .ok_or(fail(Malformed::SplitCharacter))?;

        let value = if profile.is_container(parent, tag) {
            if depth >= profile.max_depth {
                return Err(fail(Malformed::NestingTooDeep));
            }
            debug!("Decoding template {} at offset {}", tag, base + i);
            Value::Template(decode_level(raw, base + start, Some(tag), depth + 1, profile)?)
        } else {
            Value::Text(raw.to_string())
        };

        let name = profile.name_of(parent, tag);
        trace!("{} {} ({}) at offset {}", tag, name, length, base + i);

        let replaced = document.insert(TlvField {
            tag: tag.to_string(),
            name: name.to_string(),
            length,
            value,
        });
        if replaced.is_some() {
            warn!("Tag {} repeated at offset {}, keeping the later value", tag, base + i);
        }

        i = end;
    }

    Ok(document)
}

fn parse_length(digits: &[u8]) -> Option<usize> {
    match digits {
        [tens, ones] if tens.is_ascii_digit() && ones.is_ascii_digit() => {
            Some(usize::from(tens - b'0') * 10 + usize::from(ones - b'0'))
        }
        _ => None,
    }
}
