// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Text codecs plugged into [`Reader`](crate::Reader) and
//! [`Writer`](crate::Writer) for string and character payloads.
//!
//! A codec only ever sees the payload bytes, so offsets in the errors it
//! returns are relative to the slice it was given. The cursor rebases them to
//! absolute buffer offsets.

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Outcome of feeding the code units read so far to [`TextCodec::decode_char`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharDecode {
    Complete(char),
    /// The bytes are a valid prefix; read another code unit.
    Incomplete,
    Invalid(&'static str),
}

pub trait TextCodec: Send + Sync {
    fn name(&self) -> &'static str;

    /// Bytes per code unit: 2 for UTF-16, 1 otherwise. Characters are read one
    /// unit at a time.
    fn unit_width(&self) -> usize;

    fn decode(&self, bytes: &[u8]) -> Result<String>;

    fn encode<'t>(&self, text: &'t str) -> Result<Cow<'t, [u8]>>;

    /// `bytes` holds the code units read so far, at most four bytes. Fewer
    /// bytes than one whole unit is `Incomplete`.
    fn decode_char(&self, bytes: &[u8]) -> CharDecode;

    /// Encodes `ch` into `out`, returning the number of bytes used.
    fn encode_char(&self, ch: char, out: &mut [u8; 4]) -> Result<usize>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8;

#[derive(Debug, Clone, Copy, Default)]
pub struct Utf16Le;

#[derive(Debug, Clone, Copy, Default)]
pub struct Latin1;

pub static UTF8: Utf8 = Utf8;
pub static UTF16_LE: Utf16Le = Utf16Le;
pub static LATIN1: Latin1 = Latin1;

impl TextCodec for Utf8 {
    fn name(&self) -> &'static str {
        "utf-8"
    }

    fn unit_width(&self) -> usize {
        1
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            Err(e) => Err(Error::invalid_encoding(
                self.name(),
                e.valid_up_to(),
                e.to_string(),
            )),
        }
    }

    fn encode<'t>(&self, text: &'t str) -> Result<Cow<'t, [u8]>> {
        Ok(Cow::Borrowed(text.as_bytes()))
    }

    fn decode_char(&self, bytes: &[u8]) -> CharDecode {
        match std::str::from_utf8(bytes) {
            Ok(s) => match s.chars().next() {
                Some(ch) => CharDecode::Complete(ch),
                None => CharDecode::Incomplete,
            },
            // error_len() is None when the input ends mid-sequence
            Err(e) if e.error_len().is_none() => CharDecode::Incomplete,
            Err(_) => CharDecode::Invalid("invalid utf-8 sequence"),
        }
    }

    fn encode_char(&self, ch: char, out: &mut [u8; 4]) -> Result<usize> {
        Ok(ch.encode_utf8(out).len())
    }
}

impl TextCodec for Utf16Le {
    fn name(&self) -> &'static str {
        "utf-16le"
    }

    fn unit_width(&self) -> usize {
        2
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        if bytes.len() % 2 != 0 {
            return Err(Error::invalid_encoding(
                self.name(),
                bytes.len() - 1,
                "odd number of bytes",
            ));
        }
        let units = bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]));
        let mut out = String::with_capacity(bytes.len() / 2);
        let mut unit_pos = 0;
        for decoded in char::decode_utf16(units) {
            match decoded {
                Ok(ch) => {
                    out.push(ch);
                    unit_pos += ch.len_utf16();
                }
                Err(e) => {
                    return Err(Error::invalid_encoding(
                        self.name(),
                        unit_pos * 2,
                        format!("unpaired surrogate {:#06X}", e.unpaired_surrogate()),
                    ))
                }
            }
        }
        Ok(out)
    }

    fn encode<'t>(&self, text: &'t str) -> Result<Cow<'t, [u8]>> {
        Ok(Cow::Owned(
            text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        ))
    }

    fn decode_char(&self, bytes: &[u8]) -> CharDecode {
        if bytes.len() < 2 {
            return CharDecode::Incomplete;
        }
        let unit = |i: usize| u16::from_le_bytes([bytes[i], bytes[i + 1]]);
        let first = unit(0);
        match first {
            0xD800..=0xDBFF if bytes.len() < 4 => CharDecode::Incomplete,
            0xD800..=0xDBFF => match unit(2) {
                second @ 0xDC00..=0xDFFF => {
                    let code = 0x10000
                        + (((first as u32) - 0xD800) << 10)
                        + ((second as u32) - 0xDC00);
                    match char::from_u32(code) {
                        Some(ch) => CharDecode::Complete(ch),
                        None => CharDecode::Invalid("invalid surrogate pair"),
                    }
                }
                _ => CharDecode::Invalid("high surrogate without low surrogate"),
            },
            0xDC00..=0xDFFF => CharDecode::Invalid("unpaired low surrogate"),
            _ => match char::from_u32(first as u32) {
                Some(ch) => CharDecode::Complete(ch),
                None => CharDecode::Invalid("invalid code unit"),
            },
        }
    }

    fn encode_char(&self, ch: char, out: &mut [u8; 4]) -> Result<usize> {
        let mut units = [0u16; 2];
        let units = ch.encode_utf16(&mut units);
        for (i, unit) in units.iter().enumerate() {
            out[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
        }
        Ok(units.len() * 2)
    }
}

impl TextCodec for Latin1 {
    fn name(&self) -> &'static str {
        "latin-1"
    }

    fn unit_width(&self) -> usize {
        1
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    fn encode<'t>(&self, text: &'t str) -> Result<Cow<'t, [u8]>> {
        if text.is_ascii() {
            return Ok(Cow::Borrowed(text.as_bytes()));
        }
        let mut out = Vec::with_capacity(text.len());
        for (index, ch) in text.chars().enumerate() {
            match u8::try_from(ch) {
                Ok(b) => out.push(b),
                Err(_) => {
                    return Err(Error::invalid_encoding(
                        self.name(),
                        index,
                        format!("{ch:?} is outside latin-1"),
                    ))
                }
            }
        }
        Ok(Cow::Owned(out))
    }

    fn decode_char(&self, bytes: &[u8]) -> CharDecode {
        match bytes.first() {
            Some(&b) => CharDecode::Complete(b as char),
            None => CharDecode::Incomplete,
        }
    }

    fn encode_char(&self, ch: char, out: &mut [u8; 4]) -> Result<usize> {
        match u8::try_from(ch) {
            Ok(b) => {
                out[0] = b;
                Ok(1)
            }
            Err(_) => Err(Error::invalid_encoding(
                self.name(),
                0,
                format!("{ch:?} is outside latin-1"),
            )),
        }
    }
}
