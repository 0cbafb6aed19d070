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

//! EBML self-describing variable-length integers.
//!
//! The position of the highest set bit of the leading byte (the marker)
//! gives the total length: `1xxx_xxxx` is one byte, `01xx_xxxx` two bytes, and
//! so on down to `0000_0001` for eight bytes. The bits below the marker and
//! every following byte are the big-endian value.
//!
//! ```text
//! 0x40 0x7F            -> length 2, value 127, encoded 0x407F
//! 0x10 0xDE 0xFF 0xAD  -> length 4, value 0xDEFFAD, encoded 0x10DEFFAD
//! ```
//!
//! Decoding accepts any marker position inside the caller's limit, minimal or
//! not. Encoding through [`VInt::from_value`] is always minimal.

use std::fmt;

use crate::error::{Error, Result};

/// A decoded VInt together with the exact bytes it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VInt {
    value: u64,
    length: u32,
    encoded_value: u64,
}

impl VInt {
    /// Widest VInt whose encoded form fits a `u64`.
    pub const MAX_LENGTH: u32 = 8;
    /// Limit used by [`crate::Reader::read_vint_default`], the EBML element id width.
    pub const DEFAULT_MAX_LENGTH: u32 = 4;

    /// Builds the minimal encoding of `value`. Fails for values whose only
    /// encoding would be the eight byte "unknown size" pattern or wider.
    pub fn from_value(value: u64) -> Result<VInt> {
        let length = VInt::minimal_size(value);
        if value >= data_mask(length) {
            return Err(Error::vint_too_large(value, length));
        }
        VInt::with_length(value, length)
    }

    /// Builds an encoding of exactly `length` bytes, which may be longer than
    /// the minimal one.
    pub fn with_length(value: u64, length: u32) -> Result<VInt> {
        if length == 0 || length > VInt::MAX_LENGTH || value >> (7 * length) != 0 {
            return Err(Error::vint_too_large(value, length));
        }
        let marker = 0x80u64 >> (length - 1);
        Ok(VInt {
            value,
            length,
            encoded_value: (marker << (8 * (length - 1))) | value,
        })
    }

    /// Smallest length whose data bits hold `value` without producing the
    /// all-ones pattern, which EBML reserves for "unknown size". Values too
    /// large for eight bytes report [`VInt::MAX_LENGTH`].
    pub fn minimal_size(value: u64) -> u32 {
        (1..VInt::MAX_LENGTH)
            .find(|&length| value < data_mask(length))
            .unwrap_or(VInt::MAX_LENGTH)
    }

    #[inline(always)]
    pub fn value(&self) -> u64 {
        self.value
    }

    #[inline(always)]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// The raw wire bytes as a big-endian integer, marker bit included.
    #[inline(always)]
    pub fn encoded_value(&self) -> u64 {
        self.encoded_value
    }

    /// True when every data bit is set, the EBML "unknown size" sentinel.
    pub fn is_unknown_size(&self) -> bool {
        self.value == data_mask(self.length)
    }

    /// Wire bytes; the first `length` entries of the array are valid.
    pub fn to_bytes(&self) -> ([u8; 8], usize) {
        let len = self.length as usize;
        let mut out = [0u8; 8];
        out[..len].copy_from_slice(&self.encoded_value.to_be_bytes()[8 - len..]);
        (out, len)
    }
}

impl TryFrom<u64> for VInt {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self> {
        VInt::from_value(value)
    }
}

impl fmt::Display for VInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VInt, value = {}, length = {}, encoded = {:#X}",
            self.value, self.length, self.encoded_value
        )
    }
}

#[inline(always)]
fn data_mask(length: u32) -> u64 {
    (1u64 << (7 * length)) - 1
}

/// Decodes a VInt starting at `buf[offset]`, allowing at most `max_length`
/// bytes (clamped to [`VInt::MAX_LENGTH`]).
///
/// Fails with [`Error::InvalidVInt`] when no marker bit is set within the
/// limit (a zero leading byte always fails) and with [`Error::OutOfBounds`]
/// when the buffer ends before the claimed length.
pub fn decode(buf: &[u8], offset: usize, max_length: u32) -> Result<VInt> {
    let max_length = max_length.min(VInt::MAX_LENGTH);
    let b1 = match buf.get(offset) {
        Some(b) => *b,
        None => return Err(Error::out_of_bounds(offset, 1, buf.len())),
    };

    for i in 0..max_length {
        let mask = 0x80u8 >> i;
        if b1 & mask == 0 {
            continue;
        }
        let length = i as usize + 1;
        let tail = match buf.get(offset + 1..offset + length) {
            Some(tail) => tail,
            None => return Err(Error::out_of_bounds(offset, length, buf.len())),
        };
        let mut raw = b1 as u64;
        let mut value = (b1 & !mask) as u64;
        for &b in tail {
            raw = (raw << 8) | b as u64;
            value = (value << 8) | b as u64;
        }
        return Ok(VInt {
            value,
            length: i + 1,
            encoded_value: raw,
        });
    }

    Err(Error::invalid_vint(offset, max_length))
}
