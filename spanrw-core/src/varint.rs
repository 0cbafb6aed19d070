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

//! 7-bit chunked variable-length integers.
//!
//! Values are split into little-endian groups of 7 bits. Every byte but the
//! last has its high bit set. This is the format used for string length
//! prefixes.
//!
//! Decoding stops at the first byte with a clear high bit, so trailing data is
//! never touched. The final permitted byte is range-checked instead of shifted
//! blindly: a `u32` has 4 bits left after 28, a `u64` has 1 bit left after 63.
//! Anything else is [`Error::MalformedVarInt`].

use crate::error::{Error, Result};

/// Longest encoding of a `u32`.
pub const MAX_LEN_32: usize = 5;
/// Longest encoding of a `u64`.
pub const MAX_LEN_64: usize = 10;

const CONTINUATION: u8 = 0x80;
const DATA_MASK: u8 = 0x7F;

#[inline(always)]
fn byte_at(buf: &[u8], offset: usize, index: usize) -> Result<u8> {
    match buf.get(offset + index) {
        Some(b) => Ok(*b),
        None => Err(Error::out_of_bounds(offset, index + 1, buf.len())),
    }
}

/// Decodes a `u32` starting at `buf[offset]`.
///
/// Returns the value and the number of bytes it occupied. Running off the end
/// of `buf` is [`Error::OutOfBounds`]; a fifth byte above `0b1111` is
/// [`Error::MalformedVarInt`].
pub fn decode_u32(buf: &[u8], offset: usize) -> Result<(u32, usize)> {
    const SAFE_BYTES: usize = MAX_LEN_32 - 1;

    let mut result = 0u32;
    let mut shift = 0;
    for i in 0..SAFE_BYTES {
        let b = byte_at(buf, offset, i)?;
        result |= ((b & DATA_MASK) as u32) << shift;
        if b & CONTINUATION == 0 {
            return Ok((result, i + 1));
        }
        shift += 7;
    }

    let b = byte_at(buf, offset, SAFE_BYTES)?;
    if b > 0b1111 {
        return Err(Error::malformed_varint(offset, MAX_LEN_32));
    }
    result |= (b as u32) << (SAFE_BYTES * 7);
    Ok((result, MAX_LEN_32))
}

/// Decodes a `u64` starting at `buf[offset]`. The tenth byte may only be
/// `0` or `1`.
pub fn decode_u64(buf: &[u8], offset: usize) -> Result<(u64, usize)> {
    const SAFE_BYTES: usize = MAX_LEN_64 - 1;

    let mut result = 0u64;
    let mut shift = 0;
    for i in 0..SAFE_BYTES {
        let b = byte_at(buf, offset, i)?;
        result |= ((b & DATA_MASK) as u64) << shift;
        if b & CONTINUATION == 0 {
            return Ok((result, i + 1));
        }
        shift += 7;
    }

    let b = byte_at(buf, offset, SAFE_BYTES)?;
    if b > 0b1 {
        return Err(Error::malformed_varint(offset, MAX_LEN_64));
    }
    result |= (b as u64) << (SAFE_BYTES * 7);
    Ok((result, MAX_LEN_64))
}

/// Number of bytes the minimal encoding of `value` occupies.
#[inline(always)]
pub fn encoded_len_u32(value: u32) -> usize {
    encoded_len_u64(value as u64)
}

#[inline(always)]
pub fn encoded_len_u64(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Minimal encoding of `value`; the first `len` bytes of the array are valid.
#[inline(always)]
pub fn encode_u32(value: u32) -> ([u8; MAX_LEN_32], usize) {
    let mut out = [0u8; MAX_LEN_32];
    let len = encode_into(value as u64, &mut out);
    (out, len)
}

#[inline(always)]
pub fn encode_u64(value: u64) -> ([u8; MAX_LEN_64], usize) {
    let mut out = [0u8; MAX_LEN_64];
    let len = encode_into(value, &mut out);
    (out, len)
}

#[inline(always)]
fn encode_into(mut value: u64, out: &mut [u8]) -> usize {
    let mut len = 0;
    while value >= CONTINUATION as u64 {
        out[len] = (value as u8) | CONTINUATION;
        value >>= 7;
        len += 1;
    }
    out[len] = value as u8;
    len + 1
}
