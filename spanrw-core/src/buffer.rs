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

//! Cursor-based [`Reader`] and [`Writer`] over caller-owned byte slices.
//!
//! # Position rules
//!
//! Every successful call advances the cursor by exactly the bytes it consumed
//! or produced. On failure:
//!
//! - bounds failures (`OutOfBounds`, `BufferTooSmall`) leave the cursor where
//!   it was, including for strings, characters, varints and VInts that run
//!   off the end of the buffer;
//! - `MalformedVarInt` leaves the cursor after the bytes the decoder consumed.
//!   A 7-bit varint cannot be "un-read", so the reader must be treated as
//!   poisoned and discarded;
//! - `InvalidVInt`, `InvalidDecimal` and `InvalidEncoding` leave the cursor
//!   where it was.
//!
//! # Invariants
//!
//! - `cursor <= bf.len()` at all times.
//! - The reader never modifies the buffer; the writer never grows it.
//! - Every access is preceded by a single bounds check, no per-byte checks on
//!   the fixed-width path.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::fixed::{Endian, FixedWidth};
use crate::text::{CharDecode, TextCodec, UTF8};
use crate::types::{Decimal128, Timestamp};
use crate::varint;
use crate::vint::{self, VInt};

const SIZE_OF_GUID: usize = 16;
const SIZE_OF_DECIMAL: usize = 16;
const MAX_CHAR_BYTES: usize = 4;

pub struct Reader<'a> {
    bf: &'a [u8],
    cursor: usize,
    codec: &'a dyn TextCodec,
}

impl<'a> Reader<'a> {
    /// Reader using UTF-8 for strings and characters.
    #[inline(always)]
    pub fn new(bf: &'a [u8]) -> Reader<'a> {
        Reader::with_codec(bf, &UTF8)
    }

    #[inline(always)]
    pub fn with_codec(bf: &'a [u8], codec: &'a dyn TextCodec) -> Reader<'a> {
        Reader {
            bf,
            cursor: 0,
            codec,
        }
    }

    pub fn codec(&self) -> &'a dyn TextCodec {
        self.codec
    }

    /// The whole underlying buffer, independent of the cursor.
    #[inline(always)]
    pub fn buffer(&self) -> &'a [u8] {
        self.bf
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bf.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.bf.len() - self.cursor
    }

    /// Moves the cursor to an absolute offset; `position == len()` is allowed.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.bf.len() {
            return Err(Error::invalid_position(position, self.bf.len()));
        }
        self.cursor = position;
        Ok(())
    }

    #[inline(always)]
    pub fn slice_after_cursor(&self) -> &'a [u8] {
        &self.bf[self.cursor..]
    }

    #[inline(always)]
    fn check_bound(&self, n: usize) -> Result<()> {
        if n > self.bf.len() - self.cursor {
            Err(Error::out_of_bounds(self.cursor, n, self.bf.len()))
        } else {
            Ok(())
        }
    }

    #[inline(always)]
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.check_bound(n)?;
        self.cursor += n;
        Ok(())
    }

    #[inline(always)]
    pub fn peek_u8(&self) -> Result<u8> {
        match self.bf.get(self.cursor) {
            Some(b) => Ok(*b),
            None => Err(Error::out_of_bounds(self.cursor, 1, self.bf.len())),
        }
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        let b = self.peek_u8()?;
        self.cursor += 1;
        Ok(b)
    }

    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    #[inline(always)]
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads any fixed-width primitive in the requested byte order.
    #[inline(always)]
    pub fn read<T: FixedWidth>(&mut self, endian: Endian) -> Result<T> {
        self.check_bound(T::SIZE)?;
        let value = T::decode(&self.bf[self.cursor..self.cursor + T::SIZE], endian);
        self.cursor += T::SIZE;
        Ok(value)
    }

    #[inline(always)]
    pub fn read_u16(&mut self, endian: Endian) -> Result<u16> {
        self.read(endian)
    }

    #[inline(always)]
    pub fn read_i16(&mut self, endian: Endian) -> Result<i16> {
        self.read(endian)
    }

    #[inline(always)]
    pub fn read_u32(&mut self, endian: Endian) -> Result<u32> {
        self.read(endian)
    }

    #[inline(always)]
    pub fn read_i32(&mut self, endian: Endian) -> Result<i32> {
        self.read(endian)
    }

    #[inline(always)]
    pub fn read_u64(&mut self, endian: Endian) -> Result<u64> {
        self.read(endian)
    }

    #[inline(always)]
    pub fn read_i64(&mut self, endian: Endian) -> Result<i64> {
        self.read(endian)
    }

    #[inline(always)]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read(Endian::Little)
    }

    #[inline(always)]
    pub fn read_f64(&mut self) -> Result<f64> {
        self.read(Endian::Little)
    }

    /// Four little-endian words `lo, mid, hi, flags`. A flags word with
    /// reserved bits or a scale above 28 is `InvalidDecimal` and nothing is
    /// consumed.
    pub fn read_decimal(&mut self) -> Result<Decimal128> {
        self.check_bound(SIZE_OF_DECIMAL)?;
        let bytes = &self.bf[self.cursor..self.cursor + SIZE_OF_DECIMAL];
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::decode(chunk, Endian::Little);
        }
        match Decimal128::try_from_words(words) {
            Some(value) => {
                self.cursor += SIZE_OF_DECIMAL;
                Ok(value)
            }
            None => Err(Error::invalid_decimal(self.cursor, words[3])),
        }
    }

    /// Borrows the next `n` bytes without copying.
    #[inline(always)]
    pub fn read_slice(&mut self, n: usize) -> Result<&'a [u8]> {
        self.check_bound(n)?;
        let result = &self.bf[self.cursor..self.cursor + n];
        self.cursor += n;
        Ok(result)
    }

    /// Owned copy of the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.read_slice(n)?.to_vec())
    }

    /// Copies the next `n` bytes into `dst[offset..offset + n]` and returns `n`.
    /// Fails without consuming anything if either side is too short.
    pub fn read_bytes_into(&mut self, dst: &mut [u8], offset: usize, n: usize) -> Result<usize> {
        if offset > dst.len() || n > dst.len() - offset {
            return Err(Error::out_of_bounds(offset, n, dst.len()));
        }
        let src = self.read_slice(n)?;
        dst[offset..offset + n].copy_from_slice(src);
        Ok(n)
    }

    /// 16 bytes in the mixed-endian GUID layout.
    pub fn read_guid(&mut self) -> Result<Uuid> {
        let mut raw = [0u8; SIZE_OF_GUID];
        raw.copy_from_slice(self.read_slice(SIZE_OF_GUID)?);
        Ok(Uuid::from_bytes_le(raw))
    }

    pub fn read_timestamp(&mut self) -> Result<Timestamp> {
        Ok(Timestamp::from_binary(self.read_i64(Endian::Little)?))
    }

    /// Decodes one character, feeding the codec one code unit at a time until
    /// it has a complete character.
    pub fn read_char(&mut self) -> Result<char> {
        let width = self.codec.unit_width();
        let mut used = 0;
        while used + width <= MAX_CHAR_BYTES {
            used += width;
            if used > self.remaining() {
                return Err(Error::out_of_bounds(self.cursor, used, self.bf.len()));
            }
            match self
                .codec
                .decode_char(&self.bf[self.cursor..self.cursor + used])
            {
                CharDecode::Complete(ch) => {
                    self.cursor += used;
                    return Ok(ch);
                }
                CharDecode::Incomplete => continue,
                CharDecode::Invalid(reason) => {
                    return Err(Error::invalid_encoding(
                        self.codec.name(),
                        self.cursor,
                        reason,
                    ))
                }
            }
        }
        Err(Error::invalid_encoding(
            self.codec.name(),
            self.cursor,
            "character exceeds 4 bytes",
        ))
    }

    /// 7-bit varint byte count followed by that many bytes of encoded text.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.cursor;
        let (len, prefix) = self.decode_varint(varint::decode_u32)?;
        let body = start + prefix;
        let len = len as usize;
        if len > self.bf.len() - body {
            return Err(Error::out_of_bounds(body, len, self.bf.len()));
        }
        let text = self
            .codec
            .decode(&self.bf[body..body + len])
            .map_err(|e| e.at_offset(body))?;
        self.cursor = body + len;
        Ok(text)
    }

    #[inline(always)]
    pub fn read_varuint32(&mut self) -> Result<u32> {
        let (value, n) = self.decode_varint(varint::decode_u32)?;
        self.cursor += n;
        Ok(value)
    }

    /// Same wire format as [`Reader::read_varuint32`]; the bit pattern is
    /// reinterpreted as signed, there is no zigzag step.
    #[inline(always)]
    pub fn read_varint32(&mut self) -> Result<i32> {
        Ok(self.read_varuint32()? as i32)
    }

    #[inline(always)]
    pub fn read_varuint64(&mut self) -> Result<u64> {
        let (value, n) = self.decode_varint(varint::decode_u64)?;
        self.cursor += n;
        Ok(value)
    }

    #[inline(always)]
    pub fn read_varint64(&mut self) -> Result<i64> {
        Ok(self.read_varuint64()? as i64)
    }

    /// Runs a varint decoder at the cursor without advancing it. On
    /// `MalformedVarInt` the cursor is moved past the consumed bytes.
    #[inline(always)]
    fn decode_varint<T>(
        &mut self,
        decode: fn(&[u8], usize) -> Result<(T, usize)>,
    ) -> Result<(T, usize)> {
        decode(self.bf, self.cursor).map_err(|err| {
            if let Error::MalformedVarInt { offset, max_bytes } = err {
                self.cursor = offset + max_bytes;
            }
            err
        })
    }

    /// Reads an EBML VInt of at most `max_length` bytes.
    pub fn read_vint(&mut self, max_length: u32) -> Result<VInt> {
        let value = vint::decode(self.bf, self.cursor, max_length)?;
        self.cursor += value.length() as usize;
        Ok(value)
    }

    #[inline(always)]
    pub fn read_vint_default(&mut self) -> Result<VInt> {
        self.read_vint(VInt::DEFAULT_MAX_LENGTH)
    }

    #[inline(always)]
    pub fn reset_cursor_to_here(&self) -> impl FnOnce(&mut Self) {
        let raw_cursor = self.cursor;
        move |this: &mut Self| {
            this.cursor = raw_cursor;
        }
    }
}

pub struct Writer<'a> {
    bf: &'a mut [u8],
    cursor: usize,
    codec: &'a dyn TextCodec,
}

impl<'a> Writer<'a> {
    #[inline(always)]
    pub fn new(bf: &'a mut [u8]) -> Writer<'a> {
        Writer::with_codec(bf, &UTF8)
    }

    #[inline(always)]
    pub fn with_codec(bf: &'a mut [u8], codec: &'a dyn TextCodec) -> Writer<'a> {
        Writer {
            bf,
            cursor: 0,
            codec,
        }
    }

    pub fn codec(&self) -> &'a dyn TextCodec {
        self.codec
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Total capacity of the underlying buffer.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bf.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.bf.len() - self.cursor
    }

    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.bf.len() {
            return Err(Error::invalid_position(position, self.bf.len()));
        }
        self.cursor = position;
        Ok(())
    }

    /// Bytes written so far, `0..position()`.
    #[inline(always)]
    pub fn written(&self) -> &[u8] {
        &self.bf[..self.cursor]
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.written().to_vec()
    }

    #[inline(always)]
    fn reserve(&self, n: usize) -> Result<()> {
        if n > self.bf.len() - self.cursor {
            Err(Error::buffer_too_small(self.cursor, n, self.bf.len()))
        } else {
            Ok(())
        }
    }

    #[inline(always)]
    pub fn write_bytes(&mut self, v: &[u8]) -> Result<usize> {
        let len = v.len();
        self.reserve(len)?;
        self.bf[self.cursor..self.cursor + len].copy_from_slice(v);
        self.cursor += len;
        Ok(len)
    }

    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) -> Result<usize> {
        self.reserve(1)?;
        self.bf[self.cursor] = value;
        self.cursor += 1;
        Ok(1)
    }

    #[inline(always)]
    pub fn write_i8(&mut self, value: i8) -> Result<usize> {
        self.write_u8(value as u8)
    }

    #[inline(always)]
    pub fn write_bool(&mut self, value: bool) -> Result<usize> {
        self.write_u8(if value { 1 } else { 0 })
    }

    #[inline(always)]
    pub fn write<T: FixedWidth>(&mut self, value: T, endian: Endian) -> Result<usize> {
        self.reserve(T::SIZE)?;
        value.encode(&mut self.bf[self.cursor..self.cursor + T::SIZE], endian);
        self.cursor += T::SIZE;
        Ok(T::SIZE)
    }

    #[inline(always)]
    pub fn write_u16(&mut self, value: u16, endian: Endian) -> Result<usize> {
        self.write(value, endian)
    }

    #[inline(always)]
    pub fn write_i16(&mut self, value: i16, endian: Endian) -> Result<usize> {
        self.write(value, endian)
    }

    #[inline(always)]
    pub fn write_u32(&mut self, value: u32, endian: Endian) -> Result<usize> {
        self.write(value, endian)
    }

    #[inline(always)]
    pub fn write_i32(&mut self, value: i32, endian: Endian) -> Result<usize> {
        self.write(value, endian)
    }

    #[inline(always)]
    pub fn write_u64(&mut self, value: u64, endian: Endian) -> Result<usize> {
        self.write(value, endian)
    }

    #[inline(always)]
    pub fn write_i64(&mut self, value: i64, endian: Endian) -> Result<usize> {
        self.write(value, endian)
    }

    #[inline(always)]
    pub fn write_f32(&mut self, value: f32) -> Result<usize> {
        self.write(value, Endian::Little)
    }

    #[inline(always)]
    pub fn write_f64(&mut self, value: f64) -> Result<usize> {
        self.write(value, Endian::Little)
    }

    pub fn write_decimal(&mut self, value: &Decimal128) -> Result<usize> {
        let mut raw = [0u8; SIZE_OF_DECIMAL];
        for (chunk, word) in raw.chunks_exact_mut(4).zip(value.words()) {
            word.encode(chunk, Endian::Little);
        }
        self.write_bytes(&raw)
    }

    pub fn write_guid(&mut self, value: &Uuid) -> Result<usize> {
        self.write_bytes(&value.to_bytes_le())
    }

    pub fn write_timestamp(&mut self, value: Timestamp) -> Result<usize> {
        self.write_i64(value.to_binary(), Endian::Little)
    }

    pub fn write_char(&mut self, ch: char) -> Result<usize> {
        let mut scratch = [0u8; MAX_CHAR_BYTES];
        let n = self
            .codec
            .encode_char(ch, &mut scratch)
            .map_err(|e| e.at_offset(self.cursor))?;
        self.write_bytes(&scratch[..n])
    }

    /// Writes the 7-bit varint byte count, then the encoded text. Either both
    /// fit or nothing is written.
    pub fn write_string(&mut self, text: &str) -> Result<usize> {
        let bytes = self
            .codec
            .encode(text)
            .map_err(|e| e.at_offset(self.cursor))?;
        let len = match u32::try_from(bytes.len()) {
            Ok(len) => len,
            Err(_) => {
                return Err(Error::invalid_encoding(
                    self.codec.name(),
                    self.cursor,
                    "encoded string exceeds u32::MAX bytes",
                ))
            }
        };
        let (prefix, prefix_len) = varint::encode_u32(len);
        self.reserve(prefix_len + bytes.len())?;
        self.write_bytes(&prefix[..prefix_len])?;
        self.write_bytes(&bytes)?;
        Ok(prefix_len + bytes.len())
    }

    #[inline(always)]
    pub fn write_varuint32(&mut self, value: u32) -> Result<usize> {
        let (bytes, len) = varint::encode_u32(value);
        self.write_bytes(&bytes[..len])
    }

    /// Writes the two's complement bit pattern; negative values take 5 bytes.
    #[inline(always)]
    pub fn write_varint32(&mut self, value: i32) -> Result<usize> {
        self.write_varuint32(value as u32)
    }

    #[inline(always)]
    pub fn write_varuint64(&mut self, value: u64) -> Result<usize> {
        let (bytes, len) = varint::encode_u64(value);
        self.write_bytes(&bytes[..len])
    }

    #[inline(always)]
    pub fn write_varint64(&mut self, value: i64) -> Result<usize> {
        self.write_varuint64(value as u64)
    }

    /// Emits exactly `value.length()` bytes reproducing `value.encoded_value()`.
    pub fn write_vint(&mut self, value: &VInt) -> Result<usize> {
        let (bytes, len) = value.to_bytes();
        self.write_bytes(&bytes[..len])
    }
}
