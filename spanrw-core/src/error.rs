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

//! Error type shared by every reader and writer operation.
//!
//! Errors are always built through the snake_case constructors on [`Error`]
//! rather than the enum variants directly. The constructors are `#[cold]`, so
//! the happy path of the cursor stays small, and they are the single place
//! where failures are reported to `tracing` and where the
//! `SPANRW_PANIC_ON_ERROR` switch is honoured.
//!
//! # Debugging corrupt input
//!
//! Set `SPANRW_PANIC_ON_ERROR=1` (or `true`) in the environment and every
//! error constructor panics instead of returning. Combined with
//! `RUST_BACKTRACE=1` this points straight at the read that hit the bad byte.

use std::borrow::Cow;
use std::sync::OnceLock;

use thiserror::Error;

/// Environment variable consulted once per process by [`panic_on_error`].
pub const PANIC_ON_ERROR_ENV: &str = "SPANRW_PANIC_ON_ERROR";

static PANIC_ON_ERROR: OnceLock<bool> = OnceLock::new();

/// Returns true when `SPANRW_PANIC_ON_ERROR` is set to `1` or `true`.
pub fn panic_on_error() -> bool {
    *PANIC_ON_ERROR.get_or_init(|| {
        std::env::var(PANIC_ON_ERROR_ENV)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A read needed more bytes than the buffer holds. Position is untouched.
    #[error("out of bounds: {offset} + {len} > {capacity}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    /// A 7-bit varint ran past its maximum group count or overflowed in the
    /// final group. The cursor has consumed the offending bytes.
    #[error("malformed 7-bit varint at offset {offset} (limit {max_bytes} bytes)")]
    MalformedVarInt { offset: usize, max_bytes: usize },

    /// No VInt length marker was found within the permitted length.
    #[error("invalid VInt at offset {offset}: no length marker within {max_length} bytes")]
    InvalidVInt { offset: usize, max_length: u32 },

    /// A value cannot be represented as a VInt of the requested length.
    #[error("value {value} does not fit in a VInt of {length} bytes")]
    VIntTooLarge { value: u64, length: u32 },

    /// A decimal flags word has reserved bits set or a scale above 28.
    #[error("invalid decimal at offset {offset}: flags {flags:#010X}")]
    InvalidDecimal { offset: usize, flags: u32 },

    /// The text codec rejected a byte sequence or character.
    #[error("invalid {codec} encoding at offset {offset}: {reason}")]
    InvalidEncoding {
        codec: &'static str,
        offset: usize,
        reason: Cow<'static, str>,
    },

    /// A write needed more room than the buffer has left. Nothing was written.
    #[error("buffer too small: {offset} + {len} > {capacity}")]
    BufferTooSmall {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[error("position {position} is past the end of a {len} byte buffer")]
    InvalidPosition { position: usize, len: usize },
}

impl Error {
    #[inline(never)]
    #[cold]
    #[track_caller]
    pub fn out_of_bounds(offset: usize, len: usize, capacity: usize) -> Self {
        tracing::debug!(offset, len, capacity, "read out of bounds");
        Self::raise(Error::OutOfBounds {
            offset,
            len,
            capacity,
        })
    }

    #[inline(never)]
    #[cold]
    #[track_caller]
    pub fn malformed_varint(offset: usize, max_bytes: usize) -> Self {
        tracing::debug!(offset, max_bytes, "malformed 7-bit varint");
        Self::raise(Error::MalformedVarInt { offset, max_bytes })
    }

    #[inline(never)]
    #[cold]
    #[track_caller]
    pub fn invalid_vint(offset: usize, max_length: u32) -> Self {
        tracing::debug!(offset, max_length, "VInt length marker not found");
        Self::raise(Error::InvalidVInt { offset, max_length })
    }

    #[inline(never)]
    #[cold]
    #[track_caller]
    pub fn vint_too_large(value: u64, length: u32) -> Self {
        tracing::debug!(value, length, "value does not fit VInt length");
        Self::raise(Error::VIntTooLarge { value, length })
    }

    #[inline(never)]
    #[cold]
    #[track_caller]
    pub fn invalid_decimal(offset: usize, flags: u32) -> Self {
        tracing::debug!(offset, flags, "invalid decimal flags");
        Self::raise(Error::InvalidDecimal { offset, flags })
    }

    #[inline(never)]
    #[cold]
    #[track_caller]
    pub fn invalid_encoding<S: Into<Cow<'static, str>>>(
        codec: &'static str,
        offset: usize,
        reason: S,
    ) -> Self {
        let reason = reason.into();
        tracing::debug!(codec, offset, reason = %reason, "text codec rejected input");
        Self::raise(Error::InvalidEncoding {
            codec,
            offset,
            reason,
        })
    }

    #[inline(never)]
    #[cold]
    #[track_caller]
    pub fn buffer_too_small(offset: usize, len: usize, capacity: usize) -> Self {
        tracing::debug!(offset, len, capacity, "write exceeds buffer capacity");
        Self::raise(Error::BufferTooSmall {
            offset,
            len,
            capacity,
        })
    }

    #[inline(never)]
    #[cold]
    #[track_caller]
    pub fn invalid_position(position: usize, len: usize) -> Self {
        tracing::debug!(position, len, "cursor position out of range");
        Self::raise(Error::InvalidPosition { position, len })
    }

    /// Re-anchors an encoding error produced by a codec (which only sees a
    /// slice) at the absolute offset of the cursor.
    pub(crate) fn at_offset(self, base: usize) -> Self {
        match self {
            Error::InvalidEncoding {
                codec,
                offset,
                reason,
            } => Error::InvalidEncoding {
                codec,
                offset: base + offset,
                reason,
            },
            other => other,
        }
    }

    #[track_caller]
    fn raise(err: Error) -> Self {
        if panic_on_error() {
            panic!("{PANIC_ON_ERROR_ENV}: {err}");
        }
        err
    }
}
