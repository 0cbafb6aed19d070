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

//! # spanrw-core
//!
//! Cursor-based binary decoding and encoding over caller-owned byte slices.
//!
//! A [`Reader`] borrows an immutable buffer and pulls values off it; a
//! [`Writer`] borrows a fixed-size mutable buffer and pushes values into it.
//! Neither allocates for the buffer itself and the writer never grows it.
//!
//! ## Modules
//!
//! - **`buffer`**: [`Reader`] and [`Writer`], position tracking and bounds rules
//! - **`fixed`**: fixed-width primitives with a per-call [`Endian`] selector
//! - **`varint`**: 7-bit chunked integers, used for string length prefixes
//! - **`vint`**: EBML self-describing integers ([`VInt`])
//! - **`text`**: pluggable [`TextCodec`]s for string payloads
//! - **`types`**: [`Decimal128`] and [`Timestamp`]
//! - **`error`**: the [`Error`] taxonomy
//!
//! ## Wire formats
//!
//! | Value            | Encoding                                                  |
//! |------------------|-----------------------------------------------------------|
//! | integers         | caller-selected byte order per call                       |
//! | `f32`/`f64`      | IEEE-754 bits, little-endian                              |
//! | 7-bit varint     | LE base-128, continuation bit `0x80`, at most 5/10 bytes  |
//! | VInt             | length marker in the leading byte, 1..=8 bytes            |
//! | string           | 7-bit varint byte count + bytes in the reader's codec     |
//! | GUID             | first three fields little-endian, last 8 bytes verbatim   |
//! | decimal          | four little-endian `u32` words `lo, mid, hi, flags`       |
//! | timestamp        | little-endian `i64` tick value                            |
//!
//! ## Usage
//!
//! ```rust
//! use spanrw_core::{Endian, Reader, VInt, Writer};
//!
//! let mut buf = [0u8; 32];
//! let mut writer = Writer::new(&mut buf);
//! writer.write_u32(0xCAFE_BABE, Endian::Big)?;
//! writer.write_string("Hello World")?;
//! writer.write_vint(&VInt::from_value(127)?)?;
//! let len = writer.position();
//!
//! let mut reader = Reader::new(&buf[..len]);
//! assert_eq!(reader.read_u32(Endian::Big)?, 0xCAFE_BABE);
//! assert_eq!(reader.read_string()?, "Hello World");
//! assert_eq!(reader.read_vint(4)?.value(), 127);
//! # Ok::<(), spanrw_core::Error>(())
//! ```
//!
//! ## Threading
//!
//! A cursor is a single mutable position and is meant for one traversal on
//! one thread. Any number of readers may share a buffer; a writer holds the
//! only (mutable) borrow of its buffer for as long as it lives.

pub mod buffer;
pub mod error;
pub mod fixed;
pub mod text;
pub mod types;
pub mod varint;
pub mod vint;

pub use buffer::{Reader, Writer};
pub use error::{Error, Result};
pub use fixed::{Endian, FixedWidth};
pub use text::{CharDecode, Latin1, TextCodec, Utf16Le, Utf8, LATIN1, UTF16_LE, UTF8};
pub use types::{Decimal128, Timestamp, TimestampKind};
pub use uuid::Uuid;
pub use vint::VInt;
