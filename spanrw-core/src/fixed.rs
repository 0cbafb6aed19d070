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

//! Fixed-width primitive encoding with a per-call byte order.

/// Byte order of a fixed-width value on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    /// Byte order of the target platform.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endian = Endian::Little;
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endian = Endian::Big;

    /// `false` selects little-endian, `true` selects big-endian.
    #[inline(always)]
    pub fn from_big_endian_flag(is_big_endian: bool) -> Endian {
        if is_big_endian {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

/// A primitive that occupies exactly `SIZE` bytes on the wire.
///
/// Implemented for every integer width from 8 to 64 bits and for `f32`/`f64`.
/// `decode` must be handed exactly `SIZE` bytes; the cursor guarantees this
/// with a single bounds check before calling it.
pub trait FixedWidth: Copy {
    const SIZE: usize;

    fn decode(bytes: &[u8], endian: Endian) -> Self;

    fn encode(self, out: &mut [u8], endian: Endian);
}

macro_rules! impl_fixed_width {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedWidth for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline(always)]
                fn decode(bytes: &[u8], endian: Endian) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    match endian {
                        Endian::Little => <$ty>::from_le_bytes(raw),
                        Endian::Big => <$ty>::from_be_bytes(raw),
                    }
                }

                #[inline(always)]
                fn encode(self, out: &mut [u8], endian: Endian) {
                    let raw = match endian {
                        Endian::Little => self.to_le_bytes(),
                        Endian::Big => self.to_be_bytes(),
                    };
                    out.copy_from_slice(&raw);
                }
            }
        )*
    };
}

impl_fixed_width!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);
