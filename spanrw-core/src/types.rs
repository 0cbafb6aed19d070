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

//! Composite values with a fixed wire layout: 128-bit decimals and tick
//! timestamps. GUIDs use [`uuid::Uuid`] directly.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// A 128-bit decimal: 96-bit unsigned mantissa, a power-of-ten scale and a
/// sign, stored as four 32-bit words `lo, mid, hi, flags`.
///
/// `flags` holds the scale in bits 16..=23 and the sign in bit 31; all other
/// bits are zero. Equality is bitwise, so `1.0` and `1.00` differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal128 {
    lo: u32,
    mid: u32,
    hi: u32,
    flags: u32,
}

const SIGN_MASK: u32 = 0x8000_0000;
const SCALE_SHIFT: u32 = 16;
const SCALE_MASK: u32 = 0x00FF_0000;

impl Decimal128 {
    pub const MAX_SCALE: u32 = 28;
    pub const ZERO: Decimal128 = Decimal128::from_words([0, 0, 0, 0]);
    pub const MAX: Decimal128 = Decimal128::from_words([u32::MAX, u32::MAX, u32::MAX, 0]);
    pub const MIN: Decimal128 =
        Decimal128::from_words([u32::MAX, u32::MAX, u32::MAX, SIGN_MASK]);

    /// Wraps raw words in wire order. No validation is applied, so a corrupt
    /// flags word is preserved as-is.
    pub const fn from_words(words: [u32; 4]) -> Decimal128 {
        Decimal128 {
            lo: words[0],
            mid: words[1],
            hi: words[2],
            flags: words[3],
        }
    }

    /// Like [`Decimal128::from_words`], but rejects a flags word with reserved
    /// bits set or a scale above [`Decimal128::MAX_SCALE`].
    pub fn try_from_words(words: [u32; 4]) -> Option<Decimal128> {
        let flags = words[3];
        if flags & !(SIGN_MASK | SCALE_MASK) != 0
            || (flags & SCALE_MASK) >> SCALE_SHIFT > Self::MAX_SCALE
        {
            return None;
        }
        Some(Decimal128::from_words(words))
    }

    /// Returns `None` when the mantissa exceeds 96 bits or the scale exceeds 28.
    pub fn from_parts(mantissa: u128, scale: u32, negative: bool) -> Option<Decimal128> {
        if mantissa >> 96 != 0 || scale > Self::MAX_SCALE {
            return None;
        }
        let sign = if negative { SIGN_MASK } else { 0 };
        Some(Decimal128 {
            lo: mantissa as u32,
            mid: (mantissa >> 32) as u32,
            hi: (mantissa >> 64) as u32,
            flags: sign | (scale << SCALE_SHIFT),
        })
    }

    pub const fn words(&self) -> [u32; 4] {
        [self.lo, self.mid, self.hi, self.flags]
    }

    pub fn mantissa(&self) -> u128 {
        (self.hi as u128) << 64 | (self.mid as u128) << 32 | self.lo as u128
    }

    pub fn scale(&self) -> u32 {
        (self.flags & SCALE_MASK) >> SCALE_SHIFT
    }

    pub fn is_negative(&self) -> bool {
        self.flags & SIGN_MASK != 0
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa().to_string();
        let scale = self.scale() as usize;
        if self.is_negative() {
            f.write_str("-")?;
        }
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() <= scale {
            write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits)
        } else {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{int}.{frac}")
        }
    }
}

/// How the tick count of a [`Timestamp`] should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampKind {
    Unspecified,
    Utc,
    Local,
}

/// An opaque 64-bit timestamp: 62 bits of 100ns ticks since
/// 0001-01-01T00:00:00 and a 2-bit kind tag in the top bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timestamp(i64);

const TICKS_MASK: u64 = 0x3FFF_FFFF_FFFF_FFFF;
const KIND_SHIFT: u32 = 62;
const TICKS_PER_MICRO: i64 = 10;

impl Timestamp {
    /// 9999-12-31T23:59:59.9999999
    pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

    pub const fn from_binary(raw: i64) -> Timestamp {
        Timestamp(raw)
    }

    /// Returns `None` when `ticks` is negative or past [`Timestamp::MAX_TICKS`].
    pub fn from_ticks(ticks: i64, kind: TimestampKind) -> Option<Timestamp> {
        if !(0..=Self::MAX_TICKS).contains(&ticks) {
            return None;
        }
        let tag: u64 = match kind {
            TimestampKind::Unspecified => 0,
            TimestampKind::Utc => 1,
            TimestampKind::Local => 2,
        };
        Some(Timestamp((tag << KIND_SHIFT | ticks as u64) as i64))
    }

    /// The raw 64-bit value as it appears on the wire.
    pub const fn to_binary(&self) -> i64 {
        self.0
    }

    pub fn ticks(&self) -> i64 {
        (self.0 as u64 & TICKS_MASK) as i64
    }

    pub fn kind(&self) -> TimestampKind {
        match (self.0 as u64) >> KIND_SHIFT {
            0 => TimestampKind::Unspecified,
            1 => TimestampKind::Utc,
            _ => TimestampKind::Local,
        }
    }

    /// Calendar view of the tick count. The kind tag is ignored; no time zone
    /// conversion takes place.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        let ticks = self.ticks();
        let micros = ticks / TICKS_PER_MICRO;
        let sub_micro_nanos = (ticks % TICKS_PER_MICRO) * 100;
        epoch()?
            .checked_add_signed(chrono::Duration::microseconds(micros))?
            .checked_add_signed(chrono::Duration::nanoseconds(sub_micro_nanos))
    }

    /// Inverse of [`Timestamp::to_naive_datetime`]; precision below 100ns is
    /// truncated.
    pub fn from_naive_datetime(dt: NaiveDateTime, kind: TimestampKind) -> Option<Timestamp> {
        let micros = dt.signed_duration_since(epoch()?).num_microseconds()?;
        let sub_micro = (dt.nanosecond() % 1_000 / 100) as i64;
        let ticks = micros.checked_mul(TICKS_PER_MICRO)?.checked_add(sub_micro)?;
        Timestamp::from_ticks(ticks, kind)
    }
}

fn epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1, 1, 1)?.and_hms_opt(0, 0, 0)
}
