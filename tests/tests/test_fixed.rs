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

use proptest::prelude::*;
use spanrw_core::{Decimal128, Endian, Error, FixedWidth, Reader, Uuid, Writer};

fn endian() -> impl Strategy<Value = Endian> {
    prop_oneof![Just(Endian::Little), Just(Endian::Big)]
}

fn round_trip<T: FixedWidth + PartialEq + std::fmt::Debug>(value: T, endian: Endian) {
    let mut buf = [0u8; 8];
    let mut writer = Writer::new(&mut buf);
    assert_eq!(writer.write(value, endian).unwrap(), T::SIZE);

    let mut reader = Reader::new(&buf[..T::SIZE]);
    assert_eq!(reader.read::<T>(endian).unwrap(), value);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_big_endian_layout() {
    let mut buf = [0u8; 14];
    let mut writer = Writer::new(&mut buf);
    writer.write_u16(0x0102, Endian::Big).unwrap();
    writer.write_i32(-2, Endian::Big).unwrap();
    writer.write_u64(0x0102_0304_0506_0708, Endian::Big).unwrap();
    assert_eq!(
        buf,
        [0x01, 0x02, 0xFF, 0xFF, 0xFF, 0xFE, 1, 2, 3, 4, 5, 6, 7, 8]
    );
}

#[test]
fn test_native_matches_platform() {
    let mut buf = [0u8; 4];
    Writer::new(&mut buf)
        .write_u32(0xA1B2_C3D4, Endian::NATIVE)
        .unwrap();
    assert_eq!(buf, 0xA1B2_C3D4u32.to_ne_bytes());
    assert_eq!(
        Reader::new(&buf).read_u32(Endian::from_big_endian_flag(false)).unwrap(),
        u32::from_le_bytes(buf)
    );
}

#[test]
fn test_floats_are_little_endian() {
    let mut buf = [0u8; 12];
    let mut writer = Writer::new(&mut buf);
    writer.write_f32(533_174.1).unwrap();
    writer.write_f64(f64::MAX).unwrap();
    assert_eq!(&buf[..4], &533_174.1f32.to_le_bytes());

    let mut reader = Reader::new(&buf);
    assert_eq!(reader.read_f32().unwrap(), 533_174.1);
    assert_eq!(reader.read_f64().unwrap(), f64::MAX);
}

#[test]
fn test_guid_mixed_endian_layout() {
    let guid = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
    let mut buf = [0u8; 16];
    Writer::new(&mut buf).write_guid(&guid).unwrap();
    assert_eq!(
        buf,
        [
            0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
            0xEE, 0xFF
        ]
    );
    assert_eq!(Reader::new(&buf).read_guid().unwrap(), guid);
}

#[test]
fn test_decimal_words() {
    let d = Decimal128::from_parts(123_456_789_012_345_678_901_234, 10, true).unwrap();
    let mut buf = [0u8; 16];
    Writer::new(&mut buf).write_decimal(&d).unwrap();
    assert_eq!(&buf[12..], &[0x00, 0x00, 0x0A, 0x80]);

    let back = Reader::new(&buf).read_decimal().unwrap();
    assert_eq!(back, d);
    assert_eq!(back.to_string(), "-12345678901234.5678901234");
}

#[test]
fn test_corrupt_decimal_flags_are_rejected() {
    for flags in [[0xFF; 4], [0x01, 0x00, 0x00, 0x00], [0x00, 0x00, 0x1D, 0x00]] {
        let mut bytes = vec![0u8; 12];
        bytes.extend_from_slice(&flags);
        let mut reader = Reader::new(&bytes);
        assert_eq!(
            reader.read_decimal().unwrap_err(),
            Error::InvalidDecimal {
                offset: 0,
                flags: u32::from_le_bytes(flags)
            }
        );
        assert_eq!(reader.position(), 0);
    }

    let mut bytes = vec![0u8; 12];
    bytes.extend_from_slice(&[0x00, 0x00, 0x1C, 0x80]);
    let d = Reader::new(&bytes).read_decimal().unwrap();
    assert_eq!(d.scale(), 28);
    assert!(d.is_negative());
}

proptest! {
    #[test]
    fn integers_round_trip(
        endian in endian(),
        a in any::<u16>(), b in any::<i16>(),
        c in any::<u32>(), d in any::<i32>(),
        e in any::<u64>(), f in any::<i64>(),
    ) {
        round_trip(a, endian);
        round_trip(b, endian);
        round_trip(c, endian);
        round_trip(d, endian);
        round_trip(e, endian);
        round_trip(f, endian);
    }

    #[test]
    fn floats_round_trip_bits(endian in endian(), x in any::<u32>(), y in any::<u64>()) {
        // compare through bits so NaN payloads are covered too
        let mut buf = [0u8; 8];
        let mut writer = Writer::new(&mut buf);
        writer.write(f32::from_bits(x), endian).unwrap();
        let back: f32 = Reader::new(&buf).read(endian).unwrap();
        prop_assert_eq!(back.to_bits(), x);

        let mut writer = Writer::new(&mut buf);
        writer.write(f64::from_bits(y), endian).unwrap();
        let back: f64 = Reader::new(&buf).read(endian).unwrap();
        prop_assert_eq!(back.to_bits(), y);
    }
}
