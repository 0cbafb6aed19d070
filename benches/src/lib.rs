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

//! Buffer fixtures shared by the criterion benches.

use spanrw_core::{Endian, VInt, Writer};

pub const ELEMENTS: usize = 1000;

pub fn fixed_buffer<F>(width: usize, mut fill: F) -> Vec<u8>
where
    F: FnMut(&mut Writer<'_>, usize) -> spanrw_core::Result<usize>,
{
    let mut buf = vec![0u8; width * ELEMENTS];
    let mut writer = Writer::new(&mut buf);
    for i in 0..ELEMENTS {
        if fill(&mut writer, i).is_err() {
            break;
        }
    }
    buf
}

pub fn i32_buffer() -> Vec<u8> {
    fixed_buffer(4, |w, i| w.write_i32(i as i32 * 7919, Endian::Little))
}

pub fn i64_buffer() -> Vec<u8> {
    fixed_buffer(8, |w, i| w.write_i64(i as i64 * 104_729, Endian::Little))
}

pub fn f64_buffer() -> Vec<u8> {
    fixed_buffer(8, |w, i| w.write_f64(i as f64 * 1.5))
}

/// `ELEMENTS` varints, each `base + i`.
pub fn varuint64_buffer(base: u64) -> Vec<u8> {
    let mut buf = vec![0u8; 10 * ELEMENTS];
    let mut writer = Writer::new(&mut buf);
    for i in 0..ELEMENTS as u64 {
        if writer.write_varuint64(base.wrapping_add(i)).is_err() {
            break;
        }
    }
    let n = writer.position();
    buf.truncate(n);
    buf
}

/// `ELEMENTS` minimal VInts, each `base + i`.
pub fn vint_buffer(base: u64) -> Vec<u8> {
    let mut buf = vec![0u8; 8 * ELEMENTS];
    let mut writer = Writer::new(&mut buf);
    for i in 0..ELEMENTS as u64 {
        let Ok(vint) = VInt::from_value(base + i) else {
            break;
        };
        if writer.write_vint(&vint).is_err() {
            break;
        }
    }
    let n = writer.position();
    buf.truncate(n);
    buf
}
