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

use benches::ELEMENTS;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use spanrw_core::{Endian, VInt, Writer};

#[inline(always)]
fn write_i64_alternative(buf: &mut [u8], cursor: &mut usize, value: i64) {
    buf[*cursor..*cursor + 8].copy_from_slice(&value.to_le_bytes());
    *cursor += 8;
}

#[inline(always)]
fn write_varuint64_alternative(buf: &mut [u8], cursor: &mut usize, mut value: u64) {
    while value >= 0x80 {
        buf[*cursor] = (value as u8) | 0x80;
        *cursor += 1;
        value >>= 7;
    }
    buf[*cursor] = value as u8;
    *cursor += 1;
}

fn bench_write_i64(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_i64");
    group.throughput(Throughput::Elements(ELEMENTS as u64));

    let mut buf = vec![0u8; 8 * ELEMENTS];

    group.bench_function("current", |b| {
        b.iter(|| {
            let mut writer = Writer::new(&mut buf);
            for i in 0..ELEMENTS as i64 {
                writer.write_i64(black_box(i), Endian::Little).unwrap();
            }
            black_box(writer.position());
        })
    });

    group.bench_function("alternative", |b| {
        b.iter(|| {
            let mut cursor = 0;
            for i in 0..ELEMENTS as i64 {
                write_i64_alternative(&mut buf, &mut cursor, black_box(i));
            }
            black_box(cursor);
        })
    });

    group.finish();
}

fn bench_write_varuint64(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_varuint64");
    group.throughput(Throughput::Elements(ELEMENTS as u64));

    let mut buf = vec![0u8; 10 * ELEMENTS];

    group.bench_function("current", |b| {
        b.iter(|| {
            let mut writer = Writer::new(&mut buf);
            for i in 0..ELEMENTS as u64 {
                writer.write_varuint64(black_box(i << 20)).unwrap();
            }
            black_box(writer.position());
        })
    });

    group.bench_function("alternative", |b| {
        b.iter(|| {
            let mut cursor = 0;
            for i in 0..ELEMENTS as u64 {
                write_varuint64_alternative(&mut buf, &mut cursor, black_box(i << 20));
            }
            black_box(cursor);
        })
    });

    group.finish();
}

fn bench_write_vint(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_vint");
    group.throughput(Throughput::Elements(ELEMENTS as u64));

    let mut buf = vec![0u8; 8 * ELEMENTS];

    group.bench_function("current", |b| {
        b.iter(|| {
            let mut writer = Writer::new(&mut buf);
            for i in 0..ELEMENTS as u64 {
                let vint = VInt::from_value(black_box(i << 14)).unwrap();
                writer.write_vint(&vint).unwrap();
            }
            black_box(writer.position());
        })
    });

    group.finish();
}

fn bench_write_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_string");
    group.throughput(Throughput::Elements(ELEMENTS as u64));

    let mut buf = vec![0u8; 32 * ELEMENTS];

    group.bench_function("current", |b| {
        b.iter(|| {
            let mut writer = Writer::new(&mut buf);
            for _ in 0..ELEMENTS {
                writer.write_string(black_box("ᚠHello Worldಸ")).unwrap();
            }
            black_box(writer.position());
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_write_i64,
    bench_write_varuint64,
    bench_write_vint,
    bench_write_string
);
criterion_main!(benches);
