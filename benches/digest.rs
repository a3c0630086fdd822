// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical digest throughput over a mid-sized record.

use criterion::{criterion_group, criterion_main, Criterion};
use metarec::{ClassInfo, ClassInfoBuilder, Frozen, Property, Record, RecordExt, Slot};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default)]
struct Telemetry {
    node: Slot<String>,
    seq: Slot<u64>,
    payload: Slot<Vec<u64>>,
    frozen: Frozen,
}

fn telemetry_class() -> &'static ClassInfo {
    static CLASS: OnceLock<ClassInfo> = OnceLock::new();
    CLASS.get_or_init(|| {
        ClassInfoBuilder::new("bench.Telemetry")
            .constructor(|| Some(Box::new(Telemetry::default())))
            .property(Property::new(
                "node",
                |t: &Telemetry| &t.node,
                |t: &mut Telemetry| &mut t.node,
                String::new,
            ))
            .property(Property::new(
                "seq",
                |t: &Telemetry| &t.seq,
                |t: &mut Telemetry| &mut t.seq,
                u64::default,
            ))
            .property(Property::new(
                "payload",
                |t: &Telemetry| &t.payload,
                |t: &mut Telemetry| &mut t.payload,
                Vec::new,
            ))
            .build()
    })
}

impl Record for Telemetry {
    fn class_info(&self) -> &'static ClassInfo {
        telemetry_class()
    }
    metarec::record_plumbing!();
}

fn bench_digest(c: &mut Criterion) {
    let mut t = Telemetry::default();
    t.node.assign("node-17.rack-4".to_string());
    t.seq.assign(123_456_789);
    t.payload.assign((0..256).map(|i| i * 31).collect());

    c.bench_function("digest_sha256", |b| {
        b.iter(|| t.digest("SHA-256", None).unwrap())
    });

    let prev = t.digest("SHA-256", None).unwrap();
    c.bench_function("digest_sha256_chained", |b| {
        b.iter(|| t.digest("SHA-256", Some(&prev)).unwrap())
    });

    c.bench_function("fclone", |b| b.iter(|| t.fclone().unwrap()));
}

criterion_group!(benches, bench_digest);
criterion_main!(benches);
