// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Integration-style tests exercising the generic record algorithms
//! against two fixture types, one of them nesting the other.

use crate::crypto::{generate_keypair, CryptoError};
use crate::model::{
    AxiomCategory, ClassInfo, ClassInfoBuilder, Frozen, ModelError, Property, Record, RecordExt,
    Slot, Value,
};
use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Default)]
struct SensorReading {
    sensor_id: Slot<u64>,
    temperature: Slot<f64>,
    label: Slot<String>,
    sample_count: Slot<u32>,
    frozen: Frozen,
    hook_runs: u32,
}

fn reading_class() -> &'static ClassInfo {
    static CLASS: OnceLock<ClassInfo> = OnceLock::new();
    CLASS.get_or_init(|| {
        ClassInfoBuilder::new("test.SensorReading")
            .constructor(|| Some(Box::new(SensorReading::default())))
            .property(Property::new(
                "sensor_id",
                |r: &SensorReading| &r.sensor_id,
                |r: &mut SensorReading| &mut r.sensor_id,
                u64::default,
            ))
            .property(Property::new(
                "temperature",
                |r: &SensorReading| &r.temperature,
                |r: &mut SensorReading| &mut r.temperature,
                f64::default,
            ))
            .property(Property::new(
                "label",
                |r: &SensorReading| &r.label,
                |r: &mut SensorReading| &mut r.label,
                String::new,
            ))
            .property(
                Property::new(
                    "sample_count",
                    |r: &SensorReading| &r.sample_count,
                    |r: &mut SensorReading| &mut r.sample_count,
                    u32::default,
                )
                .exclude_from_digest(),
            )
            .constant("schema_rev", Value::U32(3))
            .build()
    })
}

impl Record for SensorReading {
    fn class_info(&self) -> &'static ClassInfo {
        reading_class()
    }

    fn before_freeze(&mut self) {
        self.hook_runs += 1;
    }

    crate::record_plumbing!();
}

#[derive(Debug, Clone, Default)]
struct SensorBundle {
    primary: Slot<Arc<SensorReading>>,
    samples: Slot<Vec<u64>>,
    frozen: Frozen,
}

fn bundle_class() -> &'static ClassInfo {
    static CLASS: OnceLock<ClassInfo> = OnceLock::new();
    CLASS.get_or_init(|| {
        ClassInfoBuilder::new("test.SensorBundle")
            .constructor(|| Some(Box::new(SensorBundle::default())))
            .property(
                Property::new(
                    "primary",
                    |b: &SensorBundle| &b.primary,
                    |b: &mut SensorBundle| &mut b.primary,
                    || Arc::new(SensorReading::default()),
                )
                .deep_copy(),
            )
            .property(Property::new(
                "samples",
                |b: &SensorBundle| &b.samples,
                |b: &mut SensorBundle| &mut b.samples,
                Vec::new,
            ))
            .build()
    })
}

impl Record for SensorBundle {
    fn class_info(&self) -> &'static ClassInfo {
        bundle_class()
    }
    crate::record_plumbing!();
}

#[derive(Debug, Clone, Default)]
struct NoCtor {
    tag: Slot<u32>,
    frozen: Frozen,
}

fn no_ctor_class() -> &'static ClassInfo {
    static CLASS: OnceLock<ClassInfo> = OnceLock::new();
    CLASS.get_or_init(|| {
        ClassInfoBuilder::new("test.NoCtor")
            .property(Property::new(
                "tag",
                |r: &NoCtor| &r.tag,
                |r: &mut NoCtor| &mut r.tag,
                u32::default,
            ))
            .build()
    })
}

impl Record for NoCtor {
    fn class_info(&self) -> &'static ClassInfo {
        no_ctor_class()
    }
    crate::record_plumbing!();
}

fn sample_reading() -> SensorReading {
    SensorReading {
        sensor_id: Slot::with(7),
        temperature: Slot::with(21.5),
        label: Slot::with("probe-a".to_string()),
        ..SensorReading::default()
    }
}

#[test]
fn test_equality_matches_compare() {
    let a = sample_reading();
    let b = sample_reading();
    assert!(a.record_eq(&b));
    assert_eq!(a.compare_with(Some(&b)), Ordering::Equal);

    let mut c = sample_reading();
    c.sensor_id.assign(8);
    assert!(!a.record_eq(&c));
    assert_eq!(a.compare_with(Some(&c)), Ordering::Less);
    assert_eq!(c.compare_with(Some(&a)), Ordering::Greater);
}

#[test]
fn test_fclone_is_a_snapshot_of_set_properties() {
    let mut r = SensorReading::default();
    r.label.assign("A".to_string());
    // Raw mutation bumps the value without marking the slot set.
    *r.sample_count.raw_mut() = 5;

    let copy = r.fclone().unwrap();
    let copy = copy.as_any().downcast_ref::<SensorReading>().unwrap();
    assert_eq!(copy.label.get(), "A");
    assert!(copy.label.is_set());
    // The never-assigned count keeps its default on the clone.
    assert_eq!(*copy.sample_count.get(), 0);
    assert!(!copy.sample_count.is_set());
}

#[test]
fn test_shallow_clone_shares_nested_records() {
    let mut bundle = SensorBundle::default();
    bundle.primary.assign(Arc::new(sample_reading()));
    bundle.samples.assign(vec![1, 2, 3]);

    let shallow = bundle.shallow_clone().unwrap();
    let shallow = shallow.as_any().downcast_ref::<SensorBundle>().unwrap();
    assert!(Arc::ptr_eq(bundle.primary.get(), shallow.primary.get()));
    assert_eq!(shallow.samples.get(), &vec![1, 2, 3]);
}

#[test]
fn test_fclone_rebuilds_deep_copy_properties() {
    let mut bundle = SensorBundle::default();
    bundle.primary.assign(Arc::new(sample_reading()));

    let deep = bundle.fclone().unwrap();
    let deep = deep.as_any().downcast_ref::<SensorBundle>().unwrap();
    assert!(!Arc::ptr_eq(bundle.primary.get(), deep.primary.get()));
    assert!(bundle.record_eq(deep));
}

#[test]
fn test_copy_from_overwrites_everything() {
    let mut dst = sample_reading();
    let src = SensorReading::default();
    // Whole-object overwrite: even unset source properties land as their
    // current (default) values.
    dst.copy_from(&src);
    assert_eq!(*dst.sensor_id.get(), 0);
    assert_eq!(dst.label.get(), "");
    assert!(dst.record_eq(&src));
}

#[test]
fn test_diff_is_empty_iff_equal() {
    let a = sample_reading();
    let b = sample_reading();
    assert!(a.diff_with(&b).is_empty());

    let mut c = sample_reading();
    c.temperature.assign(30.0);
    c.label.assign("probe-b".to_string());
    let delta = a.diff_with(&c);
    assert_eq!(delta.len(), 2);
    assert_eq!(delta["temperature"], Value::F64(30.0));
    assert_eq!(delta["label"], Value::String("probe-b".to_string()));
}

#[test]
fn test_hard_diff_materializes_the_delta() {
    let a = sample_reading();
    let b = sample_reading();
    assert!(a.hard_diff_with(&b).unwrap().is_none());

    let mut c = sample_reading();
    c.temperature.assign(30.0);
    let delta = a.hard_diff_with(&c).unwrap().unwrap();
    let delta = delta.as_any().downcast_ref::<SensorReading>().unwrap();
    assert!(delta.temperature.is_set());
    assert_eq!(*delta.temperature.get(), 30.0);
    assert!(!delta.sensor_id.is_set());
    assert!(!delta.label.is_set());
}

#[test]
fn test_hard_diff_keys_match_diff() {
    let a = sample_reading();
    let mut b = sample_reading();
    b.sensor_id.assign(99);
    b.label.assign("other".to_string());

    let soft = a.diff_with(&b);
    let hard = a.hard_diff_with(&b).unwrap().unwrap();
    for name in ["sensor_id", "temperature", "label", "sample_count"] {
        assert_eq!(soft.contains_key(name), hard.is_property_set(name), "{}", name);
    }
}

#[test]
fn test_compare_edge_cases() {
    let a = sample_reading();
    assert_eq!(a.compare_with(Some(a.as_record())), Ordering::Equal);
    assert_eq!(a.compare_with(None), Ordering::Greater);

    // Different concrete types order by class id alone.
    let bundle = SensorBundle::default();
    assert_eq!(bundle.compare_with(Some(a.as_record())), Ordering::Less);
    assert_eq!(a.compare_with(Some(bundle.as_record())), Ordering::Greater);
}

#[test]
fn test_records_are_sortable() {
    let mut low = SensorReading::default();
    low.sensor_id.assign(1);
    let mut high = SensorReading::default();
    high.sensor_id.assign(9);

    let mut records: Vec<Box<dyn Record>> = vec![
        Box::new(high.clone()),
        Box::new(SensorBundle::default()),
        Box::new(low.clone()),
    ];
    records.sort_by(|a, b| a.compare_with(Some(&**b)));
    assert_eq!(records[0].class_info().id(), "test.SensorBundle");
    assert!(records[1].record_eq(&low));
    assert!(records[2].record_eq(&high));
}

#[test]
fn test_named_access() {
    let mut r = SensorReading::default();
    assert!(r.set_property("sensor_id", &Value::U64(11)));
    assert_eq!(r.get_property("sensor_id"), Some(Value::U64(11)));
    assert!(r.is_property_set("sensor_id"));

    // Unknown names and variant mismatches are quiet no-ops.
    assert!(!r.set_property("no_such", &Value::U64(1)));
    assert_eq!(r.get_property("no_such"), None);
    assert!(!r.set_property("sensor_id", &Value::String("nope".to_string())));
    assert_eq!(r.get_property("sensor_id"), Some(Value::U64(11)));
}

#[test]
fn test_has_default_value() {
    let mut r = SensorReading::default();
    // Never assigned counts as default.
    assert!(r.has_default_value("label"));
    r.label.assign("x".to_string());
    assert!(!r.has_default_value("label"));
    // Explicitly assigning the default value is still "default".
    r.label.assign(String::new());
    assert!(r.has_default_value("label"));
    // Unknown names are not default.
    assert!(!r.has_default_value("no_such"));
}

#[test]
fn test_reset_through_descriptor() {
    let mut r = sample_reading();
    let prop = reading_class().property_by_name("label").unwrap();
    assert!(r.is_property_set("label"));

    prop.reset(r.as_record_mut());
    assert!(!r.is_property_set("label"));
    assert_eq!(r.label.get(), "");
    assert!(r.has_default_value("label"));
    // The reset slot behaves like a never-assigned one.
    assert!(r.record_eq(&SensorReading {
        sensor_id: Slot::with(7),
        temperature: Slot::with(21.5),
        ..SensorReading::default()
    }));
}

#[test]
fn test_digest_is_deterministic() {
    let a = sample_reading();
    let b = sample_reading();
    assert_eq!(
        a.digest("SHA-256", None).unwrap(),
        b.digest("SHA-256", None).unwrap()
    );
}

#[test]
fn test_digest_ignores_excluded_properties() {
    let a = sample_reading();
    let mut b = sample_reading();
    b.sample_count.assign(5);
    assert_eq!(
        a.digest("SHA-256", None).unwrap(),
        b.digest("SHA-256", None).unwrap()
    );
    // Signatures still see the excluded-from-digest property (Ed25519 is
    // deterministic, so different inputs give different signatures).
    let (key, _) = generate_keypair("Ed25519").unwrap();
    assert_ne!(
        a.sign("Ed25519", &key).unwrap(),
        b.sign("Ed25519", &key).unwrap()
    );
}

#[test]
fn test_digest_ignores_default_valued_properties() {
    let a = sample_reading();
    let mut b = sample_reading();
    // Explicitly assigned, but equal to the default.
    b.sample_count.assign(0);
    assert_eq!(
        a.digest("SHA-512", None).unwrap(),
        b.digest("SHA-512", None).unwrap()
    );
}

#[test]
fn test_digest_reflects_value_changes() {
    let a = sample_reading();
    let mut b = sample_reading();
    b.temperature.assign(22.0);
    assert_ne!(
        a.digest("SHA-256", None).unwrap(),
        b.digest("SHA-256", None).unwrap()
    );
}

#[test]
fn test_digest_chaining() {
    let r = sample_reading();
    let own = r.digest("SHA-256", None).unwrap();
    let chained = r.digest("SHA-256", Some(&[1, 2, 3])).unwrap();
    assert_ne!(own, chained);
    // Reproducible given the same previous hash.
    assert_eq!(chained, r.digest("SHA-256", Some(&[1, 2, 3])).unwrap());
    // An empty previous hash is treated as absent.
    assert_eq!(own, r.digest("SHA-256", Some(&[])).unwrap());
}

#[test]
fn test_nested_records_feed_the_digest() {
    let mut a = SensorBundle::default();
    a.primary.assign(Arc::new(sample_reading()));
    let mut b = SensorBundle::default();
    let mut inner = sample_reading();
    inner.temperature.assign(99.0);
    b.primary.assign(Arc::new(inner));
    assert_ne!(
        a.digest("SHA-256", None).unwrap(),
        b.digest("SHA-256", None).unwrap()
    );
}

#[test]
fn test_sign_and_verify_roundtrip() {
    for scheme in ["Ed25519", "ECDSA_P256_SHA256"] {
        let (private_key, public_key) = generate_keypair(scheme).unwrap();
        let r = sample_reading();
        let sig = r.sign(scheme, &private_key).unwrap();
        assert!(r.verify(&sig, scheme, &public_key).unwrap(), "{}", scheme);

        // A changed record no longer verifies.
        let mut changed = sample_reading();
        changed.sensor_id.assign(1000);
        assert!(!changed.verify(&sig, scheme, &public_key).unwrap());
    }
}

#[test]
fn test_verify_rejects_wrong_key_and_tampered_signature() {
    let (private_key, public_key) = generate_keypair("Ed25519").unwrap();
    let (_, other_public) = generate_keypair("Ed25519").unwrap();
    let r = sample_reading();
    let mut sig = r.sign("Ed25519", &private_key).unwrap();

    assert!(!r.verify(&sig, "Ed25519", &other_public).unwrap());
    sig[0] ^= 0xff;
    assert!(!r.verify(&sig, "Ed25519", &public_key).unwrap());
}

#[test]
fn test_unknown_algorithms_error() {
    let r = sample_reading();
    assert!(matches!(
        r.digest("MD5", None),
        Err(CryptoError::AlgorithmUnavailable(_))
    ));
    let (private_key, public_key) = generate_keypair("Ed25519").unwrap();
    assert!(matches!(
        r.sign("DSA", &private_key),
        Err(CryptoError::AlgorithmUnavailable(_))
    ));
    assert!(matches!(
        r.verify(&[0u8; 64], "DSA", &public_key),
        Err(CryptoError::AlgorithmUnavailable(_))
    ));
}

#[test]
fn test_freeze_is_permanent_and_runs_hook_once() {
    let mut r = sample_reading();
    assert!(!r.is_frozen());
    r.freeze();
    assert!(r.is_frozen());
    r.freeze();
    assert!(r.is_frozen());
    assert_eq!(r.hook_runs, 1);

    // Descriptor writes are rejected on a frozen instance.
    assert!(!r.set_property("sensor_id", &Value::U64(42)));
    assert_eq!(r.get_property("sensor_id"), Some(Value::U64(7)));
}

#[test]
fn test_stringify_format() {
    let r = sample_reading();
    assert_eq!(
        r.stringify(),
        "sensor_id: 7, temperature: 21.5, label: probe-a, sample_count: 0"
    );

    let mut bundle = SensorBundle::default();
    bundle.samples.assign(vec![4, 5]);
    assert!(bundle.stringify().ends_with("samples: [4, 5]"));
}

#[test]
fn test_append_renders_placeholder_on_mismatched_descriptor() {
    // A class whose descriptor reads a different concrete type can never
    // produce a value; the render falls back to the placeholder.
    #[derive(Debug, Clone, Default)]
    struct Odd {
        frozen: Frozen,
    }
    fn odd_class() -> &'static ClassInfo {
        static CLASS: OnceLock<ClassInfo> = OnceLock::new();
        CLASS.get_or_init(|| {
            ClassInfoBuilder::new("test.Odd")
                .property(Property::new(
                    "sensor_id",
                    |r: &SensorReading| &r.sensor_id,
                    |r: &mut SensorReading| &mut r.sensor_id,
                    u64::default,
                ))
                .build()
        })
    }
    impl Record for Odd {
        fn class_info(&self) -> &'static ClassInfo {
            odd_class()
        }
        crate::record_plumbing!();
    }

    let odd = Odd::default();
    assert_eq!(odd.stringify(), "sensor_id: -");
    assert_eq!(odd.get_property("sensor_id"), None);
}

#[test]
fn test_construction_failure_propagates() {
    let mut a = NoCtor::default();
    a.tag.assign(1);
    let b = NoCtor::default();

    assert_eq!(
        a.shallow_clone().unwrap_err(),
        ModelError::Construction("test.NoCtor")
    );
    assert_eq!(
        a.fclone().unwrap_err(),
        ModelError::Construction("test.NoCtor")
    );
    assert_eq!(
        a.hard_diff_with(&b).unwrap_err(),
        ModelError::Construction("test.NoCtor")
    );
    // The map-shaped diff needs no construction and still works.
    assert_eq!(a.diff_with(&b).len(), 1);
}

#[test]
fn test_class_constants() {
    let info = reading_class();
    let constants: Vec<_> = info.axioms_by_category(AxiomCategory::Constant).collect();
    assert_eq!(constants.len(), 1);
    assert_eq!(constants[0].name(), "schema_rev");
    // Constants never show up in the property table.
    assert_eq!(info.properties().len(), 4);
}

#[test]
fn test_randomized_clone_and_compare() {
    fastrand::seed(42);
    for _ in 0..100 {
        let mut r = SensorReading::default();
        if fastrand::bool() {
            r.sensor_id.assign(fastrand::u64(..));
        }
        if fastrand::bool() {
            r.temperature.assign(f64::from(fastrand::i32(..)));
        }
        if fastrand::bool() {
            r.label.assign(format!("probe-{}", fastrand::u16(..)));
        }

        let copy = r.fclone().unwrap();
        assert!(r.record_eq(&*copy));
        assert_eq!(copy.compare_with(Some(r.as_record())), Ordering::Equal);
        assert_eq!(
            r.digest("SHA-256", None).unwrap(),
            copy.digest("SHA-256", None).unwrap()
        );
    }
}
