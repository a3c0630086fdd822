// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # metarec - Metadata-driven record model
//!
//! A generic, introspectable object model. Concrete record types register an
//! ordered table of named, typed property descriptors once, and every generic
//! operation - structural equality, cloning, field-level diffing, canonical
//! hashing, signing/verification, textual rendering - is derived by iterating
//! that table. No record type writes custom logic per operation.
//!
//! ## Quick Start
//!
//! ```rust
//! use metarec::{ClassInfo, ClassInfoBuilder, Frozen, Property, Record, RecordExt, Slot};
//! use std::sync::OnceLock;
//!
//! #[derive(Debug, Clone, Default)]
//! struct Device {
//!     serial: Slot<String>,
//!     port: Slot<u16>,
//!     frozen: Frozen,
//! }
//!
//! fn device_class() -> &'static ClassInfo {
//!     static CLASS: OnceLock<ClassInfo> = OnceLock::new();
//!     CLASS.get_or_init(|| {
//!         ClassInfoBuilder::new("examples.Device")
//!             .constructor(|| Some(Box::new(Device::default())))
//!             .property(Property::new(
//!                 "serial",
//!                 |d: &Device| &d.serial,
//!                 |d: &mut Device| &mut d.serial,
//!                 String::new,
//!             ))
//!             .property(Property::new(
//!                 "port",
//!                 |d: &Device| &d.port,
//!                 |d: &mut Device| &mut d.port,
//!                 u16::default,
//!             ))
//!             .build()
//!     })
//! }
//!
//! impl Record for Device {
//!     fn class_info(&self) -> &'static ClassInfo {
//!         device_class()
//!     }
//!     metarec::record_plumbing!();
//! }
//!
//! let mut dev = Device::default();
//! dev.serial.assign("A-100".to_string());
//!
//! let copy = dev.fclone().unwrap();
//! assert!(dev.record_eq(&*copy));
//!
//! let digest = dev.digest("SHA-256", None).unwrap();
//! assert_eq!(digest.len(), 32);
//! assert_eq!(dev.stringify(), "serial: A-100, port: 0");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                    Generic algorithms                       |
//! |  fclone | diff | compare | digest | sign | append | freeze  |
//! +-------------------------------------------------------------+
//! |                 ClassInfo (per-type registry)               |
//! |     ordered axiom list | lookup by name | constructor       |
//! +-------------------------------------------------------------+
//! |              PropertyInfo (capability objects)              |
//! |  get/set | is_set/is_default | compare | digest | render    |
//! +-------------------------------------------------------------+
//! |                Slot<T> (per-instance storage)               |
//! |            value + "explicitly assigned" flag               |
//! +-------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Record`] | Trait linking an instance to its class metadata |
//! | [`RecordExt`] | The generic algorithms, available on every record |
//! | [`ClassInfo`] | Per-type ordered, immutable axiom registry |
//! | [`Property`] | One registered descriptor per concrete property |
//! | [`Slot`] | Storage cell tracking "assigned" separately from "default" |
//! | [`Value`] | Type-erased property value for name-indexed access |
//!
//! ## Modules Overview
//!
//! - [`model`] - descriptors, class metadata, records, generic algorithms
//! - [`registry`] - process-wide class registry (discovery surface)
//! - [`crypto`] - digest and sign/verify primitives selected by name

/// Digest and signature primitives (streaming accumulators over `ring`).
pub mod crypto;
/// Property descriptors, class metadata, and the record algorithms.
pub mod model;
/// Process-wide class registry keyed by type id.
pub mod registry;

pub use crypto::{
    generate_keypair, ByteSink, CryptoError, DigestContext, PrivateKey, PublicKey, SigningContext,
    VerifyContext,
};
pub use model::{
    Axiom, AxiomCategory, ClassInfo, ClassInfoBuilder, CopyMode, Frozen, Inclusion, ModelError,
    Property, PropertyInfo, PropertyValue, Record, RecordExt, Slot, Value,
};
