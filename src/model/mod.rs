// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record model core.
//!
//! Everything here operates through one indirection: a [`Record`] hands out
//! its `&'static` [`ClassInfo`], the class info hands out its ordered list of
//! [`PropertyInfo`] capability objects, and each generic algorithm folds over
//! that list. Traversal order is fixed at registration time and never varies;
//! digest and signature bytes depend on it.
//!
//! # Features
//!
//! - **PropertyInfo / Property**: per-property capability objects (get, set,
//!   compare, diff, digest, render) implemented once, generically
//! - **Slot**: instance storage that distinguishes "explicitly assigned"
//!   from "happens to equal the default"
//! - **ClassInfo / ClassInfoBuilder**: immutable per-type axiom registry
//! - **RecordExt**: clone, diff, compare, hash, sign, render, freeze
//!
//! See the crate-level example for end-to-end usage.

mod class_info;
mod property;
mod record;
mod value;

pub use class_info::{Axiom, AxiomCategory, ClassInfo, ClassInfoBuilder};
pub use property::{CopyMode, Inclusion, Property, PropertyInfo, PropertyValue, Slot};
pub use record::{Frozen, ModelError, Record, RecordExt};
pub use value::Value;

#[cfg(test)]
mod tests;
