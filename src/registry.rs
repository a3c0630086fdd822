// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide class registry.
//!
//! Record types stay usable without registering here; the registry only
//! provides the discovery surface (lookup by type id) for code that works
//! with records generically. Registration is idempotent per id - the first
//! registration wins and later attempts are rejected with a warning.

use crate::model::{ClassInfo, PropertyInfo};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

fn classes() -> &'static DashMap<&'static str, &'static ClassInfo> {
    static CLASSES: OnceLock<DashMap<&'static str, &'static ClassInfo>> = OnceLock::new();
    CLASSES.get_or_init(DashMap::new)
}

/// Register a class under its id. Returns `false` if the id is already
/// taken; the existing registration is kept.
pub fn register_class(info: &'static ClassInfo) -> bool {
    match classes().entry(info.id()) {
        Entry::Occupied(_) => {
            log::warn!("class {} is already registered; ignoring", info.id());
            false
        }
        Entry::Vacant(entry) => {
            entry.insert(info);
            log::debug!("registered class {}", info.id());
            true
        }
    }
}

/// Look up a registered class by id.
pub fn class_by_id(id: &str) -> Option<&'static ClassInfo> {
    classes().get(id).map(|entry| *entry.value())
}

/// Look up one property descriptor of a registered class.
pub fn lookup_property(class_id: &str, name: &str) -> Option<Arc<dyn PropertyInfo>> {
    class_by_id(class_id)?.property_by_name(name).map(Arc::clone)
}

/// The ordered property table of a registered class.
pub fn list_properties(class_id: &str) -> Option<&'static [Arc<dyn PropertyInfo>]> {
    class_by_id(class_id).map(|info| info.properties())
}
