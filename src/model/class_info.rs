// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type axiom registries.
//!
//! A [`ClassInfo`] is built once per record type (typically inside a
//! `OnceLock`), is immutable afterwards, and is shared by every instance.
//! The axiom order is exactly the registration order and is never reordered;
//! digest and signature framing depend on it. Inherited properties are
//! registered ahead of a type's own by convention - the registry itself
//! preserves insertion order verbatim.

use crate::model::property::PropertyInfo;
use crate::model::record::{ModelError, Record};
use crate::model::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Axiom categories addressable through [`ClassInfo::axioms_by_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxiomCategory {
    Property,
    Constant,
}

/// One registered axiom: a property descriptor or a type-level constant.
pub enum Axiom {
    Property(Arc<dyn PropertyInfo>),
    Constant { name: &'static str, value: Value },
}

impl Axiom {
    /// The axiom's stable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Property(p) => p.name(),
            Self::Constant { name, .. } => name,
        }
    }

    /// The axiom's category.
    pub fn category(&self) -> AxiomCategory {
        match self {
            Self::Property(_) => AxiomCategory::Property,
            Self::Constant { .. } => AxiomCategory::Constant,
        }
    }
}

impl fmt::Debug for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(p) => f.debug_tuple("Property").field(&p.name()).finish(),
            Self::Constant { name, value } => f
                .debug_struct("Constant")
                .field("name", name)
                .field("value", value)
                .finish(),
        }
    }
}

/// A record type's shape: id, ordered axioms, and a fallible constructor.
pub struct ClassInfo {
    id: &'static str,
    axioms: Vec<Axiom>,
    properties: Vec<Arc<dyn PropertyInfo>>,
    by_name: HashMap<&'static str, usize>,
    create: fn() -> Option<Box<dyn Record>>,
}

impl ClassInfo {
    /// Globally unique type identifier; the total-order tiebreaker when
    /// comparing records of different concrete types.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// The ordered property list every generic algorithm traverses.
    pub fn properties(&self) -> &[Arc<dyn PropertyInfo>] {
        &self.properties
    }

    /// Axioms of one category, in registration order.
    pub fn axioms_by_category(&self, category: AxiomCategory) -> impl Iterator<Item = &Axiom> + '_ {
        self.axioms.iter().filter(move |a| a.category() == category)
    }

    /// Lookup by name; unknown names return `None`, never an error.
    pub fn axiom_by_name(&self, name: &str) -> Option<&Axiom> {
        self.by_name.get(name).map(|i| &self.axioms[*i])
    }

    /// Lookup a property descriptor by name.
    pub fn property_by_name(&self, name: &str) -> Option<&Arc<dyn PropertyInfo>> {
        match self.axiom_by_name(name) {
            Some(Axiom::Property(p)) => Some(p),
            _ => None,
        }
    }

    /// Default-construct an instance of the described type.
    pub fn create_instance(&self) -> Result<Box<dyn Record>, ModelError> {
        (self.create)().ok_or(ModelError::Construction(self.id))
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("id", &self.id)
            .field("axioms", &self.axioms)
            .finish()
    }
}

fn unconstructable() -> Option<Box<dyn Record>> {
    None
}

/// Fluent builder for [`ClassInfo`].
pub struct ClassInfoBuilder {
    id: &'static str,
    axioms: Vec<Axiom>,
    create: fn() -> Option<Box<dyn Record>>,
}

impl ClassInfoBuilder {
    /// Start building metadata for the type identified by `id`.
    ///
    /// Without a [`constructor`](Self::constructor), `create_instance`
    /// reports a construction failure.
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            axioms: Vec::new(),
            create: unconstructable,
        }
    }

    /// Set the default constructor.
    pub fn constructor(mut self, create: fn() -> Option<Box<dyn Record>>) -> Self {
        self.create = create;
        self
    }

    /// Register a property descriptor.
    pub fn property(mut self, property: impl PropertyInfo + 'static) -> Self {
        self.axioms.push(Axiom::Property(Arc::new(property)));
        self
    }

    /// Register a type-level constant.
    pub fn constant(mut self, name: &'static str, value: Value) -> Self {
        self.axioms.push(Axiom::Constant { name, value });
        self
    }

    /// Finalize. Duplicate axiom names are dropped (first registration
    /// wins) with a warning.
    pub fn build(self) -> ClassInfo {
        let mut by_name = HashMap::new();
        let mut axioms = Vec::new();
        for axiom in self.axioms {
            if by_name.contains_key(axiom.name()) {
                log::warn!(
                    "duplicate axiom name `{}` on {}; first registration wins",
                    axiom.name(),
                    self.id
                );
                continue;
            }
            by_name.insert(axiom.name(), axioms.len());
            axioms.push(axiom);
        }
        let properties = axioms
            .iter()
            .filter_map(|a| match a {
                Axiom::Property(p) => Some(Arc::clone(p)),
                Axiom::Constant { .. } => None,
            })
            .collect();
        log::debug!("built class metadata for {} ({} axioms)", self.id, axioms.len());
        ClassInfo {
            id: self.id,
            axioms,
            properties,
            by_name,
            create: self.create,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_is_none() {
        let info = ClassInfoBuilder::new("test.Empty").build();
        assert!(info.axiom_by_name("nope").is_none());
        assert!(info.property_by_name("nope").is_none());
        assert!(info.properties().is_empty());
    }

    #[test]
    fn test_constants_are_addressable_by_category() {
        let info = ClassInfoBuilder::new("test.WithConstant")
            .constant("schema_rev", Value::U32(3))
            .build();
        let constants: Vec<_> = info.axioms_by_category(AxiomCategory::Constant).collect();
        assert_eq!(constants.len(), 1);
        assert_eq!(constants[0].name(), "schema_rev");
        assert!(info.axioms_by_category(AxiomCategory::Property).next().is_none());
        // Constants are not properties.
        assert!(info.property_by_name("schema_rev").is_none());
        assert!(info.axiom_by_name("schema_rev").is_some());
    }

    #[test]
    fn test_missing_constructor_fails_construction() {
        let info = ClassInfoBuilder::new("test.NoCtor").build();
        let err = info.create_instance().unwrap_err();
        assert_eq!(err.to_string(), "cannot default-construct test.NoCtor");
    }
}
