// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The record base: frozen state, generic algorithms, hashing and signing.
//!
//! [`Record`] is the thin link between an instance and its `&'static`
//! [`ClassInfo`]; [`RecordExt`] supplies every generic operation by folding
//! over the registered property descriptors in registration order. None of
//! the algorithms branch on concrete types.

use crate::crypto::{
    ByteSink, CryptoError, DigestContext, PrivateKey, PublicKey, SigningContext, VerifyContext,
};
use crate::model::class_info::ClassInfo;
use crate::model::property::Inclusion;
use crate::model::value::Value;
use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Model-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The concrete type could not be default-constructed.
    Construction(&'static str),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Construction(id) => write!(f, "cannot default-construct {}", id),
        }
    }
}

impl std::error::Error for ModelError {}

/// One-way state tag: mutable until engaged, frozen forever after.
#[derive(Debug, Default, Clone)]
pub struct Frozen(bool);

impl Frozen {
    /// Whether the owning instance has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.0
    }

    pub(crate) fn engage(&mut self) {
        self.0 = true;
    }
}

/// An introspectable record instance.
///
/// Concrete types implement `class_info` plus the plumbing accessors (see
/// [`record_plumbing!`](crate::record_plumbing)) and may override
/// [`before_freeze`](Self::before_freeze) for last-chance normalization.
/// Everything else comes from [`RecordExt`].
pub trait Record: Any + fmt::Debug + Send + Sync {
    /// The shared, immutable metadata for this concrete type.
    fn class_info(&self) -> &'static ClassInfo;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn as_record(&self) -> &dyn Record;
    fn as_record_mut(&mut self) -> &mut dyn Record;
    fn as_arc_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// The frozen state tag owned by this instance.
    fn frozen_cell(&self) -> &Frozen;
    fn frozen_cell_mut(&mut self) -> &mut Frozen;

    /// Hook run exactly once, before the frozen flag becomes observable.
    fn before_freeze(&mut self) {}
}

/// Implements the mechanical [`Record`] methods for a type with a `frozen:
/// Frozen` field. `class_info` and `before_freeze` stay hand-written.
#[macro_export]
macro_rules! record_plumbing {
    () => {
        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
        fn as_record(&self) -> &dyn $crate::model::Record {
            self
        }
        fn as_record_mut(&mut self) -> &mut dyn $crate::model::Record {
            self
        }
        fn as_arc_any(
            self: ::std::sync::Arc<Self>,
        ) -> ::std::sync::Arc<dyn ::std::any::Any + Send + Sync> {
            self
        }
        fn frozen_cell(&self) -> &$crate::model::Frozen {
            &self.frozen
        }
        fn frozen_cell_mut(&mut self) -> &mut $crate::model::Frozen {
            &mut self.frozen
        }
    };
}

/// Feed the name-then-value frames of every included property into `sink`.
///
/// Shared by digest, sign, and verify so the traversal order and inclusion
/// predicate cannot diverge between them. Unset and default-valued
/// properties are indistinguishable from absent ones here, which keeps the
/// digests of structurally-equal-but-differently-populated records
/// identical.
pub(crate) fn feed_frames(obj: &dyn Record, sink: &mut dyn ByteSink, inclusion: Inclusion) {
    for prop in obj.class_info().properties() {
        let included = match inclusion {
            Inclusion::Digest => prop.include_in_digest(),
            Inclusion::Signature => prop.include_in_signature(),
        };
        if !included || !prop.is_set(obj) || prop.is_default(obj) {
            continue;
        }
        sink.update(prop.name().as_bytes());
        match inclusion {
            Inclusion::Digest => prop.update_digest(obj, sink),
            Inclusion::Signature => prop.update_signature(obj, sink),
        }
    }
}

/// Generic record algorithms, available on every [`Record`] (including
/// `dyn Record`). All of them traverse the property registry in
/// registration order.
pub trait RecordExt: Record {
    /// Clone only explicitly-set properties into a fresh default instance,
    /// handing each value across as-is (nested records stay shared).
    fn shallow_clone(&self) -> Result<Box<dyn Record>, ModelError> {
        let me = self.as_record();
        let mut out = me.class_info().create_instance()?;
        for prop in me.class_info().properties() {
            if !prop.is_set(me) {
                continue;
            }
            if let Some(value) = prop.get(me) {
                prop.set(&mut *out, &value);
            }
        }
        Ok(out)
    }

    /// Clone explicitly-set properties into a fresh default instance,
    /// applying each property's copy semantics. Never-set properties keep
    /// their default on the clone, even if the source slot was raw-mutated:
    /// the clone is a snapshot, not a view.
    fn fclone(&self) -> Result<Box<dyn Record>, ModelError> {
        let me = self.as_record();
        let mut out = me.class_info().create_instance()?;
        for prop in me.class_info().properties() {
            if !prop.is_set(me) {
                continue;
            }
            prop.clone_property(me, &mut *out);
        }
        Ok(out)
    }

    /// Pull every property value from `other`, set or not. Whole-object
    /// overwrite, no merge.
    fn copy_from(&mut self, other: &dyn Record) {
        let info = self.as_record().class_info();
        for prop in info.properties() {
            if let Some(value) = prop.get(other) {
                prop.set(self.as_record_mut(), &value);
            }
        }
    }

    /// Map of `name -> other's value` for every property that differs.
    fn diff_with(&self, other: &dyn Record) -> HashMap<String, Value> {
        let me = self.as_record();
        let mut out = HashMap::new();
        for prop in me.class_info().properties() {
            prop.diff(me, other, &mut out);
        }
        out
    }

    /// Materialized delta: a fresh instance carrying every differing
    /// property value from `other`, or `None` when nothing differs.
    /// Construction failure is fatal here and propagates.
    fn hard_diff_with(&self, other: &dyn Record) -> Result<Option<Box<dyn Record>>, ModelError> {
        let me = self.as_record();
        let mut target = me.class_info().create_instance()?;
        let mut found = false;
        for prop in me.class_info().properties() {
            if prop.hard_diff(me, other, &mut *target) {
                found = true;
            }
        }
        Ok(found.then_some(target))
    }

    /// Total order: identical references are equal, an absent peer sorts
    /// lower, records of different concrete types order by class id alone,
    /// and same-type records order by the first differing property.
    fn compare_with(&self, other: Option<&dyn Record>) -> Ordering {
        let me = self.as_record();
        let Some(other) = other else {
            return Ordering::Greater;
        };
        if std::ptr::eq(
            me as *const dyn Record as *const u8,
            other as *const dyn Record as *const u8,
        ) {
            return Ordering::Equal;
        }
        if me.as_any().type_id() != other.as_any().type_id() {
            return me.class_info().id().cmp(other.class_info().id());
        }
        for prop in me.class_info().properties() {
            let ord = prop.compare(me, other);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Structural equality, induced by [`compare_with`](Self::compare_with).
    fn record_eq(&self, other: &dyn Record) -> bool {
        self.compare_with(Some(other)) == Ordering::Equal
    }

    /// Read a property by name; unknown names yield `None`.
    fn get_property(&self, name: &str) -> Option<Value> {
        let me = self.as_record();
        me.class_info()
            .property_by_name(name)
            .and_then(|p| p.get(me))
    }

    /// Write a property by name; unknown names are a silent no-op.
    fn set_property(&mut self, name: &str, value: &Value) -> bool {
        let info = self.as_record().class_info();
        match info.property_by_name(name) {
            Some(prop) => prop.set(self.as_record_mut(), value),
            None => false,
        }
    }

    /// Whether the named property was ever explicitly assigned.
    fn is_property_set(&self, name: &str) -> bool {
        let me = self.as_record();
        me.class_info()
            .property_by_name(name)
            .map(|p| p.is_set(me))
            .unwrap_or(false)
    }

    /// Whether the named property is effectively at its default: true when
    /// never assigned, otherwise a structural check against the default.
    fn has_default_value(&self, name: &str) -> bool {
        let me = self.as_record();
        match me.class_info().property_by_name(name) {
            Some(prop) => !prop.is_set(me) || prop.is_default(me),
            None => false,
        }
    }

    /// Canonical digest over the included, explicitly-set, non-default
    /// properties, framed name-then-value in registration order.
    ///
    /// With a non-empty `previous` hash the result is chained: the
    /// per-record digest is finalized on its own, then a fresh accumulator
    /// absorbs `previous` followed by that digest. Each record's own digest
    /// stays independently verifiable.
    fn digest(&self, algorithm: &str, previous: Option<&[u8]>) -> Result<Vec<u8>, CryptoError> {
        let me = self.as_record();
        let mut ctx = DigestContext::new(algorithm)?;
        feed_frames(me, &mut ctx, Inclusion::Digest);
        let own = ctx.finish();
        match previous {
            Some(prev) if !prev.is_empty() => {
                let mut chained = DigestContext::new(algorithm)?;
                chained.update(prev);
                chained.update(&own);
                Ok(chained.finish())
            }
            _ => Ok(own),
        }
    }

    /// Sign the signature-included properties with the named scheme.
    fn sign(&self, algorithm: &str, key: &PrivateKey) -> Result<Vec<u8>, CryptoError> {
        let me = self.as_record();
        let mut ctx = SigningContext::new(algorithm)?;
        feed_frames(me, &mut ctx, Inclusion::Signature);
        ctx.finish(key)
    }

    /// Verify a signature produced by [`sign`](Self::sign). A mismatch is
    /// `Ok(false)`; only unusable algorithms or keys are errors.
    fn verify(
        &self,
        signature: &[u8],
        algorithm: &str,
        key: &PublicKey,
    ) -> Result<bool, CryptoError> {
        let me = self.as_record();
        let mut ctx = VerifyContext::new(algorithm)?;
        feed_frames(me, &mut ctx, Inclusion::Signature);
        ctx.finish(signature, key)
    }

    /// Append `name: value` for every property, joined by `", "`. A
    /// property that cannot produce a value renders as `-`; one bad field
    /// never aborts the whole render.
    fn append(&self, out: &mut String) {
        let me = self.as_record();
        for (i, prop) in me.class_info().properties().iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(prop.name());
            out.push_str(": ");
            if !prop.append_value(me, out) {
                out.push('-');
            }
        }
    }

    /// Render the whole record through [`append`](Self::append).
    fn stringify(&self) -> String {
        let mut out = String::new();
        self.append(&mut out);
        out
    }

    /// One-way transition to the frozen state. Runs
    /// [`before_freeze`](Record::before_freeze) exactly once, before the
    /// flag becomes observable; repeated calls do nothing.
    fn freeze(&mut self) {
        if self.as_record().frozen_cell().is_frozen() {
            return;
        }
        self.as_record_mut().before_freeze();
        self.as_record_mut().frozen_cell_mut().engage();
    }

    /// Whether this instance has been frozen.
    fn is_frozen(&self) -> bool {
        self.as_record().frozen_cell().is_frozen()
    }
}

impl<R: Record + ?Sized> RecordExt for R {}
