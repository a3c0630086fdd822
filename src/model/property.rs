// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property descriptors: the per-property capability contract.
//!
//! A [`Property`] is registered once per concrete property and implements the
//! whole capability surface ([`PropertyInfo`]) generically: generic
//! algorithms never branch on concrete record types, they call the
//! descriptor. Instance storage goes through [`Slot`], which keeps the
//! "explicitly assigned" flag separate from "equals the default value" -
//! the two states interact but are never conflated.

use crate::crypto::ByteSink;
use crate::model::record::{feed_frames, Record, RecordExt};
use crate::model::value::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

/// Which inclusion flag gates a byte-framing traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Digest,
    Signature,
}

/// Ownership semantics applied by `clone_property`.
///
/// `Value` copies the stored value as-is (for `Arc`-held nested records that
/// shares the inner record); `Deep` invokes
/// [`PropertyValue::deep_clone`], which rebuilds nested records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    Value,
    Deep,
}

/// Per-instance storage cell for one property.
///
/// Tracks whether a value was ever explicitly assigned, which is distinct
/// from the value happening to equal the property default. [`Slot::raw_mut`]
/// mutates the stored value without recording an assignment; snapshots taken
/// by `fclone` ignore such values and keep the default.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    value: T,
    set: bool,
}

impl<T> Slot<T> {
    /// Create an unset slot seeded with the property default.
    pub fn new(default: T) -> Self {
        Self {
            value: default,
            set: false,
        }
    }

    /// Create a slot that already carries an explicit value.
    pub fn with(value: T) -> Self {
        Self { value, set: true }
    }

    /// Current value, explicit or default-seeded.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Assign an explicit value.
    pub fn assign(&mut self, value: T) {
        self.value = value;
        self.set = true;
    }

    /// Mutate the stored value without recording an explicit assignment.
    pub fn raw_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// True iff an explicit value was ever assigned.
    pub fn is_set(&self) -> bool {
        self.set
    }

    /// Return to the pristine unset state.
    pub fn reset(&mut self, default: T) {
        self.value = default;
        self.set = false;
    }
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Types usable as property values.
///
/// Provides the pieces a descriptor needs for one value: total ordering,
/// [`Value`] conversion, canonical byte framing, and rendering. Implemented
/// for scalars, `String`, `Vec<T>`, and `Arc<R: Record>`.
pub trait PropertyValue: Clone + Send + Sync + 'static {
    /// Structural total order (floats use `total_cmp`).
    fn property_cmp(&self, other: &Self) -> Ordering;

    /// Convert into the type-erased currency.
    fn to_value(&self) -> Value;

    /// Convert back from the type-erased currency; `None` on a variant
    /// mismatch.
    fn from_value(value: &Value) -> Option<Self>;

    /// Feed canonical bytes into a streaming accumulator. Composite values
    /// feed every element in a deterministic order; nested records feed the
    /// name-then-value frames of their own included properties, gated by
    /// `inclusion`.
    fn feed(&self, sink: &mut dyn ByteSink, inclusion: Inclusion);

    /// Append a textual representation.
    fn render(&self, out: &mut String);

    /// Copy applying deep-ownership semantics; the default is a plain clone.
    fn deep_clone(&self) -> Self {
        self.clone()
    }
}

macro_rules! impl_int_property_value {
    ($ty:ty, $variant:ident) => {
        impl PropertyValue for $ty {
            fn property_cmp(&self, other: &Self) -> Ordering {
                Ord::cmp(self, other)
            }
            fn to_value(&self) -> Value {
                Value::$variant(*self)
            }
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }
            fn feed(&self, sink: &mut dyn ByteSink, _inclusion: Inclusion) {
                sink.update(&self.to_be_bytes());
            }
            fn render(&self, out: &mut String) {
                let _ = write!(out, "{}", self);
            }
        }
    };
}

impl_int_property_value!(u8, U8);
impl_int_property_value!(u16, U16);
impl_int_property_value!(u32, U32);
impl_int_property_value!(u64, U64);
impl_int_property_value!(i8, I8);
impl_int_property_value!(i16, I16);
impl_int_property_value!(i32, I32);
impl_int_property_value!(i64, I64);

macro_rules! impl_float_property_value {
    ($ty:ty, $variant:ident) => {
        impl PropertyValue for $ty {
            fn property_cmp(&self, other: &Self) -> Ordering {
                self.total_cmp(other)
            }
            fn to_value(&self) -> Value {
                Value::$variant(*self)
            }
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }
            fn feed(&self, sink: &mut dyn ByteSink, _inclusion: Inclusion) {
                sink.update(&self.to_be_bytes());
            }
            fn render(&self, out: &mut String) {
                let _ = write!(out, "{}", self);
            }
        }
    };
}

impl_float_property_value!(f32, F32);
impl_float_property_value!(f64, F64);

impl PropertyValue for bool {
    fn property_cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(self, other)
    }
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
    fn feed(&self, sink: &mut dyn ByteSink, _inclusion: Inclusion) {
        sink.update(&[u8::from(*self)]);
    }
    fn render(&self, out: &mut String) {
        out.push_str(if *self { "true" } else { "false" });
    }
}

impl PropertyValue for String {
    fn property_cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(self, other)
    }
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v.clone()),
            _ => None,
        }
    }
    fn feed(&self, sink: &mut dyn ByteSink, _inclusion: Inclusion) {
        sink.update(self.as_bytes());
    }
    fn render(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl<T: PropertyValue> PropertyValue for Vec<T> {
    fn property_cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.iter().zip(other.iter()) {
            let ord = a.property_cmp(b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.len().cmp(&other.len())
    }
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(PropertyValue::to_value).collect())
    }
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
    fn feed(&self, sink: &mut dyn ByteSink, inclusion: Inclusion) {
        // Length prefix keeps element boundaries unambiguous.
        sink.update(&(self.len() as u64).to_be_bytes());
        for item in self {
            item.feed(sink, inclusion);
        }
    }
    fn render(&self, out: &mut String) {
        out.push('[');
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            item.render(out);
        }
        out.push(']');
    }
    fn deep_clone(&self) -> Self {
        self.iter().map(PropertyValue::deep_clone).collect()
    }
}

impl<R: Record + Clone> PropertyValue for Arc<R> {
    fn property_cmp(&self, other: &Self) -> Ordering {
        self.as_ref().compare_with(Some(other.as_ref().as_record()))
    }
    fn to_value(&self) -> Value {
        Value::Object(Arc::clone(self) as Arc<dyn Record>)
    }
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            // Shares the inner record when the concrete type matches.
            Value::Object(obj) => Arc::clone(obj).as_arc_any().downcast::<R>().ok(),
            _ => None,
        }
    }
    fn feed(&self, sink: &mut dyn ByteSink, inclusion: Inclusion) {
        feed_frames(self.as_ref().as_record(), sink, inclusion);
    }
    fn render(&self, out: &mut String) {
        self.as_ref().append(out);
    }
    fn deep_clone(&self) -> Self {
        Arc::new(self.as_ref().clone())
    }
}

/// The capability contract of one named, typed property.
///
/// Object-safe so registries can hold descriptors of heterogeneous value
/// types. All methods accept `dyn Record` and quietly do nothing when handed
/// an instance of the wrong concrete type.
pub trait PropertyInfo: Send + Sync {
    /// Stable identifier; its UTF-8 bytes frame digest/signature input.
    fn name(&self) -> &'static str;

    /// Whether this property participates in digests.
    fn include_in_digest(&self) -> bool;

    /// Whether this property participates in signatures.
    fn include_in_signature(&self) -> bool;

    /// Read the current value (explicit or default-seeded).
    fn get(&self, obj: &dyn Record) -> Option<Value>;

    /// Write a value. Returns false on a frozen instance, a variant
    /// mismatch, or a concrete-type mismatch; never panics.
    fn set(&self, obj: &mut dyn Record, value: &Value) -> bool;

    /// True iff an explicit value was ever assigned.
    fn is_set(&self, obj: &dyn Record) -> bool;

    /// True iff the current value structurally equals the property default,
    /// regardless of `is_set`.
    fn is_default(&self, obj: &dyn Record) -> bool;

    /// Return the slot to its pristine unset state.
    fn reset(&self, obj: &mut dyn Record);

    /// Structural ordering of this property's value across two instances.
    fn compare(&self, a: &dyn Record, b: &dyn Record) -> Ordering;

    /// If the values differ, insert `name -> b's value` into `out`.
    fn diff(&self, a: &dyn Record, b: &dyn Record, out: &mut HashMap<String, Value>);

    /// Like `diff`, but assigns the differing value onto `target`'s same
    /// property; reports whether a difference was found.
    fn hard_diff(&self, a: &dyn Record, b: &dyn Record, target: &mut dyn Record) -> bool;

    /// Feed canonical value bytes into a digest accumulator.
    fn update_digest(&self, obj: &dyn Record, sink: &mut dyn ByteSink);

    /// Feed canonical value bytes into a signature accumulator.
    fn update_signature(&self, obj: &dyn Record, sink: &mut dyn ByteSink);

    /// Copy the value from `src` to `dst` applying this property's
    /// [`CopyMode`].
    fn clone_property(&self, src: &dyn Record, dst: &mut dyn Record);

    /// Append the rendered value; false when no value could be produced.
    fn append_value(&self, obj: &dyn Record, out: &mut String) -> bool;
}

/// The one generic [`PropertyInfo`] implementation.
///
/// Bound to a concrete record type `R` and value type `T` through accessor
/// fn pointers; the default value is owned by the descriptor (as a producer
/// fn), so `is_default` stays meaningful even for raw-mutated slots.
pub struct Property<R, T> {
    name: &'static str,
    read: fn(&R) -> &Slot<T>,
    write: fn(&mut R) -> &mut Slot<T>,
    default: fn() -> T,
    include_in_digest: bool,
    include_in_signature: bool,
    copy: CopyMode,
}

impl<R: Record, T: PropertyValue> Property<R, T> {
    /// Create a descriptor included in both digests and signatures, with
    /// plain value-copy semantics.
    pub fn new(
        name: &'static str,
        read: fn(&R) -> &Slot<T>,
        write: fn(&mut R) -> &mut Slot<T>,
        default: fn() -> T,
    ) -> Self {
        Self {
            name,
            read,
            write,
            default,
            include_in_digest: true,
            include_in_signature: true,
            copy: CopyMode::Value,
        }
    }

    /// Exclude this property from digests.
    pub fn exclude_from_digest(mut self) -> Self {
        self.include_in_digest = false;
        self
    }

    /// Exclude this property from signatures.
    pub fn exclude_from_signature(mut self) -> Self {
        self.include_in_signature = false;
        self
    }

    /// Use deep-copy semantics in `clone_property`.
    pub fn deep_copy(mut self) -> Self {
        self.copy = CopyMode::Deep;
        self
    }

    fn slot<'a>(&self, obj: &'a dyn Record) -> Option<&'a Slot<T>> {
        obj.as_any().downcast_ref::<R>().map(|r| (self.read)(r))
    }

    fn slot_mut<'a>(&self, obj: &'a mut dyn Record) -> Option<&'a mut Slot<T>> {
        obj.as_any_mut().downcast_mut::<R>().map(|r| (self.write)(r))
    }
}

impl<R: Record, T: PropertyValue> PropertyInfo for Property<R, T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn include_in_digest(&self) -> bool {
        self.include_in_digest
    }

    fn include_in_signature(&self) -> bool {
        self.include_in_signature
    }

    fn get(&self, obj: &dyn Record) -> Option<Value> {
        self.slot(obj).map(|s| s.get().to_value())
    }

    fn set(&self, obj: &mut dyn Record, value: &Value) -> bool {
        if obj.frozen_cell().is_frozen() {
            return false;
        }
        let Some(v) = T::from_value(value) else {
            return false;
        };
        match self.slot_mut(obj) {
            Some(slot) => {
                slot.assign(v);
                true
            }
            None => false,
        }
    }

    fn is_set(&self, obj: &dyn Record) -> bool {
        self.slot(obj).map(Slot::is_set).unwrap_or(false)
    }

    fn is_default(&self, obj: &dyn Record) -> bool {
        self.slot(obj)
            .map(|s| s.get().property_cmp(&(self.default)()) == Ordering::Equal)
            .unwrap_or(false)
    }

    fn reset(&self, obj: &mut dyn Record) {
        if let Some(slot) = self.slot_mut(obj) {
            slot.reset((self.default)());
        }
    }

    fn compare(&self, a: &dyn Record, b: &dyn Record) -> Ordering {
        match (self.slot(a), self.slot(b)) {
            (Some(x), Some(y)) => x.get().property_cmp(y.get()),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }

    fn diff(&self, a: &dyn Record, b: &dyn Record, out: &mut HashMap<String, Value>) {
        if self.compare(a, b) != Ordering::Equal {
            if let Some(v) = self.get(b) {
                out.insert(self.name.to_string(), v);
            }
        }
    }

    fn hard_diff(&self, a: &dyn Record, b: &dyn Record, target: &mut dyn Record) -> bool {
        if self.compare(a, b) == Ordering::Equal {
            return false;
        }
        let Some(src) = self.slot(b) else {
            return false;
        };
        let value = src.get().clone();
        match self.slot_mut(target) {
            Some(slot) => {
                slot.assign(value);
                true
            }
            None => false,
        }
    }

    fn update_digest(&self, obj: &dyn Record, sink: &mut dyn ByteSink) {
        if let Some(slot) = self.slot(obj) {
            slot.get().feed(sink, Inclusion::Digest);
        }
    }

    fn update_signature(&self, obj: &dyn Record, sink: &mut dyn ByteSink) {
        if let Some(slot) = self.slot(obj) {
            slot.get().feed(sink, Inclusion::Signature);
        }
    }

    fn clone_property(&self, src: &dyn Record, dst: &mut dyn Record) {
        let Some(slot) = self.slot(src) else {
            return;
        };
        let value = match self.copy {
            CopyMode::Value => slot.get().clone(),
            CopyMode::Deep => slot.get().deep_clone(),
        };
        if let Some(target) = self.slot_mut(dst) {
            target.assign(value);
        }
    }

    fn append_value(&self, obj: &dyn Record, out: &mut String) -> bool {
        match self.slot(obj) {
            Some(slot) => {
                slot.get().render(out);
                true
            }
            None => false,
        }
    }
}
