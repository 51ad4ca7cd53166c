// ── Instance wrapper ──
//
// One remote object: a cached static-attribute snapshot (positionally
// aligned with the descriptor's static list), the filtered selector that
// located it, and a weak back-reference to the owning namespace used to
// service dynamic reads. Dynamic reads are never cached — every access
// issues a fresh projected query keyed on the instance's key attribute.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::warn;

use crate::descriptor::ClassDescriptor;
use crate::error::{Error, Result};
use crate::namespace::Shared;
use crate::selector::Selector;
use crate::transport::{Record, Transport};

/// Wrapper for one instance of a registered class.
///
/// Vended as `Rc<Instance<T>>` by [`Namespace`](crate::Namespace); the
/// namespace keeps the same `Rc` in its cache, so refresh updates the
/// object every external reference already points at.
pub struct Instance<T: Transport> {
    shared: Weak<Shared<T>>,
    descriptor: ClassDescriptor,
    selector: Selector,
    statics: RefCell<Vec<Value>>,
    /// Error from a failed background refresh, surfaced on the next read.
    fault: RefCell<Option<Error>>,
}

impl<T: Transport> Instance<T> {
    /// Find the single instance matching `selector` (already filtered).
    ///
    /// Zero matches is [`Error::NotFound`]. More than one match is a
    /// non-fatal anomaly: a warning is logged and the first record in the
    /// transport's native order wins, which keeps repeated calls against
    /// the same record set idempotent.
    pub(crate) fn find(
        shared: &Rc<Shared<T>>,
        descriptor: ClassDescriptor,
        selector: &Selector,
    ) -> Result<Rc<Self>> {
        let records = shared.query(
            descriptor.remote_name(),
            Some(descriptor.static_attributes()),
            selector,
        )?;
        let record = Self::single(&descriptor, selector, &records)?;
        Ok(Rc::new(Self::from_record(
            Rc::downgrade(shared),
            descriptor,
            selector.clone(),
            record,
        )))
    }

    /// Build a wrapper directly from an already-fetched record.
    pub(crate) fn from_record(
        shared: Weak<Shared<T>>,
        descriptor: ClassDescriptor,
        selector: Selector,
        record: &Record,
    ) -> Self {
        let statics = Self::snapshot(&descriptor, record);
        Self {
            shared,
            descriptor,
            selector,
            statics: RefCell::new(statics),
            fault: RefCell::new(None),
        }
    }

    pub fn descriptor(&self) -> &ClassDescriptor {
        &self.descriptor
    }

    pub fn class(&self) -> &'static str {
        self.descriptor.name()
    }

    /// The filtered selector that located this instance.
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Cached static attribute value. Never re-queries.
    pub fn static_value(&self, attribute: &str) -> Result<Value> {
        self.take_fault()?;
        let index = self
            .descriptor
            .static_index(attribute)
            .ok_or_else(|| Error::UnknownAttribute {
                class: self.descriptor.name(),
                attribute: attribute.to_owned(),
            })?;
        Ok(self.statics.borrow()[index].clone())
    }

    /// Live dynamic attribute value: one fresh transport query per read.
    pub fn dynamic_value(&self, attribute: &str) -> Result<Value> {
        let record = self.dynamic_values(&[attribute])?;
        record
            .get(attribute)
            .cloned()
            .ok_or_else(|| Error::AttributeUnavailable {
                class: self.descriptor.name(),
                attributes: vec![attribute.to_owned()],
            })
    }

    /// Batched dynamic read: one query projected to `attributes`, scoped to
    /// this instance's key attribute.
    pub fn dynamic_values(&self, attributes: &[&str]) -> Result<Record> {
        self.take_fault()?;
        for attribute in attributes {
            if !self.descriptor.is_dynamic(attribute) {
                return Err(Error::UnknownAttribute {
                    class: self.descriptor.name(),
                    attribute: (*attribute).to_owned(),
                });
            }
        }

        let shared = self.shared.upgrade().ok_or(Error::Closed)?;
        let identity = self.identity_selector()?;
        let records = shared.query(self.descriptor.remote_name(), Some(attributes), &identity)?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| Error::AttributeUnavailable {
                class: self.descriptor.name(),
                attributes: attributes.iter().map(|a| (*a).to_owned()).collect(),
            })
    }

    /// Re-run the static fetch with the original selector, overwriting the
    /// cached snapshot in place. The wrapper's identity survives; any
    /// parked fault is cleared on success.
    pub fn refresh(&self) -> Result<()> {
        let shared = self.shared.upgrade().ok_or(Error::Closed)?;
        let records = shared.query(
            self.descriptor.remote_name(),
            Some(self.descriptor.static_attributes()),
            &self.selector,
        )?;
        let record = Self::single(&self.descriptor, &self.selector, &records)?;
        *self.statics.borrow_mut() = Self::snapshot(&self.descriptor, record);
        self.fault.borrow_mut().take();
        Ok(())
    }

    /// Park a refresh error to be surfaced on the next read.
    pub(crate) fn set_fault(&self, error: Error) {
        *self.fault.borrow_mut() = Some(error);
    }

    // ── Typed accessors ─────────────────────────────────────────────

    pub fn static_str(&self, attribute: &str) -> Result<String> {
        match self.static_value(attribute)? {
            Value::String(s) => Ok(s),
            value => Err(self.type_mismatch(attribute, "string", value)),
        }
    }

    pub fn static_i64(&self, attribute: &str) -> Result<i64> {
        let value = self.static_value(attribute)?;
        value
            .as_i64()
            .ok_or_else(|| self.type_mismatch(attribute, "integer", value))
    }

    pub fn static_f64(&self, attribute: &str) -> Result<f64> {
        let value = self.static_value(attribute)?;
        value
            .as_f64()
            .ok_or_else(|| self.type_mismatch(attribute, "number", value))
    }

    pub fn dynamic_str(&self, attribute: &str) -> Result<String> {
        match self.dynamic_value(attribute)? {
            Value::String(s) => Ok(s),
            value => Err(self.type_mismatch(attribute, "string", value)),
        }
    }

    pub fn dynamic_i64(&self, attribute: &str) -> Result<i64> {
        let value = self.dynamic_value(attribute)?;
        value
            .as_i64()
            .ok_or_else(|| self.type_mismatch(attribute, "integer", value))
    }

    pub fn dynamic_f64(&self, attribute: &str) -> Result<f64> {
        let value = self.dynamic_value(attribute)?;
        value
            .as_f64()
            .ok_or_else(|| self.type_mismatch(attribute, "number", value))
    }

    // ── Internals ───────────────────────────────────────────────────

    /// `{key_attribute: cached key value}` — precise even for instances
    /// found through a broad enumeration selector.
    fn identity_selector(&self) -> Result<Selector> {
        let key = self.descriptor.key_attribute();
        let index = self
            .descriptor
            .static_index(key)
            .ok_or_else(|| Error::UnknownAttribute {
                class: self.descriptor.name(),
                attribute: key.to_owned(),
            })?;
        let value = self.statics.borrow()[index].clone();
        Ok(Selector::new().with(key, value))
    }

    fn take_fault(&self) -> Result<()> {
        match self.fault.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn single<'r>(
        descriptor: &ClassDescriptor,
        selector: &Selector,
        records: &'r [Record],
    ) -> Result<&'r Record> {
        if records.len() > 1 {
            warn!(
                class = descriptor.name(),
                %selector,
                matches = records.len(),
                "multiple instances matched; using the first in transport order"
            );
        }
        records.first().ok_or_else(|| Error::NotFound {
            class: descriptor.name(),
            selector: selector.to_string(),
        })
    }

    fn snapshot(descriptor: &ClassDescriptor, record: &Record) -> Vec<Value> {
        descriptor
            .static_attributes()
            .iter()
            .map(|attribute| record.get(attribute).cloned().unwrap_or(Value::Null))
            .collect()
    }

    fn type_mismatch(&self, attribute: &str, expected: &'static str, value: Value) -> Error {
        Error::TypeMismatch {
            class: self.descriptor.name(),
            attribute: attribute.to_owned(),
            expected,
            value,
        }
    }
}

impl<T: Transport> std::fmt::Debug for Instance<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.descriptor.name())
            .field("selector", &self.selector.to_string())
            .field("statics", &self.statics.borrow())
            .finish_non_exhaustive()
    }
}
