// ── Transport boundary ──
//
// The external management interface this crate wraps: a blocking
// query-by-class-and-selector capability returning zero or more opaque
// records. The production transport lives outside this workspace; the
// `memory` submodule provides a first-party in-memory implementation for
// tests and examples.

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::options::ConnectionOptions;
use crate::selector::Selector;

/// Failures at the transport boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The interface could not be reached at connect/check time.
    #[error("transport unreachable: {0}")]
    Unreachable(String),

    /// A query was rejected or failed mid-flight.
    #[error("query against {class} failed: {message}")]
    Query { class: String, message: String },

    /// An established connection was lost.
    #[error("connection lost: {0}")]
    Disconnected(String),
}

/// One opaque record returned by a query: an ordered attribute map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    attributes: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy of this record narrowed to `attributes`, in the order given.
    /// Names absent from the record are skipped.
    pub fn projected(&self, attributes: &[&str]) -> Record {
        attributes
            .iter()
            .filter_map(|name| {
                self.attributes
                    .get_key_value(*name)
                    .map(|(k, v)| (k.clone(), v.clone()))
            })
            .collect()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

/// Blocking query access to the remote interface.
///
/// Implementations return records in their native order; callers treat
/// that order as the deterministic tie-breaker when a selector matches
/// more than one instance.
pub trait Transport {
    /// Query instances of `class` matching `selector`.
    ///
    /// `attributes` narrows the returned records to the named attributes
    /// (`None` = all). Matching always considers the full instance, only
    /// the projection is narrowed — this is what makes cheap
    /// dynamic-attribute-only re-fetches possible.
    fn query(
        &mut self,
        class: &str,
        attributes: Option<&[&str]>,
        selector: &Selector,
    ) -> Result<Vec<Record>, TransportError>;

    /// Re-validate the underlying connection (used by namespace refresh).
    fn check(&mut self) -> Result<(), TransportError>;
}

/// Opens a [`Transport`] from finalized connection options.
pub trait Connector {
    type Transport: Transport;

    fn connect(&self, options: &ConnectionOptions) -> Result<Self::Transport, TransportError>;
}

pub mod memory {
    //! In-memory transport for tests and examples.
    //!
    //! Clones share one backing store, so a test can keep a handle, hand a
    //! clone to a namespace, and mutate records or reachability from the
    //! outside. A query counter makes "dynamic reads are never cached"
    //! assertions possible.

    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::Value;

    use super::{Connector, Record, Transport, TransportError};
    use crate::options::ConnectionOptions;
    use crate::selector::Selector;

    #[derive(Debug)]
    struct Store {
        classes: indexmap::IndexMap<String, Vec<Record>>,
        reachable: bool,
        queries: usize,
    }

    /// Shared-state in-memory [`Transport`] and [`Connector`].
    #[derive(Debug, Clone)]
    pub struct MemoryTransport {
        store: Rc<RefCell<Store>>,
    }

    impl MemoryTransport {
        pub fn new() -> Self {
            Self {
                store: Rc::new(RefCell::new(Store {
                    classes: indexmap::IndexMap::new(),
                    reachable: true,
                    queries: 0,
                })),
            }
        }

        /// Append a record to `class` (creating the class on first use).
        pub fn insert(&self, class: &str, record: Record) {
            self.store
                .borrow_mut()
                .classes
                .entry(class.to_owned())
                .or_default()
                .push(record);
        }

        /// Overwrite one attribute of the `index`-th record of `class`.
        /// Unknown classes and out-of-range indices are ignored, like
        /// [`remove_all`](Self::remove_all).
        pub fn update(&self, class: &str, index: usize, attribute: &str, value: impl Into<Value>) {
            if let Some(record) = self
                .store
                .borrow_mut()
                .classes
                .get_mut(class)
                .and_then(|records| records.get_mut(index))
            {
                record.set(attribute, value);
            }
        }

        /// Drop every record of `class` (simulates remote objects vanishing).
        pub fn remove_all(&self, class: &str) {
            if let Some(records) = self.store.borrow_mut().classes.get_mut(class) {
                records.clear();
            }
        }

        /// Toggle reachability; unreachable transports fail `connect`,
        /// `query`, and `check`.
        pub fn set_reachable(&self, reachable: bool) {
            self.store.borrow_mut().reachable = reachable;
        }

        /// Number of `query` calls served so far (`check` not counted).
        pub fn query_count(&self) -> usize {
            self.store.borrow().queries
        }
    }

    impl Default for MemoryTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    fn matches(record: &Record, selector: &Selector) -> bool {
        selector
            .iter()
            .all(|(name, value)| record.get(name) == Some(value))
    }

    impl Transport for MemoryTransport {
        fn query(
            &mut self,
            class: &str,
            attributes: Option<&[&str]>,
            selector: &Selector,
        ) -> Result<Vec<Record>, TransportError> {
            let mut store = self.store.borrow_mut();
            if !store.reachable {
                return Err(TransportError::Disconnected(
                    "memory transport marked unreachable".into(),
                ));
            }
            store.queries += 1;

            let records = store.classes.get(class).map_or(&[][..], Vec::as_slice);
            Ok(records
                .iter()
                .filter(|record| matches(record, selector))
                .map(|record| match attributes {
                    Some(names) => record.projected(names),
                    None => record.clone(),
                })
                .collect())
        }

        fn check(&mut self) -> Result<(), TransportError> {
            if self.store.borrow().reachable {
                Ok(())
            } else {
                Err(TransportError::Unreachable(
                    "memory transport marked unreachable".into(),
                ))
            }
        }
    }

    impl Connector for MemoryTransport {
        type Transport = MemoryTransport;

        fn connect(&self, _options: &ConnectionOptions) -> Result<Self, TransportError> {
            if self.store.borrow().reachable {
                Ok(self.clone())
            } else {
                Err(TransportError::Unreachable(
                    "memory transport marked unreachable".into(),
                ))
            }
        }
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    mod tests {
        use pretty_assertions::assert_eq;
        use serde_json::json;

        use super::*;

        fn transport() -> MemoryTransport {
            let t = MemoryTransport::new();
            t.insert(
                "Sensor",
                Record::new()
                    .with("SensorType", "Load")
                    .with("Index", 0)
                    .with("Value", 42.5),
            );
            t.insert(
                "Sensor",
                Record::new()
                    .with("SensorType", "Load")
                    .with("Index", 1)
                    .with("Value", 7.0),
            );
            t
        }

        #[test]
        fn selector_matching_is_subset_equality() {
            let mut t = transport();
            let hits = t
                .query(
                    "Sensor",
                    None,
                    &Selector::new().with("SensorType", "Load").with("Index", 1),
                )
                .unwrap();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].get("Value"), Some(&json!(7.0)));
        }

        #[test]
        fn projection_narrows_but_matching_sees_all() {
            let mut t = transport();
            let hits = t
                .query(
                    "Sensor",
                    Some(&["Value"]),
                    &Selector::new().with("Index", 0),
                )
                .unwrap();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].len(), 1);
            assert_eq!(hits[0].get("Value"), Some(&json!(42.5)));
            assert_eq!(hits[0].get("Index"), None);
        }

        #[test]
        fn update_of_missing_records_is_ignored() {
            let mut t = transport();
            t.update("Sensor", 99, "Value", 0.0);
            t.update("Hardware", 0, "Value", 0.0);

            let hits = t.query("Sensor", None, &Selector::new()).unwrap();
            assert_eq!(hits[0].get("Value"), Some(&json!(42.5)));
        }

        #[test]
        fn unknown_class_returns_empty() {
            let mut t = transport();
            let hits = t.query("Hardware", None, &Selector::new()).unwrap();
            assert!(hits.is_empty());
        }

        #[test]
        fn query_counter_increments_per_call() {
            let mut t = transport();
            assert_eq!(t.query_count(), 0);
            t.query("Sensor", None, &Selector::new()).unwrap();
            t.query("Sensor", None, &Selector::new()).unwrap();
            assert_eq!(t.query_count(), 2);
        }

        #[test]
        fn unreachable_fails_everything() {
            let mut t = transport();
            t.set_reachable(false);
            assert!(t.check().is_err());
            assert!(t.query("Sensor", None, &Selector::new()).is_err());
            assert!(
                Connector::connect(&t, &ConnectionOptions::default()).is_err(),
                "connect should fail while unreachable"
            );
        }
    }
}
