// ── Namespace wrapper ──
//
// Owns the finalized connection options, the ordered class registry, and
// a selector-keyed cache of instance wrappers. Built once per monitoring
// session; instances are created lazily on first find and reused, so a
// refresh updates the same objects callers already hold.
//
// Single-threaded by contract (see crate docs): the cache is mutated only
// by first-access finds and by refresh, and no locking is implemented.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::descriptor::ClassDescriptor;
use crate::error::{Error, Result};
use crate::instance::Instance;
use crate::options::{ConnectionOptions, ConnectionOverrides};
use crate::selector::{Selector, SelectorKey};
use crate::transport::{Connector, Record, Transport};

// ── ConnectionState ─────────────────────────────────────────────────

/// Lifecycle of a namespace.
///
/// `Unconnected → Connected` (successful construct) `→ Stale` (detected
/// transport discontinuity) `→ Connected` (successful refresh) `→ Closed`
/// (terminal). Only construction and teardown are valid outside
/// `Connected`/`Stale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unconnected,
    Connected,
    Stale,
    Closed,
}

// ── Shared state ────────────────────────────────────────────────────

pub(crate) struct Shared<T: Transport> {
    options: ConnectionOptions,
    transport: RefCell<T>,
    classes: IndexMap<&'static str, ClassDescriptor>,
    /// class → selector identity → instance, in registration order and
    /// first-seen order respectively. Refresh walks this in order.
    cache: RefCell<IndexMap<&'static str, IndexMap<SelectorKey, Rc<Instance<T>>>>>,
    state: Cell<ConnectionState>,
}

impl<T: Transport> Shared<T> {
    /// Gate every query on the state machine, then delegate to the
    /// transport. Central choke point for instance and namespace reads.
    pub(crate) fn query(
        &self,
        class: &str,
        attributes: Option<&[&str]>,
        selector: &Selector,
    ) -> Result<Vec<Record>> {
        if self.state.get() == ConnectionState::Closed {
            return Err(Error::Closed);
        }
        self.transport
            .borrow_mut()
            .query(class, attributes, selector)
            .map_err(Error::from)
    }
}

// ── Builder ─────────────────────────────────────────────────────────

/// Builds a [`Namespace`]: configuration layers plus class registrations.
#[derive(Default)]
pub struct NamespaceBuilder {
    defaults: ConnectionOverrides,
    overrides: ConnectionOverrides,
    classes: Vec<ClassDescriptor>,
}

impl NamespaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter-level defaults (middle precedence layer).
    pub fn defaults(mut self, defaults: ConnectionOverrides) -> Self {
        self.defaults = defaults;
        self
    }

    /// Caller-supplied overrides (highest precedence layer).
    pub fn options(mut self, overrides: ConnectionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Register a class. Registration order is the refresh order.
    ///
    /// Panics on descriptor invariant violations or duplicate names —
    /// both are declaration-time programming errors.
    pub fn register(mut self, descriptor: ClassDescriptor) -> Self {
        descriptor.validate();
        assert!(
            !self.classes.iter().any(|c| c.name() == descriptor.name()),
            "class {:?} registered twice",
            descriptor.name(),
        );
        self.classes.push(descriptor);
        self
    }

    /// Merge the configuration layers and open the transport.
    ///
    /// Fails with [`Error::Connection`] if the transport cannot be
    /// reached; never retried here — retry cadence belongs to the caller.
    pub fn connect<C: Connector>(self, connector: &C) -> Result<Namespace<C::Transport>> {
        let options = ConnectionOptions::merged(&self.defaults, &self.overrides);
        let transport = connector.connect(&options)?;
        debug!(
            namespace = %options.namespace_path,
            classes = self.classes.len(),
            "namespace connected"
        );

        let mut classes = IndexMap::new();
        let mut cache = IndexMap::new();
        for descriptor in self.classes {
            cache.insert(descriptor.name(), IndexMap::new());
            classes.insert(descriptor.name(), descriptor);
        }

        Ok(Namespace {
            shared: Rc::new(Shared {
                options,
                transport: RefCell::new(transport),
                classes,
                cache: RefCell::new(cache),
                state: Cell::new(ConnectionState::Connected),
            }),
        })
    }
}

// ── Namespace ───────────────────────────────────────────────────────

/// Wrapper for one namespace of the remote interface.
pub struct Namespace<T: Transport> {
    shared: Rc<Shared<T>>,
}

impl<T: Transport> Namespace<T> {
    pub fn builder() -> NamespaceBuilder {
        NamespaceBuilder::new()
    }

    /// The merged connection options (immutable after construction).
    pub fn options(&self) -> &ConnectionOptions {
        &self.shared.options
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.state.get()
    }

    /// Descriptor of a registered class.
    pub fn descriptor(&self, class: &str) -> Result<&ClassDescriptor> {
        self.shared
            .classes
            .get(class)
            .ok_or_else(|| Error::UnknownClass(class.to_owned()))
    }

    /// Registered descriptors, in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.shared.classes.values()
    }

    /// Find the single instance of `class` matching `selector`, creating
    /// and caching the wrapper on first access.
    ///
    /// The selector is filtered to the class's static attributes before
    /// anything else; unknown keys are dropped, not rejected. Cached
    /// wrappers are keyed by the filtered selector's identity, so two
    /// calls that filter to the same selector share one wrapper.
    pub fn instance_of(&self, class: &str, selector: &Selector) -> Result<Rc<Instance<T>>> {
        if self.shared.state.get() == ConnectionState::Closed {
            return Err(Error::Closed);
        }
        let descriptor = *self.descriptor(class)?;
        let filtered = selector.filtered(descriptor.static_attributes());
        let key = filtered.key();

        if let Some(hit) = self
            .shared
            .cache
            .borrow()
            .get(descriptor.name())
            .and_then(|instances| instances.get(&key))
        {
            trace!(class = descriptor.name(), selector = %filtered, "instance cache hit");
            return Ok(Rc::clone(hit));
        }

        let instance = Instance::find(&self.shared, descriptor, &filtered)?;
        if let Some(instances) = self.shared.cache.borrow_mut().get_mut(descriptor.name()) {
            instances.insert(key, Rc::clone(&instance));
        }
        Ok(instance)
    }

    /// Enumerate every instance of `class` matching `selector`.
    ///
    /// One transport round trip; wrappers are built lazily from the
    /// returned batch and are NOT cached — only single-instance finds
    /// enter the refresh cache. Zero matches is [`Error::NotFound`].
    pub fn instances_of(&self, class: &str, selector: &Selector) -> Result<Instances<T>> {
        let descriptor = *self.descriptor(class)?;
        let filtered = selector.filtered(descriptor.static_attributes());
        let records = self.shared.query(
            descriptor.remote_name(),
            Some(descriptor.static_attributes()),
            &filtered,
        )?;
        if records.is_empty() {
            return Err(Error::NotFound {
                class: descriptor.name(),
                selector: filtered.to_string(),
            });
        }
        Ok(Instances {
            shared: Rc::downgrade(&self.shared),
            descriptor,
            selector: filtered,
            records: records.into_iter(),
        })
    }

    /// Re-validate the connection and refresh every cached instance in
    /// place, class registration order first, first-seen order within a
    /// class.
    ///
    /// A failed connection check marks the namespace `Stale` and returns
    /// the error. A failed per-instance refresh is parked on that instance
    /// (surfaced on its next read) and the walk continues — one vanished
    /// device must not block visibility into the others.
    pub fn refresh(&self) -> Result<()> {
        if self.shared.state.get() == ConnectionState::Closed {
            return Err(Error::Closed);
        }
        if let Err(error) = self.shared.transport.borrow_mut().check() {
            self.shared.state.set(ConnectionState::Stale);
            return Err(error.into());
        }

        let cache = self.shared.cache.borrow();
        for (class, instances) in cache.iter() {
            for instance in instances.values() {
                if let Err(error) = instance.refresh() {
                    warn!(
                        class = *class,
                        selector = %instance.selector(),
                        %error,
                        "instance refresh failed; parked for next read"
                    );
                    instance.set_fault(error);
                }
            }
        }
        self.shared.state.set(ConnectionState::Connected);
        Ok(())
    }

    /// Record a caller-detected transport discontinuity (e.g. the polled
    /// process exited). The next successful [`refresh`](Self::refresh)
    /// returns to `Connected`.
    pub fn mark_stale(&self) {
        if self.shared.state.get() != ConnectionState::Closed {
            self.shared.state.set(ConnectionState::Stale);
        }
    }

    /// Tear down. Terminal: every later find, read, or refresh fails with
    /// [`Error::Closed`].
    pub fn close(&self) {
        self.shared.state.set(ConnectionState::Closed);
        debug!(namespace = %self.shared.options.namespace_path, "namespace closed");
    }

    /// Number of cached instances across all classes.
    pub fn cached_instances(&self) -> usize {
        self.shared
            .cache
            .borrow()
            .values()
            .map(IndexMap::len)
            .sum()
    }
}

// ── Lazy enumeration ────────────────────────────────────────────────

/// Lazy sequence of instance wrappers from one enumeration query.
pub struct Instances<T: Transport> {
    shared: Weak<Shared<T>>,
    descriptor: ClassDescriptor,
    selector: Selector,
    records: std::vec::IntoIter<Record>,
}

impl<T: Transport> Iterator for Instances<T> {
    type Item = Rc<Instance<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(Rc::new(Instance::from_record(
            self.shared.clone(),
            self.descriptor,
            self.selector.clone(),
            &record,
        )))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl<T: Transport> ExactSizeIterator for Instances<T> {}
