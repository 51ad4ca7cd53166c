//! Typed, cached wrapper layer over a WMI-style management interface.
//!
//! A management interface of this shape exposes a *namespace* of named
//! classes; each class has instances selected by key attributes, and each
//! instance carries both immutable "static" attributes and live "dynamic"
//! attributes that must be re-queried on every access. This crate models
//! that as a strongly-typed local object graph:
//!
//! - **[`Transport`] / [`Connector`]** — the boundary to the external
//!   interface: query-by-class-and-selector returning zero or more
//!   [`Record`]s, with attribute projection for narrow re-fetches. The real
//!   transport lives outside this crate; [`transport::memory`] provides an
//!   in-memory implementation for tests and examples.
//!
//! - **[`ClassDescriptor`]** — per-class metadata declaring which attribute
//!   names are static (fetched once, cached per instance) and which are
//!   dynamic (re-fetched on every read).
//!
//! - **[`Instance`]** — one remote object: a cached static-attribute
//!   snapshot, plus on-demand dynamic reads scoped to the instance's key
//!   attribute. [`Instance::refresh`] re-fetches statics in place, so
//!   external references stay valid.
//!
//! - **[`Namespace`]** — owns the merged [`ConnectionOptions`], the class
//!   registry, and a selector-keyed cache of instances; [`Namespace::refresh`]
//!   re-validates the connection and refreshes every cached instance with
//!   per-instance failure isolation.
//!
//! Splitting static from dynamic attributes avoids re-querying immutable
//! identity fields on every poll cycle while keeping sensor-like values
//! always current.
//!
//! # Threading
//!
//! The whole layer is single-threaded, synchronous, and blocking: every
//! transport query blocks the calling thread, and a [`Namespace`] (with its
//! instances) must stay on the thread that created it. Polling cadence,
//! retries, and timeouts are the caller's concern — this layer never
//! retries internally.

pub mod descriptor;
pub mod error;
pub mod instance;
pub mod namespace;
pub mod options;
pub mod selector;
pub mod transport;

pub use descriptor::ClassDescriptor;
pub use error::{Error, Result};
pub use instance::Instance;
pub use namespace::{ConnectionState, Instances, Namespace, NamespaceBuilder};
pub use options::{ConnectionOptions, ConnectionOverrides};
pub use selector::{Selector, SelectorKey};
pub use transport::{Connector, Record, Transport, TransportError};
