// ── Class descriptors ──
//
// Per-class metadata consulted by Instance and Namespace. Purely
// declarative: which attributes are static (fetched once, cached) and
// which are dynamic (re-fetched on every read), plus the key attribute
// used to re-identify one instance for dynamic reads.

/// Declaration-time metadata for one remote class.
///
/// Built `const` by domain adapters and registered on a
/// [`NamespaceBuilder`](crate::NamespaceBuilder). Invariants (checked at
/// registration): the static and dynamic lists are disjoint, and the key
/// attribute is one of the static attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassDescriptor {
    name: &'static str,
    remote_name: Option<&'static str>,
    key_attribute: &'static str,
    statics: &'static [&'static str],
    dynamics: &'static [&'static str],
}

impl ClassDescriptor {
    pub const fn new(
        name: &'static str,
        key_attribute: &'static str,
        statics: &'static [&'static str],
        dynamics: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            remote_name: None,
            key_attribute,
            statics,
            dynamics,
        }
    }

    /// Override the class name used on the wire.
    ///
    /// For classes whose natural name collides with a reserved or awkward
    /// identifier locally (e.g. registering `Win32_Process` as `Process`).
    pub const fn remote(mut self, remote_name: &'static str) -> Self {
        self.remote_name = Some(remote_name);
        self
    }

    /// Local registration name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Class name sent to the transport (defaults to [`name`](Self::name)).
    pub fn remote_name(&self) -> &'static str {
        self.remote_name.unwrap_or(self.name)
    }

    /// The static attribute whose value re-identifies one instance for
    /// dynamic reads.
    pub fn key_attribute(&self) -> &'static str {
        self.key_attribute
    }

    /// Ordered static attribute names (fetched once, cached per instance).
    pub fn static_attributes(&self) -> &'static [&'static str] {
        self.statics
    }

    /// Ordered dynamic attribute names (re-fetched on every read).
    pub fn dynamic_attributes(&self) -> &'static [&'static str] {
        self.dynamics
    }

    /// Position of `attribute` in the static list.
    pub fn static_index(&self, attribute: &str) -> Option<usize> {
        self.statics.iter().position(|a| *a == attribute)
    }

    pub fn is_dynamic(&self, attribute: &str) -> bool {
        self.dynamics.contains(&attribute)
    }

    /// Panics if the declaration is inconsistent. Called at registration;
    /// a bad descriptor is a programming error, not a runtime condition.
    pub(crate) fn validate(&self) {
        for attribute in self.statics {
            assert!(
                !self.dynamics.contains(attribute),
                "class {}: attribute {attribute:?} declared both static and dynamic",
                self.name,
            );
        }
        assert!(
            self.statics.contains(&self.key_attribute),
            "class {}: key attribute {:?} is not a static attribute",
            self.name,
            self.key_attribute,
        );
    }
}
